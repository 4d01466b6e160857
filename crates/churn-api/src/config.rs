//! Server configuration
//!
//! Every option has a command-line flag and an environment fallback.

use clap::{Parser, ValueEnum};
use std::net::SocketAddr;
use std::path::PathBuf;
use thiserror::Error;

use churn_core::Profile;

/// Default cap on request bodies (1 MiB)
pub const DEFAULT_MAX_BODY_BYTES: usize = 1024 * 1024;

/// Configuration errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Invalid bind address '{addr}': {reason}")]
    InvalidAddress { addr: String, reason: String },

    #[error("Invalid body limit: {0}")]
    InvalidBodyLimit(String),
}

/// Log output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LogFormat {
    /// One JSON object per line
    Json,
    /// Multi-line human readable output
    Pretty,
}

/// Command-line and environment configuration of `churn-serve`
#[derive(Debug, Clone, Parser)]
#[command(name = "churn-serve")]
#[command(about = "Serve a churn or lead-conversion model over HTTP")]
#[command(version)]
pub struct ServeConfig {
    /// Host to bind to
    #[arg(long, default_value = "0.0.0.0", env = "HOST")]
    pub host: String,

    /// Port to listen on
    #[arg(short, long, default_value = "8000", env = "PORT")]
    pub port: u16,

    /// Path of the model artifact
    #[arg(short, long, default_value = "models/churn_model.json", env = "MODEL_PATH")]
    pub model_path: PathBuf,

    /// Prediction profile to serve (churn or lead)
    #[arg(long, default_value = "churn", env = "PROFILE")]
    pub profile: Profile,

    /// Log output format
    #[arg(long, value_enum, default_value = "json", env = "LOG_FORMAT")]
    pub log_format: LogFormat,

    /// Maximum accepted request body size in bytes
    #[arg(long, default_value_t = DEFAULT_MAX_BODY_BYTES, env = "MAX_BODY_BYTES")]
    pub max_body_bytes: usize,
}

impl ServeConfig {
    /// Address the listener binds to
    pub fn socket_addr(&self) -> Result<SocketAddr, ConfigError> {
        let addr = format!("{}:{}", self.host, self.port);
        addr.parse().map_err(|e: std::net::AddrParseError| ConfigError::InvalidAddress {
            addr: addr.clone(),
            reason: e.to_string(),
        })
    }

    /// Check values clap cannot check on its own
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.socket_addr()?;
        if self.max_body_bytes == 0 {
            return Err(ConfigError::InvalidBodyLimit(
                "max body size must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }
}
