//! Telemetry for the prediction server
//!
//! - `metrics` - Prometheus metrics for predictions and HTTP traffic
//! - [`init_tracing`] - the process-wide tracing subscriber

pub mod metrics;

pub use metrics::{HttpMetrics, MetricsRegistry, PredictionMetrics};

use thiserror::Error;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::LogFormat;

/// Telemetry errors
#[derive(Error, Debug)]
pub enum TelemetryError {
    #[error("Metrics error: {0}")]
    MetricsError(#[from] prometheus::Error),

    #[error("Failed to encode metrics: {0}")]
    EncodingFailed(String),

    #[error("Failed to install tracing subscriber: {0}")]
    SubscriberFailed(String),
}

pub type Result<T> = std::result::Result<T, TelemetryError>;

/// Install the tracing subscriber
///
/// The filter comes from `RUST_LOG` and defaults to `info`.
pub fn init_tracing(format: LogFormat) -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let registry = tracing_subscriber::registry().with(filter);

    match format {
        LogFormat::Json => registry
            .with(tracing_subscriber::fmt::layer().json())
            .try_init(),
        LogFormat::Pretty => registry
            .with(tracing_subscriber::fmt::layer().pretty())
            .try_init(),
    }
    .map_err(|e| TelemetryError::SubscriberFailed(e.to_string()))
}
