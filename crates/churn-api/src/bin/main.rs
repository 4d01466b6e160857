//! churn-serve entry point
//!
//! Loads the model artifact, then serves predictions over HTTP until SIGINT
//! or SIGTERM.
//!
//! # Usage
//!
//! ```bash
//! # Serve the churn model on the default port
//! churn-serve --model-path models/churn_model.json
//!
//! # Serve the lead-conversion model with readable logs
//! PROFILE=lead MODEL_PATH=models/lead_model.json LOG_FORMAT=pretty churn-serve --port 9696
//! ```

use anyhow::Context;
use churn_api::{create_router, telemetry, AppState, ServeConfig};
use churn_core::InferenceService;
use clap::Parser;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = ServeConfig::parse();
    telemetry::init_tracing(config.log_format)?;
    config.validate()?;

    // A missing or corrupt artifact stops the process before it binds
    let service = InferenceService::from_artifact(&config.model_path, config.profile)
        .with_context(|| format!("failed to load the {} model", config.profile))?;

    let state = AppState::new(config.profile, service)?;
    let router = create_router(state, config.max_body_bytes);

    let addr = config.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {}", addr))?;

    tracing::info!(
        addr = %addr,
        profile = %config.profile,
        model_path = %config.model_path.display(),
        version = env!("CARGO_PKG_VERSION"),
        "Starting prediction server"
    );

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received");
}
