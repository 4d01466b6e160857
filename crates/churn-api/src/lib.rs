//! Churn API
//!
//! HTTP serving layer for churn and lead-conversion models. The router
//! validates each record against the served profile's schema, calls the
//! loaded model, records Prometheus metrics and shapes the JSON response.
//!
//! ## Example
//!
//! ```rust,no_run
//! use churn_api::{config::DEFAULT_MAX_BODY_BYTES, create_router, AppState};
//! use churn_core::{InferenceService, Profile};
//!
//! # async fn run() -> anyhow::Result<()> {
//! let service = InferenceService::from_artifact("models/churn_model.json", Profile::Churn)?;
//! let state = AppState::new(Profile::Churn, service)?;
//! let router = create_router(state, DEFAULT_MAX_BODY_BYTES);
//!
//! let listener = tokio::net::TcpListener::bind("0.0.0.0:8000").await?;
//! axum::serve(listener, router).await?;
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod handler;
pub mod telemetry;

pub use config::{ConfigError, LogFormat, ServeConfig};
pub use handler::{create_router, ApiError, AppState, PredictionResponse};
pub use telemetry::{MetricsRegistry, TelemetryError};
