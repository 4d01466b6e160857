//! HTTP handler for the prediction server
//!
//! ## Architecture
//!
//! - `routes`: route definitions, shared state and the error mapping
//! - `middleware`: per-request HTTP metrics
//!
//! Every prediction request runs validation, inference and metric recording
//! in that order. A request that fails validation never reaches the model
//! and never touches the prediction metrics.

pub mod middleware;
pub mod routes;

pub use middleware::http_metrics_middleware;
pub use routes::{
    create_router, health_check, metrics, predict, predict_batch, record_schema, ApiError,
    AppState,
};

use churn_core::{PredictionResult, Profile};
use serde::ser::{Serialize, SerializeMap, Serializer};
use serde::Deserialize;

/// Error envelope returned for every failed request
#[derive(Debug, Clone, serde::Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Always false
    pub success: bool,
    pub error: ErrorInfo,
    /// Request metadata for tracing
    pub metadata: ResponseMetadata,
}

impl ErrorResponse {
    pub fn new(error: ErrorInfo, request_id: String) -> Self {
        Self {
            success: false,
            error,
            metadata: ResponseMetadata::new(request_id),
        }
    }
}

/// Error information for API responses
#[derive(Debug, Clone, serde::Serialize, Deserialize)]
pub struct ErrorInfo {
    /// Error code for programmatic handling
    pub code: String,
    /// Human-readable error message
    pub message: String,
    /// Additional error details
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

impl ErrorInfo {
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            details: None,
        }
    }

    pub fn with_details(mut self, details: serde_json::Value) -> Self {
        self.details = Some(details);
        self
    }
}

/// Response metadata for tracing and debugging
#[derive(Debug, Clone, serde::Serialize, Deserialize)]
pub struct ResponseMetadata {
    /// Unique request identifier
    pub request_id: String,
    /// Timestamp of response generation (RFC 3339)
    pub timestamp: String,
    /// Server version
    pub version: String,
}

impl ResponseMetadata {
    pub fn new(request_id: String) -> Self {
        Self {
            request_id,
            timestamp: chrono::Utc::now().to_rfc3339(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }
}

/// Body of a successful prediction
///
/// Serializes as `{"<target>_probability": p, "<target>": decision}`, so the
/// field names follow the served profile.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PredictionResponse {
    pub profile: Profile,
    pub result: PredictionResult,
}

impl PredictionResponse {
    pub fn new(profile: Profile, result: PredictionResult) -> Self {
        Self { profile, result }
    }
}

impl Serialize for PredictionResponse {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(2))?;
        map.serialize_entry(self.profile.probability_field(), &self.result.probability)?;
        map.serialize_entry(self.profile.decision_field(), &self.result.decision)?;
        map.end()
    }
}

/// Health check response
#[derive(Debug, Clone, serde::Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: HealthStatus,
    /// Served profile
    pub profile: Profile,
    pub model_loaded: bool,
    pub version: String,
    pub uptime_seconds: u64,
    pub timestamp: String,
}

/// Health status enum
///
/// The router only exists once the model has loaded, so a responding
/// server is always healthy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HealthStatus {
    Healthy,
}
