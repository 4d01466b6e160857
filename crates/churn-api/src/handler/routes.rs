//! Route definitions for the prediction server
//!
//! - POST /predict - Predict one record
//! - POST /predict/batch - Predict an array of records, all or nothing
//! - GET /metrics - Prometheus text exposition
//! - GET /health - Liveness check
//! - GET /schema - The served record schema

use axum::{
    extract::{rejection::JsonRejection, DefaultBodyLimit, State},
    http::{header, StatusCode},
    middleware::from_fn_with_state,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use churn_core::{
    InferenceService, ModelError, Profile, RecordSchema, ValidationError, Validator,
};
use serde_json::Value;
use std::any::Any;
use std::sync::Arc;
use std::time::Instant;
use tower_http::{catch_panic::CatchPanicLayer, trace::TraceLayer};

use super::{
    http_metrics_middleware, ErrorInfo, ErrorResponse, HealthResponse, HealthStatus,
    PredictionResponse,
};
use crate::telemetry::{MetricsRegistry, TelemetryError};

/// State shared across all routes
#[derive(Clone)]
pub struct AppState {
    pub profile: Profile,
    pub validator: Arc<Validator>,
    pub service: InferenceService,
    pub metrics: Arc<MetricsRegistry>,
    /// Start time for uptime calculation
    pub start_time: Instant,
}

impl AppState {
    /// Create the state for a loaded model
    pub fn new(profile: Profile, service: InferenceService) -> Result<Self, TelemetryError> {
        Ok(Self {
            profile,
            validator: Arc::new(Validator::new(profile)),
            service,
            metrics: Arc::new(MetricsRegistry::new(profile)?),
            start_time: Instant::now(),
        })
    }
}

/// API error types
#[derive(Debug)]
pub enum ApiError {
    BadRequest(String),
    PayloadTooLarge(String),
    ValidationFailed(ValidationError),
    Internal(String),
}

impl ApiError {
    pub fn error_code(&self) -> &'static str {
        match self {
            ApiError::BadRequest(_) => "BAD_REQUEST",
            ApiError::PayloadTooLarge(_) => "PAYLOAD_TOO_LARGE",
            ApiError::ValidationFailed(_) => "VALIDATION_FAILED",
            ApiError::Internal(_) => "INTERNAL_ERROR",
        }
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::PayloadTooLarge(_) => StatusCode::PAYLOAD_TOO_LARGE,
            ApiError::ValidationFailed(_) => StatusCode::UNPROCESSABLE_ENTITY,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        if rejection.status() == StatusCode::PAYLOAD_TOO_LARGE {
            ApiError::PayloadTooLarge(rejection.body_text())
        } else {
            ApiError::BadRequest(rejection.body_text())
        }
    }
}

impl From<ValidationError> for ApiError {
    fn from(err: ValidationError) -> Self {
        ApiError::ValidationFailed(err)
    }
}

impl From<ModelError> for ApiError {
    fn from(err: ModelError) -> Self {
        ApiError::Internal(err.to_string())
    }
}

impl From<TelemetryError> for ApiError {
    fn from(err: TelemetryError) -> Self {
        ApiError::Internal(err.to_string())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let request_id = uuid::Uuid::new_v4().to_string();

        let error_info = match &self {
            ApiError::BadRequest(msg) | ApiError::PayloadTooLarge(msg) => {
                tracing::debug!(request_id = %request_id, error = %msg, "Rejected request body");
                ErrorInfo::new(self.error_code(), msg)
            }
            ApiError::ValidationFailed(err) => {
                tracing::debug!(
                    request_id = %request_id,
                    violations = err.violations.len(),
                    "Record validation failed"
                );
                ErrorInfo::new(self.error_code(), "Record validation failed")
                    .with_details(serde_json::json!({ "violations": err.violations }))
            }
            ApiError::Internal(cause) => {
                tracing::error!(request_id = %request_id, error = %cause, "Request failed");
                ErrorInfo::new(self.error_code(), "internal server error")
            }
        };

        let response = ErrorResponse::new(error_info, request_id);

        (status, Json(response)).into_response()
    }
}

/// Create the router with all routes
pub fn create_router(state: AppState, max_body_bytes: usize) -> Router {
    Router::new()
        // Prediction endpoints
        .route("/predict", post(predict))
        .route("/predict/batch", post(predict_batch))
        // Operational endpoints
        .route("/metrics", get(metrics))
        .route("/health", get(health_check))
        .route("/schema", get(record_schema))
        .layer(CatchPanicLayer::custom(panic_response))
        .layer(from_fn_with_state(state.clone(), http_metrics_middleware))
        .layer(DefaultBodyLimit::max(max_body_bytes))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Turn a handler panic into the opaque 500 envelope
///
/// Sits inside the metrics middleware so the failed request is still counted.
fn panic_response(err: Box<dyn Any + Send + 'static>) -> Response {
    let detail = if let Some(msg) = err.downcast_ref::<&str>() {
        (*msg).to_string()
    } else if let Some(msg) = err.downcast_ref::<String>() {
        msg.clone()
    } else {
        "unknown panic payload".to_string()
    };

    ApiError::Internal(format!("handler panicked: {}", detail)).into_response()
}

/// POST /predict - Predict one record
pub async fn predict(
    State(state): State<AppState>,
    payload: Result<Json<Value>, JsonRejection>,
) -> Result<Json<PredictionResponse>, ApiError> {
    let Json(body) = payload?;

    let record = state.validator.validate(&body)?;
    let result = state.service.predict(&record)?;
    state.metrics.prediction().observe(&result);

    tracing::debug!(
        profile = %state.profile,
        probability = result.probability,
        decision = result.decision,
        "Prediction served"
    );

    Ok(Json(PredictionResponse::new(state.profile, result)))
}

/// POST /predict/batch - Predict an array of records
///
/// No record is predicted unless every record validates.
pub async fn predict_batch(
    State(state): State<AppState>,
    payload: Result<Json<Value>, JsonRejection>,
) -> Result<Json<Vec<PredictionResponse>>, ApiError> {
    let Json(body) = payload?;
    let Value::Array(bodies) = body else {
        return Err(ApiError::BadRequest(
            "Expected a JSON array of records".to_string(),
        ));
    };

    let records = state.validator.validate_batch(&bodies)?;
    let results = state.service.predict_batch(&records)?;

    let responses = results
        .iter()
        .map(|result| {
            state.metrics.prediction().observe(result);
            PredictionResponse::new(state.profile, *result)
        })
        .collect::<Vec<_>>();

    tracing::debug!(
        profile = %state.profile,
        records = responses.len(),
        "Batch prediction served"
    );

    Ok(Json(responses))
}

/// GET /metrics - Prometheus text exposition
pub async fn metrics(State(state): State<AppState>) -> Result<Response, ApiError> {
    let body = state.metrics.encode_text()?;
    Ok(([(header::CONTENT_TYPE, prometheus::TEXT_FORMAT)], body).into_response())
}

/// GET /health - Liveness check
///
/// The model is loaded before the listener binds, so a running server is
/// always healthy.
pub async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: HealthStatus::Healthy,
        profile: state.profile,
        model_loaded: true,
        version: env!("CARGO_PKG_VERSION").to_string(),
        uptime_seconds: state.start_time.elapsed().as_secs(),
        timestamp: chrono::Utc::now().to_rfc3339(),
    })
}

/// GET /schema - The served record schema
pub async fn record_schema(State(state): State<AppState>) -> Json<RecordSchema> {
    Json(state.validator.schema().clone())
}

#[cfg(test)]
mod tests {
    use super::*;
    use churn_core::{Violation, ViolationCode};

    #[test]
    fn test_api_error_responses() {
        let err = ApiError::BadRequest("bad".to_string());
        assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(err.error_code(), "BAD_REQUEST");

        let err = ApiError::ValidationFailed(ValidationError::new(vec![Violation::new(
            "tenure",
            ViolationCode::BelowMinimum,
            "too low",
        )]));
        assert_eq!(err.status_code(), StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(err.error_code(), "VALIDATION_FAILED");

        let err = ApiError::from(ModelError::inference("nan"));
        assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(err.error_code(), "INTERNAL_ERROR");
    }

    #[tokio::test]
    async fn test_internal_error_body_is_opaque() {
        let response = ApiError::Internal("model exploded at /secret/path".to_string())
            .into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let text = String::from_utf8(bytes.to_vec()).unwrap();
        assert!(text.contains("internal server error"));
        assert!(!text.contains("secret"));
    }

    #[tokio::test]
    async fn test_panic_response_hides_payload() {
        let response = panic_response(Box::new(String::from("index out of bounds: 42")));
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let json: Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(json["error"]["code"], "INTERNAL_ERROR");
        assert_eq!(json["error"]["message"], "internal server error");
        assert!(!String::from_utf8_lossy(&bytes).contains("out of bounds"));
    }
}
