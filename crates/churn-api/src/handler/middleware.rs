//! Request instrumentation middleware

use axum::{
    extract::{MatchedPath, Request, State},
    middleware::Next,
    response::Response,
};
use std::time::Instant;

use super::AppState;

/// Label used for requests that matched no route
const UNMATCHED_ROUTE: &str = "unmatched";

/// Record count and latency of every request
///
/// The `handler` label is the route template, never the raw URI, so label
/// cardinality stays bounded.
pub async fn http_metrics_middleware(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Response {
    let start = Instant::now();
    let method = request.method().to_string();
    let handler = request
        .extensions()
        .get::<MatchedPath>()
        .map(|path| path.as_str().to_string())
        .unwrap_or_else(|| UNMATCHED_ROUTE.to_string());

    let response = next.run(request).await;

    let status = response.status().as_u16();
    state
        .metrics
        .http()
        .record_request(&method, &handler, status, start.elapsed().as_secs_f64());

    tracing::debug!(
        method = %method,
        handler = %handler,
        status,
        duration_ms = start.elapsed().as_millis() as u64,
        "Request completed"
    );

    response
}
