//! Health check handlers.

use axum::http::StatusCode;

/// Liveness health check endpoint.
///
/// Returns "ok" if the server is running. Does not check dependencies.
pub async fn health() -> &'static str {
    "ok"
}

/// Readiness health check endpoint.
///
/// Does not probe the hosted service; upstream failures surface per request.
pub async fn readiness() -> StatusCode {
    StatusCode::OK
}
