//! Health Check Handlers
//!
//! # Endpoints
//! - `GET /health` - Status and version
//! - any other path - Plain `ok`

use axum::{http::StatusCode, response::IntoResponse, Json};
use serde::Serialize;

/// Basic health response
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
}

/// Basic health check
pub async fn health_check() -> impl IntoResponse {
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
    })
}

/// Liveness answer for any unrouted path
pub async fn ok() -> impl IntoResponse {
    (StatusCode::OK, "ok")
}
