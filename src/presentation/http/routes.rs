//! Route Configuration

use axum::{routing::get, Router};
use tower_http::trace::TraceLayer;

use super::handlers;

/// Create the HTTP router.
///
/// `/health` reports the running version; every other path answers `ok`.
pub fn create_router() -> Router {
    Router::new()
        .route("/health", get(handlers::health::health_check))
        .fallback(handlers::health::ok)
        .layer(TraceLayer::new_for_http())
}
