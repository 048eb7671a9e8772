//! Top-level router configuration.
//!
//! # Route Structure
//!
//! - `GET   /health`             - Health check (database)
//! - `POST  /api/shorten`        - Create a short URL
//! - `GET   /{short_id}`         - Redirect
//! - `PATCH /{short_id}`         - Edit destination or password
//! - `GET   /{short_id}/info`    - Entry details
//! - `POST  /{short_id}/login`   - Obtain an edit token
//!
//! # Middleware
//!
//! - **Tracing** - Structured request/response logging
//! - **Path normalization** - Trailing slash handling

use crate::api;
use crate::api::handlers::health_handler;
use crate::api::middleware::tracing;
use crate::state::AppState;
use axum::Router;
use axum::routing::get;
use tower::Layer;
use tower_http::normalize_path::{NormalizePath, NormalizePathLayer};

/// Constructs the application router with all routes and middleware.
pub fn app_router(state: AppState) -> NormalizePath<Router> {
    let router = Router::new()
        .route("/health", get(health_handler))
        .nest("/api", api::routes::api_routes())
        .merge(api::routes::entry_routes())
        .with_state(state)
        .layer(tracing::layer());

    NormalizePathLayer::trim_trailing_slash().layer(router)
}
