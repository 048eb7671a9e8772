//! Route configuration for short URL endpoints.

use crate::api::handlers::{
    info_handler, login_handler, modify_handler, redirect_handler, shorten_handler,
};
use crate::state::AppState;
use axum::{
    Router,
    routing::{get, post},
};

/// JSON API mounted under `/api`.
///
/// # Endpoints
///
/// - `POST /shorten` - Create a short URL
pub fn api_routes() -> Router<AppState> {
    Router::new().route("/shorten", post(shorten_handler))
}

/// Routes addressed by a short identifier at the root.
///
/// # Endpoints
///
/// - `GET   /{short_id}`       - Redirect to the long URL
/// - `PATCH /{short_id}`       - Edit the entry (token or password required)
/// - `GET   /{short_id}/info`  - Entry details
/// - `POST  /{short_id}/login` - Exchange the edit password for an edit token
pub fn entry_routes() -> Router<AppState> {
    Router::new()
        .route("/{short_id}", get(redirect_handler).patch(modify_handler))
        .route("/{short_id}/info", get(info_handler))
        .route("/{short_id}/login", post(login_handler))
}
