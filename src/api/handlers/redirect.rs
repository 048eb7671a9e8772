//! Handler for short URL redirect.

use axum::{
    extract::{Path, State},
    response::{IntoResponse, Redirect},
};

use crate::error::AppError;
use crate::state::AppState;

/// Redirects a short identifier to its long URL.
///
/// # Endpoint
///
/// `GET /{short_id}`
///
/// Always answers `307 Temporary Redirect`, since the destination of an
/// editable entry can change.
///
/// # Errors
///
/// Returns 404 Not Found if the identifier is unknown or malformed.
pub async fn redirect_handler(
    Path(short_id): Path<String>,
    State(state): State<AppState>,
) -> Result<impl IntoResponse, AppError> {
    let entry = state.url_service.resolve(&short_id).await?;

    tracing::debug!(short_id = %entry.short_id, "redirect");

    Ok(Redirect::temporary(&entry.url))
}
