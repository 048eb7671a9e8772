//! Handler for entry details.

use axum::{
    Json,
    extract::{Path, State},
    http::HeaderMap,
};

use crate::api::dto::entry::EntryResponse;
use crate::error::AppError;
use crate::state::AppState;
use crate::utils::base_url::resolve_base_url;

/// Returns the stored details of a short URL.
///
/// # Endpoint
///
/// `GET /{short_id}/info`
///
/// # Errors
///
/// Returns 404 Not Found if the identifier is unknown or malformed.
pub async fn info_handler(
    Path(short_id): Path<String>,
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<EntryResponse>, AppError> {
    let entry = state.url_service.resolve(&short_id).await?;
    let base_url = resolve_base_url(state.base_url.as_deref(), &headers)?;
    let short_url = state.url_service.short_url(&base_url, &entry.short_id);

    Ok(Json(EntryResponse::new(entry, short_url)))
}
