//! Handler for the shortening endpoint.

use axum::{
    Json,
    extract::State,
    http::{HeaderMap, StatusCode},
};
use validator::Validate;

use crate::api::dto::shorten::{ShortenRequest, ShortenResponse, ShortenStatus};
use crate::application::services::ShortenOutcome;
use crate::error::AppError;
use crate::state::AppState;
use crate::utils::base_url::resolve_base_url;

/// Creates a short URL for a long URL.
///
/// # Endpoint
///
/// `POST /api/shorten`
///
/// # Request Body
///
/// ```json
/// { "url": "example.com/some/page", "password": "optional" }
/// ```
///
/// # Response
///
/// `201 Created` for a new entry, `200 OK` when an identical URL was already
/// shortened and reused.
///
/// ```json
/// {
///   "status": "created",
///   "short_id": "aZ3k9Q",
///   "short_url": "https://s.example.com/aZ3k9Q",
///   "url": "https://example.com/some/page",
///   "can_be_modified": true
/// }
/// ```
///
/// # Errors
///
/// Returns 400 Bad Request if the URL is empty or invalid.
pub async fn shorten_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(payload): Json<ShortenRequest>,
) -> Result<(StatusCode, Json<ShortenResponse>), AppError> {
    payload.validate()?;

    let base_url = resolve_base_url(state.base_url.as_deref(), &headers)?;

    let outcome = state
        .url_service
        .shorten(&payload.url, &payload.password)
        .await?;

    let (code, status) = match outcome {
        ShortenOutcome::Created(_) => (StatusCode::CREATED, ShortenStatus::Created),
        ShortenOutcome::Existing(_) => (StatusCode::OK, ShortenStatus::AlreadyExists),
    };
    let entry = outcome.into_entry();
    let short_url = state.url_service.short_url(&base_url, &entry.short_id);

    Ok((
        code,
        Json(ShortenResponse {
            status,
            short_id: entry.short_id,
            short_url,
            url: entry.url,
            can_be_modified: entry.can_be_modified,
        }),
    ))
}
