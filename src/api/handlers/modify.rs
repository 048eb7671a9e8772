//! Handler for editing an entry.

use axum::{
    Json,
    extract::{Path, State},
    http::HeaderMap,
};
use validator::Validate;

use crate::api::dto::entry::EntryResponse;
use crate::api::dto::modify::ModifyRequest;
use crate::api::middleware::edit_auth::EditBearer;
use crate::application::services::{EditCredential, EntryChanges};
use crate::error::AppError;
use crate::state::AppState;
use crate::utils::base_url::resolve_base_url;

/// Changes the destination URL and/or the edit password of an entry.
///
/// # Endpoint
///
/// `PATCH /{short_id}`
///
/// # Authorization
///
/// Either `Authorization: Bearer <edit_token>` from `POST /{short_id}/login`,
/// or `current_password` in the body.
///
/// # Errors
///
/// - 400 Bad Request if the new URL is invalid or nothing would change
/// - 401 Unauthorized if the token or password is wrong
/// - 403 Forbidden if the entry cannot be modified
/// - 404 Not Found if the identifier is unknown
pub async fn modify_handler(
    Path(short_id): Path<String>,
    State(state): State<AppState>,
    EditBearer(token): EditBearer,
    headers: HeaderMap,
    Json(payload): Json<ModifyRequest>,
) -> Result<Json<EntryResponse>, AppError> {
    payload.validate()?;

    let base_url = resolve_base_url(state.base_url.as_deref(), &headers)?;

    let credential = match token {
        Some(token) => EditCredential::Token(token),
        None => EditCredential::Password(payload.current_password.unwrap_or_default()),
    };

    let changes = EntryChanges {
        url: payload.url,
        new_password: payload.new_password,
    };

    let entry = state
        .url_service
        .modify(&short_id, credential, changes)
        .await?;

    let short_url = state.url_service.short_url(&base_url, &entry.short_id);

    Ok(Json(EntryResponse::new(entry, short_url)))
}
