//! Handler for exchanging an edit password for an edit token.

use axum::{
    Json,
    extract::{Path, State},
};
use validator::Validate;

use crate::api::dto::login::{LoginRequest, LoginResponse};
use crate::error::AppError;
use crate::state::AppState;

/// Verifies the edit password and returns a short-lived edit token.
///
/// # Endpoint
///
/// `POST /{short_id}/login`
///
/// # Errors
///
/// - 404 Not Found if the identifier is unknown
/// - 403 Forbidden if the entry was created without a password
/// - 401 Unauthorized if the password is wrong
pub async fn login_handler(
    Path(short_id): Path<String>,
    State(state): State<AppState>,
    Json(payload): Json<LoginRequest>,
) -> Result<Json<LoginResponse>, AppError> {
    payload.validate()?;

    let grant = state
        .url_service
        .login(&short_id, &payload.password)
        .await?;

    Ok(Json(LoginResponse {
        edit_token: grant.token,
        expires_at: grant.expires_at,
    }))
}
