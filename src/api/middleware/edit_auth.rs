//! Optional bearer edit token extraction.

use axum::{extract::FromRequestParts, http::header, http::request::Parts};
use axum_auth::AuthBearer;

use crate::error::AppError;

/// Edit token from the `Authorization` header, if one was sent.
///
/// # Header Format
///
/// ```text
/// Authorization: Bearer <edit_token>
/// ```
///
/// A missing header yields `EditBearer(None)` so the handler can fall back to
/// a password in the body. A header that is present but not a bearer
/// credential is rejected with `401 Unauthorized`.
///
/// The token itself is verified by the URL service against the entry it
/// targets, not here.
#[derive(Debug, Clone)]
pub struct EditBearer(pub Option<String>);

impl<S> FromRequestParts<S> for EditBearer
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        if !parts.headers.contains_key(header::AUTHORIZATION) {
            return Ok(EditBearer(None));
        }

        let AuthBearer(token) = AuthBearer::from_request_parts(parts, &())
            .await
            .map_err(|_| {
                AppError::unauthorized(
                    "Unauthorized",
                    serde_json::json!({"reason": "Authorization header is not a bearer token"}),
                )
            })?;

        Ok(EditBearer(Some(token)))
    }
}
