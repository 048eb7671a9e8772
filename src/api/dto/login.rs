//! DTOs for exchanging an edit password for an edit token.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

#[derive(Debug, Deserialize, Validate)]
pub struct LoginRequest {
    #[serde(default)]
    #[validate(length(max = 1024, message = "Password is too long"))]
    pub password: String,
}

/// Bearer token for `PATCH /{short_id}`.
#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub edit_token: String,
    pub expires_at: DateTime<Utc>,
}
