//! DTOs for the shortening endpoint.

use serde::{Deserialize, Serialize};
use validator::Validate;

/// Request to shorten a single URL.
#[derive(Debug, Deserialize, Validate)]
pub struct ShortenRequest {
    /// Long URL. A missing scheme is filled in with `https://`.
    #[validate(length(max = 8192, message = "URL is too long"))]
    pub url: String,

    /// Edit password. Empty or absent means the entry can never be edited.
    #[serde(default)]
    #[validate(length(max = 1024, message = "Password is too long"))]
    pub password: String,
}

/// Whether the request produced a new entry.
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ShortenStatus {
    Created,
    AlreadyExists,
}

#[derive(Debug, Serialize)]
pub struct ShortenResponse {
    pub status: ShortenStatus,
    pub short_id: String,
    pub short_url: String,
    pub url: String,
    pub can_be_modified: bool,
}
