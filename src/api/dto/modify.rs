//! DTO for the entry edit endpoint.

use serde::Deserialize;
use validator::Validate;

/// Request body for `PATCH /{short_id}`.
///
/// All fields are optional. The caller proves ownership either with an
/// `Authorization: Bearer` edit token or with `current_password`.
///
/// # `new_password` semantics
///
/// - **Absent** → keep the current password
/// - **`""`** → remove the password and disable further edits
/// - **Value** → replace the password
#[derive(Debug, Deserialize, Validate)]
pub struct ModifyRequest {
    /// New destination URL for this entry.
    #[validate(length(max = 8192, message = "URL is too long"))]
    pub url: Option<String>,

    #[validate(length(max = 1024, message = "Password is too long"))]
    pub new_password: Option<String>,

    /// Ignored when a bearer token is supplied.
    pub current_password: Option<String>,
}
