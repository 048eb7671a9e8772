//! Public base URL resolution for building short URLs.

use crate::AppError;
use axum::http::{HeaderMap, header};

const FORWARDED_PROTO: &str = "x-forwarded-proto";

/// Returns the prefix that short identifiers are appended to.
///
/// A configured `BASE_URL` always wins. Otherwise the prefix is built from
/// the `Host` header, keeping any port, with `https` only when a proxy says
/// so through `X-Forwarded-Proto`.
///
/// # Errors
///
/// Returns [`AppError::Validation`] if no base URL is configured and:
/// - The `Host` header is missing
/// - The header value contains invalid UTF-8
///
/// # Examples
///
/// ```ignore
/// let mut headers = HeaderMap::new();
/// headers.insert(header::HOST, "localhost:3000".parse().unwrap());
///
/// let base = resolve_base_url(None, &headers).unwrap();
/// assert_eq!(base, "http://localhost:3000");
/// ```
pub fn resolve_base_url(configured: Option<&str>, headers: &HeaderMap) -> Result<String, AppError> {
    if let Some(base) = configured {
        return Ok(base.trim_end_matches('/').to_string());
    }

    let host = headers
        .get(header::HOST)
        .ok_or_else(|| AppError::bad_request("Missing Host header", serde_json::json!({})))?
        .to_str()
        .map_err(|_| AppError::bad_request("Invalid Host header", serde_json::json!({})))?;

    let scheme = match headers.get(FORWARDED_PROTO).and_then(|v| v.to_str().ok()) {
        Some(proto) if proto.eq_ignore_ascii_case("https") => "https",
        _ => "http",
    };

    Ok(format!("{scheme}://{host}"))
}
