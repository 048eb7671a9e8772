//! URL normalization and validation for submitted long URLs.
//!
//! [`normalize`] only defaults the scheme. [`validate`] rejects URLs containing
//! control characters, or whose authority contains characters that could be
//! used for header or markup injection. It is not a full RFC 3986 validator.
//! [`normalize_and_validate`] returns the parser's serialization, which is what
//! gets stored and later sent back in `Location`.

use regex::Regex;
use std::sync::LazyLock;
use url::Url;

/// Matches `http:` / `https:` at the start, optionally followed by `//` or `\\`.
static SCHEME_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^https?:(//|\\\\)?").expect("scheme regex is valid"));

/// Characters never accepted in the host/authority component.
const FORBIDDEN_HOST_CHARS: &[char] = &[
    '<', '>', '{', '}', '[', ']', '`', '^', '\\', '|', '%', '#', '"', '\'', ' ',
];

/// Errors returned by [`normalize_and_validate`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum UrlValidationError {
    #[error("URL is required")]
    Empty,

    #[error("Invalid URL: {0}")]
    Invalid(String),
}

/// Prepends `https://` when the input has no `http`/`https` scheme.
///
/// Surrounding whitespace is trimmed.
///
/// # Examples
///
/// ```ignore
/// assert_eq!(normalize("example.com"), "https://example.com");
/// assert_eq!(normalize("http://example.com"), "http://example.com");
/// ```
pub fn normalize(input: &str) -> String {
    let trimmed = input.trim();

    if SCHEME_REGEX.is_match(trimmed) {
        trimmed.to_string()
    } else {
        format!("https://{trimmed}")
    }
}

/// Returns `true` if the URL parses as http(s), contains no control
/// characters and its authority contains no forbidden characters.
///
/// Never panics or errors; callers decide how to report a rejection.
pub fn validate(url: &str) -> bool {
    // The parser silently drops tabs and newlines, so check the raw input
    if url.chars().any(char::is_control) {
        return false;
    }

    let Some(authority) = raw_authority(url) else {
        return false;
    };

    if authority.is_empty() || authority.contains(FORBIDDEN_HOST_CHARS) {
        return false;
    }

    match Url::parse(url) {
        Ok(parsed) => {
            matches!(parsed.scheme(), "http" | "https")
                && parsed.host_str().is_some_and(|host| !host.is_empty())
        }
        Err(_) => false,
    }
}

/// Normalizes user input, validates it and returns the serialized URL.
///
/// The serialization lowercases the host and gives a bare host a `/` path, so
/// `example.com` becomes `https://example.com/`.
///
/// # Errors
///
/// Returns [`UrlValidationError::Empty`] for blank input and
/// [`UrlValidationError::Invalid`] if [`validate`] rejects the normalized URL.
pub fn normalize_and_validate(input: &str) -> Result<String, UrlValidationError> {
    if input.trim().is_empty() {
        return Err(UrlValidationError::Empty);
    }

    let url = normalize(input);
    if !validate(&url) {
        return Err(UrlValidationError::Invalid(url));
    }

    match Url::parse(&url) {
        Ok(parsed) => Ok(parsed.to_string()),
        Err(_) => Err(UrlValidationError::Invalid(url)),
    }
}

/// Extracts the authority as written, before the URL parser percent-encodes
/// or rewrites it.
fn raw_authority(url: &str) -> Option<&str> {
    let (_, rest) = url.split_once(':')?;
    let rest = rest.trim_start_matches(['/', '\\']);
    let end = rest.find(['/', '?', '#']).unwrap_or(rest.len());
    Some(&rest[..end])
}
