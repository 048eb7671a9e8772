//! Helpers shared across layers.
//!
//! - [`id_codec`] - Short identifier generation and parsing
//! - [`url_normalizer`] - URL normalization and validation
//! - [`password`] - Edit password hashing
//! - [`db_error`] - Database error classification
//! - [`base_url`] - Public base URL resolution from request headers

pub mod base_url;
pub mod db_error;
pub mod id_codec;
pub mod password;
pub mod url_normalizer;
