//! HTTP middleware and extractors for request processing.

pub mod edit_auth;
pub mod tracing;
