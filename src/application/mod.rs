//! Application layer services implementing business logic.
//!
//! Services consume repository traits and give HTTP handlers and the admin
//! CLI one place to enforce validation and edit authorization.
//!
//! # Available Services
//!
//! - [`services::url_service::UrlService`] - Shortening, lookup and editing
//! - [`services::edit_grant_service::EditGrantService`] - Signed edit tokens

pub mod services;
