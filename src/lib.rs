//! # URL Shortener
//!
//! A small URL shortening service with password-protected editing, built with
//! Axum and SQLite.
//!
//! ## Architecture
//!
//! - **Domain Layer** ([`domain`]) - The URL entry and the repository contract
//! - **Application Layer** ([`application`]) - Shortening, lookup and edit authorization
//! - **Infrastructure Layer** ([`infrastructure`]) - SQLite pool, migrations and repository
//! - **API Layer** ([`api`]) - REST handlers, DTOs and extractors
//!
//! ## Features
//!
//! - Random or sequential (base36/hex) short identifiers with bounded collision retries
//! - Scheme-less input is normalized to `https://` and validated before storage
//! - Optional Argon2id edit password per entry; no password means read-only
//! - Signed, expiring edit tokens that die when the password changes
//!
//! ## Quick Start
//!
//! ```bash
//! export DATABASE_URL="sqlite://urls.db?mode=rwc"
//! export SESSION_SECRET="change-me-to-something-long"
//!
//! cargo run
//! ```
//!
//! ## Configuration
//!
//! Service configuration is loaded from environment variables via [`config::Config`].
//! See [`config`] module for available options.

pub mod api;
pub mod application;
pub mod domain;
pub mod error;
pub mod infrastructure;
pub mod state;
pub mod utils;

pub mod config;
pub mod server;

pub mod routes;

pub use error::AppError;
pub use state::AppState;

/// Commonly used types for external consumers.
///
/// Re-exports frequently used types to simplify imports for library users
/// and integration tests.
pub mod prelude {
    pub use crate::application::services::{
        DuplicatePolicy, EditCredential, EditGrantService, EntryChanges, UrlService,
    };
    pub use crate::domain::entities::{NewUrlEntry, UrlEntry};
    pub use crate::error::AppError;
    pub use crate::state::AppState;
}
