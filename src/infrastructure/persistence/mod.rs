//! SQLite repository implementations.
//!
//! # Repositories
//!
//! - [`SqliteUrlRepository`] - URL entry storage and retrieval

pub mod database;
pub mod sqlite_url_repository;

pub use sqlite_url_repository::SqliteUrlRepository;
