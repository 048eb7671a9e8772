//! Repository trait for URL entry data access.

use crate::domain::entities::{NewUrlEntry, UrlEntry};
use crate::utils::id_codec::CodecError;
use async_trait::async_trait;

/// Errors raised by the storage engine.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("URL must not be empty")]
    EmptyUrl,

    #[error("No entry for identifier '{0}'")]
    NotFound(String),

    #[error("Malformed identifier '{0}'")]
    InvalidIdentifier(String),

    #[error("Could not find a free identifier after {attempts} attempts")]
    ExhaustedIdentifierSpace { attempts: usize },

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl From<CodecError> for StoreError {
    fn from(e: CodecError) -> Self {
        match e {
            CodecError::InvalidIdentifier(id) => StoreError::InvalidIdentifier(id),
        }
    }
}

/// Repository interface for the single `urls` table.
///
/// Every method borrows a pooled connection for the duration of the call and
/// releases it on return, including on error.
///
/// # Implementations
///
/// - [`crate::infrastructure::persistence::SqliteUrlRepository`] - SQLite implementation
/// - Test mocks available with `cfg(test)`
///
/// # Examples
///
/// See integration tests: `tests/repository_url.rs`
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UrlRepository: Send + Sync {
    /// Inserts a new entry and returns it with its identifier and timestamps.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::EmptyUrl`] if the URL is blank.
    /// Returns [`StoreError::ExhaustedIdentifierSpace`] if no free identifier
    /// was found within the configured number of attempts.
    async fn insert(&self, new_entry: NewUrlEntry) -> Result<UrlEntry, StoreError>;

    /// Looks up an entry by its short identifier.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::InvalidIdentifier`] if `id` cannot be decoded and
    /// [`StoreError::NotFound`] if no row matches.
    async fn get_by_id(&self, id: &str) -> Result<UrlEntry, StoreError>;

    /// Finds the oldest entry whose long URL matches exactly.
    ///
    /// Used to detect repeated submissions of the same URL.
    async fn get_by_url(&self, url: &str) -> Result<Option<UrlEntry>, StoreError>;

    /// Overwrites the mutable fields of a previously inserted entry.
    ///
    /// Writes `url`, `password` and `can_be_modified`. When `record_timestamp`
    /// is true `last_modified` is set to now. `created` and `short_id` never
    /// change. No authorization is performed here.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::EmptyUrl`] for a blank URL and
    /// [`StoreError::NotFound`] if the identifier has no row.
    async fn update(&self, entry: UrlEntry, record_timestamp: bool)
    -> Result<UrlEntry, StoreError>;

    /// Counts stored entries.
    async fn count(&self) -> Result<i64, StoreError>;
}
