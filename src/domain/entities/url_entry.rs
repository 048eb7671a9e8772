//! URL entry entity representing a shortened URL mapping.

use chrono::{DateTime, Utc};

/// A stored mapping between a short identifier and a long URL.
///
/// `password` holds an Argon2 PHC string. An entry without a password cannot
/// be edited, and `can_be_modified` always mirrors `password.is_some()` once
/// the entry has been written by the repository.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UrlEntry {
    pub short_id: String,
    pub url: String,
    pub created: DateTime<Utc>,
    pub password: Option<String>,
    pub can_be_modified: bool,
    pub last_modified: Option<DateTime<Utc>>,
}

impl UrlEntry {
    /// Creates a new UrlEntry instance.
    pub fn new(
        short_id: String,
        url: String,
        created: DateTime<Utc>,
        password: Option<String>,
        last_modified: Option<DateTime<Utc>>,
    ) -> Self {
        let can_be_modified = password.is_some();
        Self {
            short_id,
            url,
            created,
            password,
            can_be_modified,
            last_modified,
        }
    }

    /// Replaces the edit password, keeping `can_be_modified` in sync.
    ///
    /// `None` disables editing.
    pub fn set_password(&mut self, password: Option<String>) {
        self.can_be_modified = password.is_some();
        self.password = password;
    }
}

/// Input data for inserting a new entry.
///
/// The identifier and creation timestamp are assigned by the repository.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewUrlEntry {
    pub url: String,
    pub password: Option<String>,
}
