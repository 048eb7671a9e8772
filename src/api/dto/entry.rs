//! Public view of a stored entry.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::domain::entities::UrlEntry;

/// Entry details returned by the info and edit endpoints.
///
/// Never includes the password digest.
#[derive(Debug, Serialize)]
pub struct EntryResponse {
    pub short_id: String,
    pub short_url: String,
    pub url: String,
    pub created: DateTime<Utc>,
    pub last_modified: Option<DateTime<Utc>>,
    pub can_be_modified: bool,
}

impl EntryResponse {
    pub fn new(entry: UrlEntry, short_url: String) -> Self {
        Self {
            short_id: entry.short_id,
            short_url,
            url: entry.url,
            created: entry.created,
            last_modified: entry.last_modified,
            can_be_modified: entry.can_be_modified,
        }
    }
}
