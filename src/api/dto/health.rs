//! DTOs for `GET /health`.
//!
//! The service depends on nothing but its SQLite database, so the report
//! carries a single check: whether the `urls` table can be counted.

use serde::Serialize;

/// Overall service state. `Degraded` is served with 503.
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ServiceStatus {
    Healthy,
    Degraded,
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: ServiceStatus,
    pub version: String,
    pub checks: HealthChecks,
}

#[derive(Debug, Serialize)]
pub struct HealthChecks {
    pub database: DatabaseCheck,
}

/// Result of counting stored entries.
///
/// `entries` is present only when the count succeeded; `message` carries the
/// summary or the database error.
#[derive(Debug, Serialize)]
pub struct DatabaseCheck {
    pub status: CheckState,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub entries: Option<i64>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum CheckState {
    Ok,
    Error,
}

impl DatabaseCheck {
    pub fn ok(entries: i64) -> Self {
        Self {
            status: CheckState::Ok,
            entries: Some(entries),
            message: Some(format!("Connected, {entries} entries")),
        }
    }

    pub fn failed(error: impl std::fmt::Display) -> Self {
        Self {
            status: CheckState::Error,
            entries: None,
            message: Some(format!("Database error: {error}")),
        }
    }

    pub fn is_ok(&self) -> bool {
        self.status == CheckState::Ok
    }
}
