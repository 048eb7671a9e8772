//! Helpers for classifying database errors.

/// Returns true if the error is a UNIQUE or PRIMARY KEY violation on `urls`.
///
/// Such a violation during insert means another writer took the identifier
/// first; the caller treats it as a collision and retries.
pub fn is_identifier_collision(e: &sqlx::Error) -> bool {
    let Some(db_err) = e.as_database_error() else {
        return false;
    };

    // SQLite reports "UNIQUE constraint failed: urls.short_id" (or urls.seq)
    let message = db_err.message();
    if !db_err.is_unique_violation() && !message.contains("UNIQUE constraint failed") {
        return false;
    }

    message.contains("urls.short_id") || message.contains("urls.seq")
}
