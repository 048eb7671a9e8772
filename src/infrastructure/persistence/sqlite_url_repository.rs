//! SQLite implementation of the URL repository.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::SqlitePool;
use std::sync::Arc;

use crate::domain::entities::{NewUrlEntry, UrlEntry};
use crate::domain::repositories::{StoreError, UrlRepository};
use crate::utils::db_error::is_identifier_collision;
use crate::utils::id_codec::{self, IdCodec, Radix};

/// Default bound on identifier generation attempts per insert.
pub const DEFAULT_MAX_ATTEMPTS: usize = 100;

/// Identifiers that would be shadowed by fixed routes.
const RESERVED_IDS: &[&str] = &["health"];

const SELECT_COLUMNS: &str =
    "short_id, url, created, password, can_be_modified, last_modified";

#[derive(Debug, sqlx::FromRow)]
struct UrlRow {
    short_id: String,
    url: String,
    created: i64,
    password: Option<String>,
    can_be_modified: bool,
    last_modified: Option<i64>,
}

impl From<UrlRow> for UrlEntry {
    fn from(row: UrlRow) -> Self {
        UrlEntry {
            short_id: row.short_id,
            url: row.url,
            created: from_unix(row.created),
            password: row.password,
            can_be_modified: row.can_be_modified,
            last_modified: row.last_modified.map(from_unix),
        }
    }
}

fn from_unix(secs: i64) -> DateTime<Utc> {
    DateTime::from_timestamp(secs, 0).unwrap_or_default()
}

/// Outcome of a single insert attempt.
enum Attempt {
    Inserted(UrlEntry),
    Collision(String),
}

/// SQLite repository for the `urls` table.
///
/// Identifier assignment depends on the configured [`IdCodec`]. Either way the
/// `short_id` primary key (and the `seq` unique key for sequential ids) is the
/// final authority on uniqueness: a constraint violation is treated as a
/// collision and the insert is retried up to `max_attempts` times.
pub struct SqliteUrlRepository {
    pool: Arc<SqlitePool>,
    codec: IdCodec,
    max_attempts: usize,
}

impl SqliteUrlRepository {
    /// Creates a repository with the default random 6-character identifiers.
    pub fn new(pool: Arc<SqlitePool>) -> Self {
        Self::with_codec(pool, IdCodec::default(), DEFAULT_MAX_ATTEMPTS)
    }

    /// Creates a repository with an explicit identifier strategy.
    pub fn with_codec(pool: Arc<SqlitePool>, codec: IdCodec, max_attempts: usize) -> Self {
        Self {
            pool,
            codec,
            max_attempts: max_attempts.max(1),
        }
    }

    pub fn codec(&self) -> IdCodec {
        self.codec
    }

    async fn try_insert_random(
        &self,
        new_entry: &NewUrlEntry,
        length: usize,
        created: i64,
    ) -> Result<Attempt, sqlx::Error> {
        let short_id = id_codec::generate_code(length);
        if RESERVED_IDS.contains(&short_id.as_str()) {
            return Ok(Attempt::Collision(short_id));
        }

        // Cheap pre-check; the primary key still decides.
        let taken: Option<i64> = sqlx::query_scalar("SELECT 1 FROM urls WHERE short_id = ?")
            .bind(&short_id)
            .fetch_optional(self.pool.as_ref())
            .await?;
        if taken.is_some() {
            return Ok(Attempt::Collision(short_id));
        }

        self.insert_row(new_entry, short_id, None, created).await
    }

    /// Tries the next sequence value, never going below `floor`.
    ///
    /// `floor` is moved past the value tried, so a retry after a collision
    /// (with a row whose `seq` is NULL, or a reserved identifier) moves on
    /// instead of rereading the same `MAX(seq) + 1`.
    async fn try_insert_sequential(
        &self,
        new_entry: &NewUrlEntry,
        radix: Radix,
        floor: &mut i64,
        created: i64,
    ) -> Result<Attempt, sqlx::Error> {
        let max_next: i64 = sqlx::query_scalar("SELECT COALESCE(MAX(seq), 0) + 1 FROM urls")
            .fetch_one(self.pool.as_ref())
            .await?;

        let next = max_next.max(*floor);
        *floor = next + 1;

        let short_id = id_codec::encode(next as u64, radix.value());
        if RESERVED_IDS.contains(&short_id.as_str()) {
            return Ok(Attempt::Collision(short_id));
        }

        self.insert_row(new_entry, short_id, Some(next), created)
            .await
    }

    async fn insert_row(
        &self,
        new_entry: &NewUrlEntry,
        short_id: String,
        seq: Option<i64>,
        created: i64,
    ) -> Result<Attempt, sqlx::Error> {
        let sql = format!(
            "INSERT INTO urls (short_id, seq, url, created, password, can_be_modified) \
             VALUES (?, ?, ?, ?, ?, ?) \
             RETURNING {SELECT_COLUMNS}"
        );

        let result = sqlx::query_as::<_, UrlRow>(&sql)
            .bind(&short_id)
            .bind(seq)
            .bind(&new_entry.url)
            .bind(created)
            .bind(&new_entry.password)
            .bind(new_entry.password.is_some())
            .fetch_one(self.pool.as_ref())
            .await;

        match result {
            Ok(row) => Ok(Attempt::Inserted(row.into())),
            Err(e) if is_identifier_collision(&e) => Ok(Attempt::Collision(short_id)),
            Err(e) => Err(e),
        }
    }
}

#[async_trait]
impl UrlRepository for SqliteUrlRepository {
    async fn insert(&self, new_entry: NewUrlEntry) -> Result<UrlEntry, StoreError> {
        if new_entry.url.trim().is_empty() {
            return Err(StoreError::EmptyUrl);
        }

        let created = Utc::now().timestamp();
        let mut seq_floor = 1;

        for attempt in 1..=self.max_attempts {
            let outcome = match self.codec {
                IdCodec::Random { length } => {
                    self.try_insert_random(&new_entry, length, created).await?
                }
                IdCodec::Sequential { radix } => {
                    self.try_insert_sequential(&new_entry, radix, &mut seq_floor, created)
                        .await?
                }
            };

            match outcome {
                Attempt::Inserted(entry) => {
                    tracing::debug!(short_id = %entry.short_id, attempt, "entry inserted");
                    return Ok(entry);
                }
                Attempt::Collision(short_id) => {
                    tracing::warn!(attempt, %short_id, "identifier collision, retrying");
                }
            }
        }

        tracing::error!(attempts = self.max_attempts, "identifier space exhausted");
        Err(StoreError::ExhaustedIdentifierSpace {
            attempts: self.max_attempts,
        })
    }

    async fn get_by_id(&self, id: &str) -> Result<UrlEntry, StoreError> {
        let short_id = self.codec.canonicalize(id)?;

        let sql = format!("SELECT {SELECT_COLUMNS} FROM urls WHERE short_id = ?");
        let row = sqlx::query_as::<_, UrlRow>(&sql)
            .bind(&short_id)
            .fetch_optional(self.pool.as_ref())
            .await?;

        row.map(UrlEntry::from)
            .ok_or(StoreError::NotFound(short_id))
    }

    async fn get_by_url(&self, url: &str) -> Result<Option<UrlEntry>, StoreError> {
        let sql = format!(
            "SELECT {SELECT_COLUMNS} FROM urls WHERE url = ? ORDER BY created ASC, rowid ASC LIMIT 1"
        );
        let row = sqlx::query_as::<_, UrlRow>(&sql)
            .bind(url)
            .fetch_optional(self.pool.as_ref())
            .await?;

        Ok(row.map(UrlEntry::from))
    }

    async fn update(
        &self,
        entry: UrlEntry,
        record_timestamp: bool,
    ) -> Result<UrlEntry, StoreError> {
        if entry.url.trim().is_empty() {
            return Err(StoreError::EmptyUrl);
        }

        let last_modified = record_timestamp.then(|| Utc::now().timestamp());

        let sql = format!(
            "UPDATE urls \
             SET url = ?, password = ?, can_be_modified = ?, \
                 last_modified = COALESCE(?, last_modified) \
             WHERE short_id = ? \
             RETURNING {SELECT_COLUMNS}"
        );

        let row = sqlx::query_as::<_, UrlRow>(&sql)
            .bind(&entry.url)
            .bind(&entry.password)
            .bind(entry.password.is_some())
            .bind(last_modified)
            .bind(&entry.short_id)
            .fetch_optional(self.pool.as_ref())
            .await?;

        row.map(UrlEntry::from)
            .ok_or(StoreError::NotFound(entry.short_id))
    }

    async fn count(&self) -> Result<i64, StoreError> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM urls")
            .fetch_one(self.pool.as_ref())
            .await?;

        Ok(count)
    }
}
