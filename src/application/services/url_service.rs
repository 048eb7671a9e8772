//! URL shortening, lookup and password-gated editing.

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use serde_json::json;

use crate::application::services::edit_grant_service::{EditGrant, EditGrantService};
use crate::domain::entities::{NewUrlEntry, UrlEntry};
use crate::domain::repositories::UrlRepository;
use crate::error::AppError;
use crate::utils::password::{compare_password_async, hash_optional_password_async};
use crate::utils::url_normalizer::normalize_and_validate;

/// What to do when a submitted long URL is already stored.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum DuplicatePolicy {
    /// Return the existing entry instead of inserting a new row.
    #[default]
    ReuseExisting,
    /// Always mint a new identifier.
    AlwaysCreate,
}

impl FromStr for DuplicatePolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "reuse" | "reuse_existing" => Ok(DuplicatePolicy::ReuseExisting),
            "always_new" | "always_create" => Ok(DuplicatePolicy::AlwaysCreate),
            other => Err(format!(
                "unknown duplicate policy '{other}', expected reuse or always_new"
            )),
        }
    }
}

impl fmt::Display for DuplicatePolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DuplicatePolicy::ReuseExisting => write!(f, "reuse"),
            DuplicatePolicy::AlwaysCreate => write!(f, "always_new"),
        }
    }
}

/// Result of a shorten request.
#[derive(Debug, Clone)]
pub enum ShortenOutcome {
    Created(UrlEntry),
    /// The URL was already stored and the duplicate policy reused it.
    Existing(UrlEntry),
}

impl ShortenOutcome {
    pub fn entry(&self) -> &UrlEntry {
        match self {
            ShortenOutcome::Created(entry) | ShortenOutcome::Existing(entry) => entry,
        }
    }

    pub fn into_entry(self) -> UrlEntry {
        match self {
            ShortenOutcome::Created(entry) | ShortenOutcome::Existing(entry) => entry,
        }
    }

    pub fn is_created(&self) -> bool {
        matches!(self, ShortenOutcome::Created(_))
    }
}

/// Proof of ownership presented with an edit.
#[derive(Debug, Clone)]
pub enum EditCredential {
    Password(String),
    /// Token previously returned by [`UrlService::login`].
    Token(String),
}

/// Requested changes to an entry. `None` fields are left unchanged.
///
/// `new_password: Some("")` disables further editing.
#[derive(Debug, Clone, Default)]
pub struct EntryChanges {
    pub url: Option<String>,
    pub new_password: Option<String>,
}

/// Service for creating, resolving and editing short URLs.
pub struct UrlService<R: UrlRepository> {
    repository: Arc<R>,
    grants: EditGrantService,
    duplicate_policy: DuplicatePolicy,
}

impl<R: UrlRepository> UrlService<R> {
    /// Creates a new URL service.
    pub fn new(
        repository: Arc<R>,
        grants: EditGrantService,
        duplicate_policy: DuplicatePolicy,
    ) -> Self {
        Self {
            repository,
            grants,
            duplicate_policy,
        }
    }

    /// Shortens a long URL, optionally protecting later edits with a password.
    ///
    /// The URL gets `https://` prepended if it has no scheme. An empty
    /// password means the entry can never be edited.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Validation`] if the URL is blank or rejected by the
    /// validator, and [`AppError::Internal`] on storage or hashing failures.
    pub async fn shorten(&self, raw_url: &str, password: &str) -> Result<ShortenOutcome, AppError> {
        let url = normalize_and_validate(raw_url)?;

        if self.duplicate_policy == DuplicatePolicy::ReuseExisting
            && let Some(existing) = self.repository.get_by_url(&url).await?
        {
            tracing::info!(short_id = %existing.short_id, "URL already shortened");
            return Ok(ShortenOutcome::Existing(existing));
        }

        let password = hash_optional_password_async(password).await?;
        let entry = self
            .repository
            .insert(NewUrlEntry { url, password })
            .await?;

        tracing::info!(
            short_id = %entry.short_id,
            can_be_modified = entry.can_be_modified,
            "short URL created"
        );
        Ok(ShortenOutcome::Created(entry))
    }

    /// Looks up an entry by its short identifier.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] for unknown or malformed identifiers.
    pub async fn resolve(&self, short_id: &str) -> Result<UrlEntry, AppError> {
        Ok(self.repository.get_by_id(short_id).await?)
    }

    /// Exchanges the edit password for a signed edit grant.
    ///
    /// # Errors
    ///
    /// - [`AppError::NotFound`] if the identifier is unknown
    /// - [`AppError::Forbidden`] if the entry was created without a password
    /// - [`AppError::Unauthorized`] if the password is wrong
    pub async fn login(&self, short_id: &str, password: &str) -> Result<EditGrant, AppError> {
        let entry = self.resolve(short_id).await?;
        self.authorize(&entry, &EditCredential::Password(password.to_string()))
            .await?;

        self.grants.issue(&entry).ok_or_else(|| {
            AppError::forbidden(
                "This short URL cannot be modified",
                json!({ "short_id": entry.short_id }),
            )
        })
    }

    /// Applies `changes` to an entry after checking `credential`.
    ///
    /// The new URL is normalized and validated like a fresh submission, and
    /// `last_modified` is recorded. A rejected credential leaves the entry
    /// untouched.
    ///
    /// # Errors
    ///
    /// - [`AppError::NotFound`] if the identifier is unknown
    /// - [`AppError::Forbidden`] if the entry cannot be modified
    /// - [`AppError::Unauthorized`] if the credential is wrong or expired
    /// - [`AppError::Validation`] if the new URL is invalid or nothing changes
    pub async fn modify(
        &self,
        short_id: &str,
        credential: EditCredential,
        changes: EntryChanges,
    ) -> Result<UrlEntry, AppError> {
        let mut entry = self.resolve(short_id).await?;
        self.authorize(&entry, &credential).await?;

        let mut changed = false;

        if let Some(raw_url) = changes.url {
            let url = normalize_and_validate(&raw_url)?;
            if url != entry.url {
                entry.url = url;
                changed = true;
            }
        }

        if let Some(new_password) = changes.new_password {
            entry.set_password(hash_optional_password_async(&new_password).await?);
            changed = true;
        }

        if !changed {
            return Err(AppError::bad_request(
                "URL is the same",
                json!({ "short_id": entry.short_id }),
            ));
        }

        let updated = self.repository.update(entry, true).await?;
        tracing::info!(
            short_id = %updated.short_id,
            can_be_modified = updated.can_be_modified,
            "short URL modified"
        );
        Ok(updated)
    }

    /// Replaces the edit password without checking ownership.
    ///
    /// Operator use only; an empty password disables editing. Does not touch
    /// `last_modified`.
    pub async fn reset_password(
        &self,
        short_id: &str,
        new_password: &str,
    ) -> Result<UrlEntry, AppError> {
        let mut entry = self.resolve(short_id).await?;
        entry.set_password(hash_optional_password_async(new_password).await?);
        Ok(self.repository.update(entry, false).await?)
    }

    /// Finds the entry for a long URL, if any.
    ///
    /// Input is normalized the same way as on submission, so `example.com`
    /// finds `https://example.com/`. Input the validator rejects is looked up
    /// verbatim.
    pub async fn find_by_url(&self, url: &str) -> Result<Option<UrlEntry>, AppError> {
        let lookup = normalize_and_validate(url).unwrap_or_else(|_| url.to_string());
        Ok(self.repository.get_by_url(&lookup).await?)
    }

    /// Counts stored entries.
    pub async fn count(&self) -> Result<i64, AppError> {
        Ok(self.repository.count().await?)
    }

    /// Builds the public short URL for an identifier.
    pub fn short_url(&self, base_url: &str, short_id: &str) -> String {
        format!("{}/{}", base_url.trim_end_matches('/'), short_id)
    }

    async fn authorize(
        &self,
        entry: &UrlEntry,
        credential: &EditCredential,
    ) -> Result<(), AppError> {
        let Some(digest) = entry.password.as_deref() else {
            return Err(AppError::forbidden(
                "This short URL cannot be modified",
                json!({ "short_id": entry.short_id }),
            ));
        };

        let accepted = match credential {
            EditCredential::Password(password) => {
                !password.is_empty() && compare_password_async(password, digest).await?
            }
            EditCredential::Token(token) => self.grants.verify(entry, token),
        };

        if accepted {
            Ok(())
        } else {
            tracing::warn!(short_id = %entry.short_id, "rejected edit credential");
            Err(AppError::unauthorized(
                "Wrong password",
                json!({ "short_id": entry.short_id }),
            ))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::repositories::{MockUrlRepository, StoreError};
    use crate::utils::password::{compare_password, hash_password};
    use chrono::Utc;

    fn grants() -> EditGrantService {
        EditGrantService::new("test-signing-secret".to_string(), 3600)
    }

    fn service(repo: MockUrlRepository, policy: DuplicatePolicy) -> UrlService<MockUrlRepository> {
        UrlService::new(Arc::new(repo), grants(), policy)
    }

    fn create_test_entry(short_id: &str, url: &str, password: Option<&str>) -> UrlEntry {
        UrlEntry::new(
            short_id.to_string(),
            url.to_string(),
            Utc::now(),
            password.map(|p| hash_password(p).unwrap()),
            None,
        )
    }

    #[tokio::test]
    async fn test_shorten_without_password() {
        let mut repo = MockUrlRepository::new();

        repo.expect_get_by_url()
            .withf(|url| url == "https://a.com/")
            .times(1)
            .returning(|_| Ok(None));

        repo.expect_insert()
            .withf(|new_entry| new_entry.url == "https://a.com/" && new_entry.password.is_none())
            .times(1)
            .returning(|new_entry| {
                Ok(UrlEntry::new(
                    "abc123".to_string(),
                    new_entry.url,
                    Utc::now(),
                    new_entry.password,
                    None,
                ))
            });

        let outcome = service(repo, DuplicatePolicy::ReuseExisting)
            .shorten("a.com", "")
            .await
            .unwrap();

        assert!(outcome.is_created());
        assert!(!outcome.entry().can_be_modified);
    }

    #[tokio::test]
    async fn test_shorten_hashes_password() {
        let mut repo = MockUrlRepository::new();

        repo.expect_get_by_url().returning(|_| Ok(None));
        repo.expect_insert()
            .withf(|new_entry| {
                new_entry
                    .password
                    .as_deref()
                    .is_some_and(|digest| compare_password("secret", digest).unwrap())
            })
            .times(1)
            .returning(|new_entry| {
                Ok(UrlEntry::new(
                    "abc123".to_string(),
                    new_entry.url,
                    Utc::now(),
                    new_entry.password,
                    None,
                ))
            });

        let outcome = service(repo, DuplicatePolicy::ReuseExisting)
            .shorten("https://a.com", "secret")
            .await
            .unwrap();

        assert!(outcome.entry().can_be_modified);
        assert_ne!(outcome.entry().password.as_deref(), Some("secret"));
    }

    #[tokio::test]
    async fn test_shorten_reuses_existing_entry() {
        let mut repo = MockUrlRepository::new();

        let existing = create_test_entry("exist1", "https://a.com", None);
        repo.expect_get_by_url()
            .times(1)
            .returning(move |_| Ok(Some(existing.clone())));
        repo.expect_insert().times(0);

        let outcome = service(repo, DuplicatePolicy::ReuseExisting)
            .shorten("https://a.com", "")
            .await
            .unwrap();

        assert!(!outcome.is_created());
        assert_eq!(outcome.entry().short_id, "exist1");
    }

    #[tokio::test]
    async fn test_shorten_always_create_skips_lookup() {
        let mut repo = MockUrlRepository::new();

        repo.expect_get_by_url().times(0);
        repo.expect_insert().times(1).returning(|new_entry| {
            Ok(UrlEntry::new(
                "new123".to_string(),
                new_entry.url,
                Utc::now(),
                None,
                None,
            ))
        });

        let outcome = service(repo, DuplicatePolicy::AlwaysCreate)
            .shorten("https://a.com", "")
            .await
            .unwrap();

        assert!(outcome.is_created());
    }

    #[tokio::test]
    async fn test_shorten_rejects_invalid_url() {
        let mut repo = MockUrlRepository::new();
        repo.expect_insert().times(0);

        let svc = service(repo, DuplicatePolicy::ReuseExisting);

        let result = svc.shorten("https://evil<host>.com", "").await;
        assert!(matches!(result, Err(AppError::Validation { .. })));

        let result = svc.shorten("   ", "").await;
        assert!(matches!(result, Err(AppError::Validation { .. })));

        let result = svc.shorten("https://exa\nmple.com/a", "").await;
        assert!(matches!(result, Err(AppError::Validation { .. })));
    }

    #[tokio::test]
    async fn test_find_by_url_normalizes_lookup() {
        let mut repo = MockUrlRepository::new();
        let entry = create_test_entry("abc123", "https://a.com/", None);
        repo.expect_get_by_url()
            .withf(|url| url == "https://a.com/")
            .times(1)
            .returning(move |_| Ok(Some(entry.clone())));

        let found = service(repo, DuplicatePolicy::ReuseExisting)
            .find_by_url("a.com")
            .await
            .unwrap();

        assert_eq!(found.unwrap().short_id, "abc123");
    }

    #[tokio::test]
    async fn test_resolve_not_found() {
        let mut repo = MockUrlRepository::new();
        repo.expect_get_by_id()
            .returning(|id| Err(StoreError::NotFound(id.to_string())));

        let result = service(repo, DuplicatePolicy::ReuseExisting)
            .resolve("nope42")
            .await;

        assert!(matches!(result, Err(AppError::NotFound { .. })));
    }

    #[tokio::test]
    async fn test_login_requires_password_on_entry() {
        let mut repo = MockUrlRepository::new();
        let entry = create_test_entry("abc123", "https://a.com", None);
        repo.expect_get_by_id()
            .returning(move |_| Ok(entry.clone()));

        let result = service(repo, DuplicatePolicy::ReuseExisting)
            .login("abc123", "anything")
            .await;

        assert!(matches!(result, Err(AppError::Forbidden { .. })));
    }

    #[tokio::test]
    async fn test_login_wrong_password() {
        let mut repo = MockUrlRepository::new();
        let entry = create_test_entry("abc123", "https://a.com", Some("secret"));
        repo.expect_get_by_id()
            .returning(move |_| Ok(entry.clone()));

        let svc = service(repo, DuplicatePolicy::ReuseExisting);

        assert!(matches!(
            svc.login("abc123", "wrong").await,
            Err(AppError::Unauthorized { .. })
        ));
        assert!(matches!(
            svc.login("abc123", "").await,
            Err(AppError::Unauthorized { .. })
        ));
    }

    #[tokio::test]
    async fn test_login_then_modify_with_token() {
        let mut repo = MockUrlRepository::new();
        let entry = create_test_entry("abc123", "https://a.com", Some("secret"));
        repo.expect_get_by_id()
            .returning(move |_| Ok(entry.clone()));
        repo.expect_update()
            .withf(|entry, record| entry.url == "https://b.com/" && *record)
            .times(1)
            .returning(|mut entry, _| {
                entry.last_modified = Some(Utc::now());
                Ok(entry)
            });

        let svc = service(repo, DuplicatePolicy::ReuseExisting);
        let grant = svc.login("abc123", "secret").await.unwrap();

        let updated = svc
            .modify(
                "abc123",
                EditCredential::Token(grant.token),
                EntryChanges {
                    url: Some("b.com".to_string()),
                    new_password: None,
                },
            )
            .await
            .unwrap();

        assert_eq!(updated.url, "https://b.com/");
        assert!(updated.last_modified.is_some());
    }

    #[tokio::test]
    async fn test_modify_with_wrong_password_does_not_update() {
        let mut repo = MockUrlRepository::new();
        let entry = create_test_entry("abc123", "https://a.com", Some("secret"));
        repo.expect_get_by_id()
            .returning(move |_| Ok(entry.clone()));
        repo.expect_update().times(0);

        let result = service(repo, DuplicatePolicy::ReuseExisting)
            .modify(
                "abc123",
                EditCredential::Password("wrong".to_string()),
                EntryChanges {
                    url: Some("https://b.com".to_string()),
                    new_password: None,
                },
            )
            .await;

        assert!(matches!(result, Err(AppError::Unauthorized { .. })));
    }

    #[tokio::test]
    async fn test_modify_unmodifiable_entry_is_forbidden() {
        let mut repo = MockUrlRepository::new();
        let entry = create_test_entry("abc123", "https://a.com", None);
        repo.expect_get_by_id()
            .returning(move |_| Ok(entry.clone()));
        repo.expect_update().times(0);

        let result = service(repo, DuplicatePolicy::ReuseExisting)
            .modify(
                "abc123",
                EditCredential::Password(String::new()),
                EntryChanges {
                    url: Some("https://b.com".to_string()),
                    new_password: None,
                },
            )
            .await;

        assert!(matches!(result, Err(AppError::Forbidden { .. })));
    }

    #[tokio::test]
    async fn test_modify_same_url_is_rejected() {
        let mut repo = MockUrlRepository::new();
        let entry = create_test_entry("abc123", "https://a.com/", Some("secret"));
        repo.expect_get_by_id()
            .returning(move |_| Ok(entry.clone()));
        repo.expect_update().times(0);

        let result = service(repo, DuplicatePolicy::ReuseExisting)
            .modify(
                "abc123",
                EditCredential::Password("secret".to_string()),
                EntryChanges {
                    url: Some("https://a.com".to_string()),
                    new_password: None,
                },
            )
            .await;

        let err = result.unwrap_err();
        assert!(err.to_string().contains("same"));
    }

    #[tokio::test]
    async fn test_modify_can_disable_editing() {
        let mut repo = MockUrlRepository::new();
        let entry = create_test_entry("abc123", "https://a.com", Some("secret"));
        repo.expect_get_by_id()
            .returning(move |_| Ok(entry.clone()));
        repo.expect_update()
            .withf(|entry, _| entry.password.is_none() && !entry.can_be_modified)
            .times(1)
            .returning(|entry, _| Ok(entry));

        let updated = service(repo, DuplicatePolicy::ReuseExisting)
            .modify(
                "abc123",
                EditCredential::Password("secret".to_string()),
                EntryChanges {
                    url: None,
                    new_password: Some(String::new()),
                },
            )
            .await
            .unwrap();

        assert!(!updated.can_be_modified);
    }

    #[tokio::test]
    async fn test_reset_password_does_not_record_timestamp() {
        let mut repo = MockUrlRepository::new();
        let entry = create_test_entry("abc123", "https://a.com", None);
        repo.expect_get_by_id()
            .returning(move |_| Ok(entry.clone()));
        repo.expect_update()
            .withf(|entry, record| entry.can_be_modified && !*record)
            .times(1)
            .returning(|entry, _| Ok(entry));

        let updated = service(repo, DuplicatePolicy::ReuseExisting)
            .reset_password("abc123", "fresh")
            .await
            .unwrap();

        assert!(compare_password("fresh", updated.password.as_deref().unwrap()).unwrap());
    }

    #[test]
    fn test_short_url() {
        let svc = service(MockUrlRepository::new(), DuplicatePolicy::ReuseExisting);
        assert_eq!(
            svc.short_url("https://s.example.com/", "abc123"),
            "https://s.example.com/abc123"
        );
    }

    #[test]
    fn test_parse_duplicate_policy() {
        assert_eq!(
            "reuse".parse::<DuplicatePolicy>().unwrap(),
            DuplicatePolicy::ReuseExisting
        );
        assert_eq!(
            "ALWAYS_NEW".parse::<DuplicatePolicy>().unwrap(),
            DuplicatePolicy::AlwaysCreate
        );
        assert!("sometimes".parse::<DuplicatePolicy>().is_err());
    }
}
