//! Edit-password hashing and verification.
//!
//! Uses Argon2id with a fresh random salt per hash. Digests are stored as PHC
//! strings (`$argon2id$v=19$...`), which carry their own salt and parameters.
//!
//! An empty password means "editing disabled" and is never hashed; use
//! [`hash_optional_password`] at call sites that accept user input.
//!
//! Each hash or verify costs tens of milliseconds of CPU. Async callers use the
//! `*_async` variants, which run on tokio's blocking pool.

use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};

/// Errors that can occur while hashing or verifying a password.
#[derive(Debug, thiserror::Error)]
pub enum PasswordError {
    #[error("Password hash error: {0}")]
    Hash(String),

    #[error("Password verify error: {0}")]
    Verify(String),

    #[error("Password task failed: {0}")]
    Task(String),
}

/// Hashes a plaintext password with Argon2id and a fresh salt.
///
/// Hashing the same plaintext twice yields different digests.
///
/// # Errors
///
/// Returns [`PasswordError::Hash`] if the hasher rejects the input.
pub fn hash_password(password: &str) -> Result<String, PasswordError> {
    let salt = SaltString::generate(&mut OsRng);

    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| PasswordError::Hash(e.to_string()))
}

/// Verifies a plaintext password against a stored digest.
///
/// Comparison is delegated to the Argon2 verifier, which compares in
/// constant time. A mismatch is `Ok(false)`.
///
/// # Errors
///
/// Returns [`PasswordError::Verify`] if `digest` is not a valid PHC string.
pub fn compare_password(password: &str, digest: &str) -> Result<bool, PasswordError> {
    let parsed = PasswordHash::new(digest).map_err(|e| PasswordError::Verify(e.to_string()))?;

    Ok(Argon2::default()
        .verify_password(password.as_bytes(), &parsed)
        .is_ok())
}

/// Hashes user input, mapping the empty string to `None` (editing disabled).
pub fn hash_optional_password(password: &str) -> Result<Option<String>, PasswordError> {
    if password.is_empty() {
        return Ok(None);
    }
    hash_password(password).map(Some)
}

/// [`hash_optional_password`] on the blocking thread pool.
///
/// # Errors
///
/// Returns [`PasswordError::Task`] if the blocking task panics or is cancelled.
pub async fn hash_optional_password_async(password: &str) -> Result<Option<String>, PasswordError> {
    if password.is_empty() {
        return Ok(None);
    }

    let password = password.to_string();
    tokio::task::spawn_blocking(move || hash_password(&password).map(Some))
        .await
        .map_err(|e| PasswordError::Task(e.to_string()))?
}

/// [`compare_password`] on the blocking thread pool.
///
/// # Errors
///
/// Returns [`PasswordError::Verify`] for a malformed digest and
/// [`PasswordError::Task`] if the blocking task panics or is cancelled.
pub async fn compare_password_async(password: &str, digest: &str) -> Result<bool, PasswordError> {
    let password = password.to_string();
    let digest = digest.to_string();
    tokio::task::spawn_blocking(move || compare_password(&password, &digest))
        .await
        .map_err(|e| PasswordError::Task(e.to_string()))?
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicBool, Ordering};

    #[test]
    fn test_hash_and_verify() {
        let hash = hash_password("secret").expect("hash should succeed");

        assert!(hash.starts_with("$argon2id$"));
        assert!(compare_password("secret", &hash).expect("verify should succeed"));
    }

    #[test]
    fn test_wrong_password_does_not_verify() {
        let hash = hash_password("secret").unwrap();

        assert!(!compare_password("Secret", &hash).unwrap());
        assert!(!compare_password("", &hash).unwrap());
    }

    #[test]
    fn test_salts_differ_between_calls() {
        let first = hash_password("same-input").unwrap();
        let second = hash_password("same-input").unwrap();

        assert_ne!(first, second);
        assert!(compare_password("same-input", &first).unwrap());
        assert!(compare_password("same-input", &second).unwrap());
    }

    #[test]
    fn test_malformed_digest_is_an_error() {
        let result = compare_password("secret", "not-a-phc-string");
        assert!(matches!(result, Err(PasswordError::Verify(_))));
    }

    #[test]
    fn test_hash_optional_password_skips_empty() {
        assert!(hash_optional_password("").unwrap().is_none());

        let hash = hash_optional_password("pw").unwrap().unwrap();
        assert!(compare_password("pw", &hash).unwrap());
    }

    #[tokio::test]
    async fn test_async_variants_match_sync_behaviour() {
        assert!(hash_optional_password_async("").await.unwrap().is_none());

        let hash = hash_optional_password_async("pw").await.unwrap().unwrap();
        assert!(compare_password_async("pw", &hash).await.unwrap());
        assert!(!compare_password_async("PW", &hash).await.unwrap());
        assert!(matches!(
            compare_password_async("pw", "not-a-phc-string").await,
            Err(PasswordError::Verify(_))
        ));
    }

    #[tokio::test(flavor = "current_thread")]
    async fn test_async_hash_does_not_block_the_runtime() {
        let other_ran = AtomicBool::new(false);

        let (seen_during_hash, ()) = tokio::join!(
            async {
                hash_optional_password_async("secret").await.unwrap();
                other_ran.load(Ordering::SeqCst)
            },
            async {
                other_ran.store(true, Ordering::SeqCst);
            }
        );

        // The single runtime thread was free while the hash was computed
        assert!(seen_during_hash);
    }
}
