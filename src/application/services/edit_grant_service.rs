//! Signed, expiring edit grants.
//!
//! A successful password login yields a bearer token that authorizes edits of
//! one entry until it expires. The token is
//!
//! ```text
//! base64url(short_id) "." expires_unix "." hex(hmac_sha256)
//! ```
//!
//! The MAC covers the identifier, the expiry and the entry's current password
//! digest, so changing the password revokes every outstanding grant.

use base64::Engine as _;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use chrono::{DateTime, Duration, Utc};
use hmac::{Hmac, Mac};
use sha2::Sha256;

use crate::domain::entities::UrlEntry;

type HmacSha256 = Hmac<Sha256>;

/// Longest accepted grant lifetime (30 days).
const MAX_TTL_SECONDS: u64 = 30 * 24 * 3600;

/// An issued edit token with its expiry.
#[derive(Debug, Clone)]
pub struct EditGrant {
    pub token: String,
    pub expires_at: DateTime<Utc>,
}

/// Issues and verifies edit grants with a process-wide signing secret.
///
/// The secret comes from configuration and is passed in at construction;
/// there is no global key.
#[derive(Clone)]
pub struct EditGrantService {
    signing_secret: String,
    ttl: Duration,
}

impl EditGrantService {
    /// Creates a new grant service.
    ///
    /// # Arguments
    ///
    /// - `signing_secret` - HMAC key; tokens signed with another key never verify
    /// - `ttl_seconds` - lifetime of issued tokens, capped at 30 days
    pub fn new(signing_secret: String, ttl_seconds: u64) -> Self {
        let ttl = Duration::seconds(ttl_seconds.min(MAX_TTL_SECONDS) as i64);
        Self {
            signing_secret,
            ttl,
        }
    }

    fn mac(&self, short_id: &str, expires: i64, digest: &str) -> HmacSha256 {
        let mut mac = HmacSha256::new_from_slice(self.signing_secret.as_bytes())
            .expect("HMAC accepts any key length");
        mac.update(short_id.as_bytes());
        mac.update(b"\0");
        mac.update(expires.to_string().as_bytes());
        mac.update(b"\0");
        mac.update(digest.as_bytes());
        mac
    }

    /// Issues a grant for an editable entry.
    ///
    /// Returns `None` if the entry has no password.
    pub fn issue(&self, entry: &UrlEntry) -> Option<EditGrant> {
        self.issue_at(entry, Utc::now())
    }

    fn issue_at(&self, entry: &UrlEntry, now: DateTime<Utc>) -> Option<EditGrant> {
        let digest = entry.password.as_deref()?;
        let expires_at = now + self.ttl;
        let expires = expires_at.timestamp();

        let signature = hex::encode(
            self.mac(&entry.short_id, expires, digest)
                .finalize()
                .into_bytes(),
        );
        let token = format!(
            "{}.{}.{}",
            URL_SAFE_NO_PAD.encode(entry.short_id.as_bytes()),
            expires,
            signature
        );

        Some(EditGrant { token, expires_at })
    }

    /// Checks that `token` was issued for `entry`, has not expired, and was
    /// signed while the entry had its current password.
    pub fn verify(&self, entry: &UrlEntry, token: &str) -> bool {
        self.verify_at(entry, token, Utc::now())
    }

    fn verify_at(&self, entry: &UrlEntry, token: &str, now: DateTime<Utc>) -> bool {
        let Some(digest) = entry.password.as_deref() else {
            return false;
        };

        let mut parts = token.splitn(3, '.');
        let (Some(encoded_id), Some(expires), Some(signature)) =
            (parts.next(), parts.next(), parts.next())
        else {
            return false;
        };

        let id_matches = URL_SAFE_NO_PAD
            .decode(encoded_id)
            .is_ok_and(|id| id == entry.short_id.as_bytes());
        if !id_matches {
            return false;
        }

        let Ok(expires) = expires.parse::<i64>() else {
            return false;
        };
        if now.timestamp() >= expires {
            return false;
        }

        let Ok(signature) = hex::decode(signature) else {
            return false;
        };

        self.mac(&entry.short_id, expires, digest)
            .verify_slice(&signature)
            .is_ok()
    }
}
