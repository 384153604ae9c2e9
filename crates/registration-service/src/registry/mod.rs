//! Identity registry with snapshot persistence.

mod memory;

pub use memory::Registry;

use crate::error::RegistrationError;
use crate::verification::hash_secret;
use argon2::{
    password_hash::{rand_core::OsRng, PasswordHasher, SaltString},
    Argon2,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// One-time verification code awaiting use.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct PendingCode {
    /// SHA-256 hex digest of the code
    pub code_hash: String,
    /// Code is rejected at or after this instant
    pub expires_at: DateTime<Utc>,
}

/// A registered identity.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IdentityRecord {
    pub id: Uuid,

    /// Email address, unique across the registry when present
    #[serde(default)]
    pub email: Option<String>,

    /// Phone number, unique across the registry when present
    #[serde(default)]
    pub phone: Option<String>,

    /// Argon2id PHC string of the submitted password
    pub credential_hash: String,

    #[serde(default)]
    pub verified: bool,

    pub registered_at: DateTime<Utc>,

    #[serde(default)]
    pub verified_at: Option<DateTime<Utc>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pending_code: Option<PendingCode>,
}

impl IdentityRecord {
    /// Create a new unverified record.
    pub fn new_pending(email: Option<String>, phone: Option<String>, credential_hash: String) -> Self {
        Self {
            id: Uuid::new_v4(),
            email,
            phone,
            credential_hash,
            verified: false,
            registered_at: Utc::now(),
            verified_at: None,
            pending_code: None,
        }
    }

    /// Attach a one-time code that expires after `ttl`.
    pub fn issue_code(&mut self, code: &str, ttl: std::time::Duration) {
        let ttl = chrono::Duration::from_std(ttl).unwrap_or(chrono::Duration::MAX);
        let expires_at = Utc::now()
            .checked_add_signed(ttl)
            .unwrap_or(DateTime::<Utc>::MAX_UTC);

        self.pending_code = Some(PendingCode {
            code_hash: hash_secret(code),
            expires_at,
        });
    }

    /// Check a submitted code against the pending one.
    pub fn code_matches(&self, code: Option<&str>, now: DateTime<Utc>) -> bool {
        match (&self.pending_code, code) {
            (Some(pending), Some(code)) => {
                now < pending.expires_at && hash_secret(code.trim()) == pending.code_hash
            }
            _ => false,
        }
    }

    /// Whether the pending code is missing or past its expiry.
    pub fn code_expired(&self, now: DateTime<Utc>) -> bool {
        self.pending_code
            .as_ref()
            .map_or(true, |pending| now >= pending.expires_at)
    }

    /// Mark the identity as verified.
    ///
    /// Returns `false` if it was already verified.
    pub fn mark_verified(&mut self, now: DateTime<Utc>) -> bool {
        if self.verified {
            return false;
        }
        self.verified = true;
        self.verified_at = Some(now);
        self.pending_code = None;
        true
    }
}

/// Normalize an optional identifier: trim, and treat blank as absent.
pub fn normalize_identifier(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Hash a password with Argon2id and a fresh random salt.
pub fn hash_password(password: &str) -> Result<String, RegistrationError> {
    let salt = SaltString::generate(&mut OsRng);
    let hash = Argon2::default().hash_password(password.as_bytes(), &salt)?;
    Ok(hash.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use argon2::{PasswordHash, PasswordVerifier};
    use std::time::Duration;

    #[test]
    fn test_normalize_identifier() {
        assert_eq!(normalize_identifier(None), None);
        assert_eq!(normalize_identifier(Some("".into())), None);
        assert_eq!(normalize_identifier(Some("   ".into())), None);
        assert_eq!(
            normalize_identifier(Some("  a@x.com ".into())),
            Some("a@x.com".into())
        );
    }

    #[test]
    fn test_hash_password_is_salted_and_verifiable() {
        let hash1 = hash_password("p").unwrap();
        let hash2 = hash_password("p").unwrap();

        assert_ne!(hash1, hash2);
        assert!(hash1.starts_with("$argon2id$"));

        let parsed = PasswordHash::new(&hash1).unwrap();
        assert!(Argon2::default().verify_password(b"p", &parsed).is_ok());
        assert!(Argon2::default().verify_password(b"q", &parsed).is_err());
    }

    #[test]
    fn test_mark_verified_once() {
        let mut record = IdentityRecord::new_pending(Some("a@x.com".into()), None, "h".into());
        assert!(!record.verified);

        let first = Utc::now();
        assert!(record.mark_verified(first));
        assert!(record.verified);
        assert_eq!(record.verified_at, Some(first));

        assert!(!record.mark_verified(first + chrono::Duration::seconds(5)));
        assert_eq!(record.verified_at, Some(first));
    }

    #[test]
    fn test_code_matches() {
        let mut record = IdentityRecord::new_pending(None, Some("+15550001".into()), "h".into());
        let now = Utc::now();

        assert!(!record.code_matches(Some("123456"), now));

        record.issue_code("123456", Duration::from_secs(60));
        assert!(record.code_matches(Some("123456"), now));
        assert!(record.code_matches(Some(" 123456 "), now));
        assert!(!record.code_matches(Some("654321"), now));
        assert!(!record.code_matches(None, now));
        assert!(!record.code_matches(Some("123456"), now + chrono::Duration::seconds(61)));
    }

    #[test]
    fn test_code_expired() {
        let mut record = IdentityRecord::new_pending(Some("a@x.com".into()), None, "h".into());
        let now = Utc::now();
        assert!(record.code_expired(now));

        record.issue_code("123456", Duration::from_secs(60));
        assert!(!record.code_expired(now));
        assert!(record.code_expired(now + chrono::Duration::seconds(61)));
    }

    #[test]
    fn test_mark_verified_clears_code() {
        let mut record = IdentityRecord::new_pending(Some("a@x.com".into()), None, "h".into());
        record.issue_code("123456", Duration::from_secs(60));

        record.mark_verified(Utc::now());
        assert!(record.pending_code.is_none());
    }

    #[test]
    fn test_record_serialization() {
        let record = IdentityRecord::new_pending(Some("a@x.com".into()), None, "h".into());
        let json = serde_json::to_value(&record).unwrap();

        assert_eq!(json["email"], "a@x.com");
        assert!(json["phone"].is_null());
        assert_eq!(json["credentialHash"], "h");
        assert_eq!(json["verified"], false);
        assert!(json.get("pendingCode").is_none());
    }
}
