//! Out-of-band verification: one-time codes and notice dispatch.

mod codes;

pub use codes::{generate_code, hash_secret, CODE_LENGTH};

use crate::error::RegistrationError;
use crate::registry::IdentityRecord;
use async_trait::async_trait;
use serde::Serialize;
use tracing::info;

/// Delivery channel for a verification notice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Channel {
    Email,
    Sms,
}

/// A verification message to deliver to a newly registered identity.
#[derive(Clone, PartialEq, Eq)]
pub struct VerificationNotice {
    pub channel: Channel,
    /// Email address or phone number to deliver to
    pub destination: String,
    /// One-time code, present only when codes are required
    pub code: Option<String>,
}

impl VerificationNotice {
    /// Build a notice for a record, preferring email over SMS.
    pub fn for_record(record: &IdentityRecord, code: Option<String>) -> Option<Self> {
        let (channel, destination) = match (&record.email, &record.phone) {
            (Some(email), _) => (Channel::Email, email.clone()),
            (None, Some(phone)) => (Channel::Sms, phone.clone()),
            (None, None) => return None,
        };

        Some(Self {
            channel,
            destination,
            code,
        })
    }
}

impl std::fmt::Debug for VerificationNotice {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("VerificationNotice")
            .field("channel", &self.channel)
            .field("destination", &self.destination)
            .field("code", &self.code.as_ref().map(|_| "[REDACTED]"))
            .finish()
    }
}

/// Delivers verification notices (email, SMS).
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait VerificationDispatcher: Send + Sync {
    /// Deliver a notice. Failures are reported but never fail a registration.
    async fn dispatch(&self, notice: &VerificationNotice) -> Result<(), RegistrationError>;
}

/// Dispatcher used when no delivery channel is configured: logs and drops.
#[derive(Debug, Default, Clone, Copy)]
pub struct LoggingDispatcher;

#[async_trait]
impl VerificationDispatcher for LoggingDispatcher {
    async fn dispatch(&self, notice: &VerificationNotice) -> Result<(), RegistrationError> {
        info!(
            channel = ?notice.channel,
            destination = %notice.destination,
            has_code = notice.code.is_some(),
            "Verification delivery not configured; notice not sent"
        );
        Ok(())
    }
}
