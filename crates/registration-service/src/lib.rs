//! Student registration service.
//!
//! Accepts identity registrations keyed by email and/or phone number:
//! - Rejects duplicate emails and phone numbers at insert time
//! - Stores only an Argon2id hash of the submitted password
//! - Marks identities as verified, optionally behind a one-time code

pub mod api;
pub mod config;
pub mod error;
pub mod registry;
pub mod verification;

pub use config::Config;
pub use error::RegistrationError;
pub use registry::{IdentityRecord, Registry};
pub use verification::{LoggingDispatcher, VerificationDispatcher, VerificationNotice};
