//! Student profile intake API.
//!
//! Collects full student profiles (name, contact, date of birth, address,
//! education) from mobile clients and lists them for administrators. This is
//! a separate record type from registration identities and shares no data
//! with them.

pub mod api;
pub mod config;
pub mod error;
pub mod profiles;

pub use config::Config;
pub use error::ProfileError;
pub use profiles::{FieldErrors, NewStudentProfile, ProfileBook, StudentProfile};
