//! Registration intake client.
//!
//! Collects email, phone and password, checks locally that at least one
//! contact identifier is present, and submits the registration to the
//! registration service.
//!
//! # Example
//!
//! ```no_run
//! use intake_form::{IntakeClient, RegistrationForm};
//!
//! # async fn run() -> Result<(), intake_form::IntakeError> {
//! let client = IntakeClient::new("http://localhost:5000")?;
//! let form = RegistrationForm::new(Some("a@x.com".into()), None, "p".into());
//!
//! let message = client.submit(&form).await?;
//! println!("{message}");
//! # Ok(())
//! # }
//! ```

mod client;
mod error;
mod form;

pub use client::{IntakeClient, DEFAULT_SERVER_URL};
pub use error::{IntakeError, FALLBACK_MESSAGE};
pub use form::RegistrationForm;
