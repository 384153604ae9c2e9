//! Intake client errors.

use thiserror::Error;

/// Shown when the server gives no usable error text.
pub const FALLBACK_MESSAGE: &str = "Registration failed.";

#[derive(Error, Debug)]
pub enum IntakeError {
    #[error("Please enter email or phone.")]
    MissingIdentifier,

    #[error("{0}")]
    Rejected(String),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
}

impl IntakeError {
    /// Text to show the person filling in the form.
    ///
    /// Transport failures collapse to the generic fallback.
    pub fn user_message(&self) -> String {
        match self {
            IntakeError::Http(_) => FALLBACK_MESSAGE.to_string(),
            other => other.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_messages() {
        assert_eq!(
            IntakeError::MissingIdentifier.user_message(),
            "Please enter email or phone."
        );
        assert_eq!(
            IntakeError::Rejected("Email already registered.".into()).user_message(),
            "Email already registered."
        );
    }
}
