//! Registration form input.

use crate::error::IntakeError;
use secrecy::{ExposeSecret, SecretString};
use serde::Serialize;

/// Raw registration input as entered.
#[derive(Debug, Clone)]
pub struct RegistrationForm {
    pub email: Option<String>,
    pub phone: Option<String>,
    pub password: SecretString,
}

/// JSON body sent to the registration endpoint. Blank fields are left out.
#[derive(Debug, Serialize, PartialEq, Eq)]
pub(crate) struct RegisterBody<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub password: Option<&'a str>,
}

impl RegistrationForm {
    pub fn new(email: Option<String>, phone: Option<String>, password: String) -> Self {
        Self {
            email,
            phone,
            password: SecretString::new(password),
        }
    }

    /// Check the form locally and build the request body.
    ///
    /// Password strength is left to the server.
    pub(crate) fn to_body(&self) -> Result<RegisterBody<'_>, IntakeError> {
        let email = non_blank(self.email.as_deref());
        let phone = non_blank(self.phone.as_deref());
        if email.is_none() && phone.is_none() {
            return Err(IntakeError::MissingIdentifier);
        }

        Ok(RegisterBody {
            email,
            phone,
            password: non_blank(Some(self.password.expose_secret().as_str())),
        })
    }

    /// Whether the form would be sent.
    pub fn validate(&self) -> Result<(), IntakeError> {
        self.to_body().map(|_| ())
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_requires_email_or_phone() {
        let form = RegistrationForm::new(Some("  ".into()), Some(String::new()), "p".into());
        assert!(matches!(form.validate(), Err(IntakeError::MissingIdentifier)));

        let form = RegistrationForm::new(None, Some("+15550001".into()), "p".into());
        assert!(form.validate().is_ok());
    }

    #[test]
    fn test_blank_fields_omitted() {
        let form = RegistrationForm::new(Some("a@x.com".into()), Some("".into()), "".into());
        let body = serde_json::to_value(form.to_body().unwrap()).unwrap();

        assert_eq!(body, serde_json::json!({"email": "a@x.com"}));
    }

    #[test]
    fn test_password_not_in_debug_output() {
        let form = RegistrationForm::new(Some("a@x.com".into()), None, "hunter2".into());
        assert!(!format!("{:?}", form).contains("hunter2"));
    }
}
