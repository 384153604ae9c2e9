//! API request and response types.

use secrecy::SecretString;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Request to register a new identity.
#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    /// Email address (optional if phone is given)
    pub email: Option<String>,

    /// Phone number (optional if email is given)
    pub phone: Option<String>,

    /// Password, hashed before storage
    pub password: Option<SecretString>,
}

/// Request to verify an identity.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VerifyRequest {
    /// Email address or phone number used at registration. Kept as raw
    /// JSON: a value of any other type simply matches no identity.
    pub email_or_phone: Option<Value>,

    /// One-time code, required only when code verification is enabled.
    /// Non-string values count as no code.
    pub code: Option<Value>,
}

impl VerifyRequest {
    /// The submitted identifier, if it is a string.
    pub fn identifier(&self) -> Option<String> {
        match &self.email_or_phone {
            Some(Value::String(s)) => Some(s.clone()),
            _ => None,
        }
    }

    /// The submitted code, if it is a string.
    pub fn code(&self) -> Option<&str> {
        self.code.as_ref().and_then(Value::as_str)
    }
}

/// Plain message response.
#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Health check response.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthResponse {
    pub status: String,
    pub record_count: usize,
    pub verified_count: usize,
    pub persistent: bool,
}
