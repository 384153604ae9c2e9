//! Error types for the registration service.

use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use thiserror::Error;
use tracing::error;

/// Registration service error types.
///
/// Display strings are the messages returned to clients, except for the
/// server-side variants which are replaced by a generic message.
#[derive(Debug, Error)]
pub enum RegistrationError {
    #[error("Email or phone required.")]
    MissingIdentifier,

    #[error("Password required.")]
    MissingPassword,

    #[error("Malformed request body: {0}")]
    MalformedBody(String),

    #[error("Email already registered.")]
    EmailTaken,

    #[error("Phone already registered.")]
    PhoneTaken,

    #[error("User not found")]
    NotFound,

    #[error("Invalid or expired verification code.")]
    InvalidCode,

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Verification dispatch failed: {0}")]
    Dispatch(String),

    #[error("Password hashing failed: {0}")]
    PasswordHash(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl RegistrationError {
    /// Stable machine-readable code for the error class.
    pub fn code(&self) -> &'static str {
        match self {
            RegistrationError::MissingIdentifier
            | RegistrationError::MissingPassword
            | RegistrationError::MalformedBody(_)
            | RegistrationError::InvalidCode => "VALIDATION_ERROR",
            RegistrationError::EmailTaken | RegistrationError::PhoneTaken => "CONFLICT",
            RegistrationError::NotFound => "NOT_FOUND",
            RegistrationError::Storage(_)
            | RegistrationError::Dispatch(_)
            | RegistrationError::PasswordHash(_)
            | RegistrationError::Internal(_) => "SERVER_ERROR",
        }
    }

    /// HTTP status for the error class.
    ///
    /// Conflicts are reported as 400 to match what existing clients expect.
    pub fn status(&self) -> StatusCode {
        match self.code() {
            "NOT_FOUND" => StatusCode::NOT_FOUND,
            "SERVER_ERROR" => StatusCode::INTERNAL_SERVER_ERROR,
            _ => StatusCode::BAD_REQUEST,
        }
    }
}

/// Error response body.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub code: String,
}

impl IntoResponse for RegistrationError {
    fn into_response(self) -> Response {
        let status = self.status();

        let message = if status.is_server_error() {
            error!(error = %self, "Request failed with server error");
            "Server error".to_string()
        } else {
            self.to_string()
        };

        let body = ErrorResponse {
            error: message,
            code: self.code().to_string(),
        };

        (status, Json(body)).into_response()
    }
}

impl From<snapshot_store::StoreError> for RegistrationError {
    fn from(e: snapshot_store::StoreError) -> Self {
        RegistrationError::Storage(e.to_string())
    }
}

impl From<argon2::password_hash::Error> for RegistrationError {
    fn from(e: argon2::password_hash::Error) -> Self {
        RegistrationError::PasswordHash(e.to_string())
    }
}

impl From<tokio::task::JoinError> for RegistrationError {
    fn from(e: tokio::task::JoinError) -> Self {
        RegistrationError::Internal(format!("Background task failed: {}", e))
    }
}

impl From<JsonRejection> for RegistrationError {
    fn from(e: JsonRejection) -> Self {
        RegistrationError::MalformedBody(e.body_text())
    }
}
