//! Error types for the profile intake API.

use crate::profiles::FieldErrors;
use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use thiserror::Error;
use tracing::error;

/// Profile intake error types.
#[derive(Debug, Error)]
pub enum ProfileError {
    #[error("Validation failed")]
    Validation(FieldErrors),

    #[error("Malformed request body: {0}")]
    MalformedBody(String),

    #[error("Email already registered.")]
    DuplicateEmail,

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Profile id space exhausted")]
    IdsExhausted,
}

impl ProfileError {
    pub fn code(&self) -> &'static str {
        match self {
            ProfileError::Validation(_) | ProfileError::MalformedBody(_) => "VALIDATION_ERROR",
            ProfileError::DuplicateEmail => "CONFLICT",
            ProfileError::Storage(_) | ProfileError::IdsExhausted => "SERVER_ERROR",
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            ProfileError::Storage(_) | ProfileError::IdsExhausted => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
            _ => StatusCode::BAD_REQUEST,
        }
    }
}

/// Error response body.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub code: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub errors: Option<FieldErrors>,
}

impl IntoResponse for ProfileError {
    fn into_response(self) -> Response {
        let status = self.status();
        let code = self.code().to_string();

        let body = match self {
            ProfileError::Validation(errors) => ErrorResponse {
                error: "Validation failed".to_string(),
                code,
                errors: Some(errors),
            },
            other if status.is_server_error() => {
                error!(error = %other, "Request failed with server error");
                ErrorResponse {
                    error: "Server error".to_string(),
                    code,
                    errors: None,
                }
            }
            other => ErrorResponse {
                error: other.to_string(),
                code,
                errors: None,
            },
        };

        (status, Json(body)).into_response()
    }
}

impl From<FieldErrors> for ProfileError {
    fn from(errors: FieldErrors) -> Self {
        ProfileError::Validation(errors)
    }
}

impl From<snapshot_store::StoreError> for ProfileError {
    fn from(e: snapshot_store::StoreError) -> Self {
        ProfileError::Storage(e.to_string())
    }
}

impl From<JsonRejection> for ProfileError {
    fn from(e: JsonRejection) -> Self {
        ProfileError::MalformedBody(e.body_text())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::Value;

    async fn body_json(response: Response) -> Value {
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&body).unwrap()
    }

    #[tokio::test]
    async fn test_validation_error_lists_fields() {
        let mut errors = FieldErrors::default();
        errors.add("fullName", "The fullName field is required.");

        let response = ProfileError::from(errors).into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let json = body_json(response).await;
        assert_eq!(json["error"], "Validation failed");
        assert_eq!(json["code"], "VALIDATION_ERROR");
        assert_eq!(json["errors"]["fullName"][0], "The fullName field is required.");
    }

    #[tokio::test]
    async fn test_server_error_hides_detail() {
        let response = ProfileError::Storage("disk full".into()).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let json = body_json(response).await;
        assert_eq!(json["error"], "Server error");
        assert!(json.get("errors").is_none());
    }

    #[test]
    fn test_duplicate_email_is_conflict() {
        assert_eq!(ProfileError::DuplicateEmail.status(), StatusCode::BAD_REQUEST);
        assert_eq!(ProfileError::DuplicateEmail.code(), "CONFLICT");
    }
}
