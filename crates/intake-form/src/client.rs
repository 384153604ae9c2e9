//! Registration service HTTP client.

use crate::error::{IntakeError, FALLBACK_MESSAGE};
use crate::form::RegistrationForm;
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;
use tracing::{debug, instrument, warn};

/// Registration service address used when none is given.
pub const DEFAULT_SERVER_URL: &str = "http://localhost:5000";

#[derive(Debug, Deserialize)]
struct MessageBody {
    message: String,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    error: Option<String>,
}

/// Client for the registration endpoint.
#[derive(Clone)]
pub struct IntakeClient {
    client: Client,
    base_url: String,
}

impl IntakeClient {
    pub fn new(base_url: impl Into<String>) -> Result<Self, IntakeError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .build()?;

        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Submit a registration and return the server's confirmation message.
    ///
    /// Nothing is sent when the form fails local validation. A rejection
    /// carries the server's `error` text, or the generic fallback when the
    /// body has none.
    #[instrument(skip(self, form))]
    pub async fn submit(&self, form: &RegistrationForm) -> Result<String, IntakeError> {
        let body = form.to_body()?;

        let response = self
            .client
            .post(format!("{}/api/register", self.base_url))
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            let message = serde_json::from_str::<ErrorBody>(&text)
                .ok()
                .and_then(|b| b.error)
                .filter(|e| !e.trim().is_empty())
                .unwrap_or_else(|| FALLBACK_MESSAGE.to_string());
            warn!(%status, "Registration rejected: {}", message);
            return Err(IntakeError::Rejected(message));
        }

        let body: MessageBody = response.json().await?;
        debug!(%status, "Registration accepted");
        Ok(body.message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_trailing_slash_trimmed() {
        let client = IntakeClient::new("http://localhost:5000/").unwrap();
        assert_eq!(client.base_url(), "http://localhost:5000");
    }
}
