//! HTTP response handling with Salesforce-specific extensions.

use serde::de::DeserializeOwned;

use crate::error::{Error, ErrorKind, Result};
use crate::security::sanitize_error_message;

/// Wrapper around HTTP response with additional functionality.
#[derive(Debug)]
pub struct Response {
    inner: reqwest::Response,
}

impl Response {
    pub(crate) fn new(inner: reqwest::Response) -> Self {
        Self { inner }
    }

    /// Get the HTTP status code.
    pub fn status(&self) -> u16 {
        self.inner.status().as_u16()
    }

    /// Get the canonical reason phrase for the status ("Bad Request"...).
    pub fn status_text(&self) -> &'static str {
        self.inner.status().canonical_reason().unwrap_or("")
    }

    /// Returns true if the response status is successful (2xx).
    pub fn is_success(&self) -> bool {
        self.inner.status().is_success()
    }

    /// Get the response body as text.
    pub async fn text(self) -> Result<String> {
        self.inner.text().await.map_err(Into::into)
    }

    /// Deserialize the response body as JSON.
    pub async fn json<T: DeserializeOwned>(self) -> Result<T> {
        let text = self.text().await?;
        serde_json::from_str(&text).map_err(Into::into)
    }

    /// Decode the body as a JSON value, mapping an empty body to `null`.
    ///
    /// Record updates and deletes answer `204 No Content`.
    pub async fn json_value(self) -> Result<serde_json::Value> {
        let text = self.text().await?;
        if text.trim().is_empty() {
            return Ok(serde_json::Value::Null);
        }
        serde_json::from_str(&text).map_err(Into::into)
    }
}

/// Extension trait for processing Salesforce API responses.
pub trait ResponseExt {
    /// Turn a non-2xx response into an [`ErrorKind::Remote`] error carrying the decoded body.
    fn check_salesforce_error(self) -> impl std::future::Future<Output = Result<Response>> + Send;
}

impl ResponseExt for Response {
    async fn check_salesforce_error(self) -> Result<Response> {
        if self.is_success() {
            return Ok(self);
        }

        let status = self.status();
        let status_text = self.status_text().to_string();
        let body = self.inner.text().await.map_err(|e| {
            Error::with_source(
                ErrorKind::Connection(format!("reading {} response body: {}", status, e)),
                e,
            )
        })?;

        Err(remote_error(status, status_text, &body))
    }
}

/// Build a remote error from a raw response body.
fn remote_error(status: u16, status_text: String, body: &str) -> Error {
    let body = match serde_json::from_str::<serde_json::Value>(body) {
        Ok(value) => value,
        // Free text may echo request data, so it is sanitized before it is kept.
        Err(_) if body.is_empty() => serde_json::Value::Null,
        Err(_) => serde_json::Value::String(sanitize_error_message(body)),
    };

    Error::new(ErrorKind::Remote {
        status,
        status_text,
        body,
    })
}
