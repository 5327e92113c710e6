//! The OAuth 2.0 token exchange.
//!
//! Credentials travel in an `application/x-www-form-urlencoded` body, never in
//! the URL, so they cannot end up in server access logs or error messages.

use serde::{Deserialize, Serialize};
use tracing::instrument;

use sf_compose_client::{ErrorKind as ClientErrorKind, SfHttpClient};

use crate::config::AuthConfig;
use crate::error::{Error, ErrorKind, Result};

/// Token response from the auth endpoint.
///
/// Sensitive fields like `access_token` and `signature` are redacted
/// in Debug output to prevent accidental exposure in logs.
#[derive(Clone, Deserialize, Serialize)]
pub struct TokenResponse {
    /// Access token.
    pub access_token: String,
    /// Instance URL asserted by the server.
    pub instance_url: String,
    /// Identity URL.
    #[serde(default)]
    pub id: Option<String>,
    /// Token type (usually "Bearer").
    #[serde(default)]
    pub token_type: Option<String>,
    /// Issued at timestamp (milliseconds since the epoch, as a string).
    #[serde(default)]
    pub issued_at: Option<String>,
    /// Signature for verification.
    #[serde(default)]
    pub signature: Option<String>,
}

impl std::fmt::Debug for TokenResponse {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenResponse")
            .field("access_token", &"[REDACTED]")
            .field("instance_url", &self.instance_url)
            .field("id", &self.id)
            .field("token_type", &self.token_type)
            .field("issued_at", &self.issued_at)
            .field("signature", &self.signature.as_ref().map(|_| "[REDACTED]"))
            .finish()
    }
}

/// OAuth error response.
#[derive(Debug, Deserialize)]
struct OAuthErrorResponse {
    error: String,
    #[serde(default)]
    error_description: String,
}

/// Perform one login exchange against the configured token endpoint.
#[instrument(skip(http, config), fields(auth_url = %config.auth_url()))]
pub(crate) async fn request_token(http: &SfHttpClient, config: &AuthConfig) -> Result<TokenResponse> {
    let request = http.post(config.auth_url()).form(config.token_form());

    let response = http.execute(request).await.map_err(oauth_error)?;
    let token: TokenResponse = response.json().await?;

    if token.access_token.is_empty() || token.instance_url.is_empty() {
        return Err(Error::new(ErrorKind::Authentication(
            "token response is missing access_token or instance_url".to_string(),
        )));
    }

    Ok(token)
}

/// Map a failed exchange, surfacing the endpoint's `{error, error_description}` when present.
fn oauth_error(err: sf_compose_client::Error) -> Error {
    let oauth = match &err.kind {
        ClientErrorKind::Remote { body, .. } => {
            serde_json::from_value::<OAuthErrorResponse>(body.clone()).ok()
        }
        _ => None,
    };

    match oauth {
        Some(oauth) => Error::with_source(
            ErrorKind::OAuth {
                error: oauth.error,
                description: oauth.error_description,
            },
            err,
        ),
        None => err.into(),
    }
}
