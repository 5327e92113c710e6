//! Lazily authenticated, memoized sessions.
//!
//! A [`SessionManager`] logs in on first use and caches the resulting
//! [`Session`] until [`SessionManager::invalidate`] is called. The cache sits
//! behind an async mutex that is held for the whole login exchange, so
//! concurrent first callers share one exchange instead of racing.

use chrono::{DateTime, Utc};
use tokio::sync::Mutex;
use tracing::{debug, info, instrument, warn};

use sf_compose_client::{ClientConfig, SfHttpClient};

use crate::config::AuthConfig;
use crate::error::Result;
use crate::oauth::{request_token, TokenResponse};

/// An authenticated context: bearer token plus the server-asserted instance URL.
///
/// The access token is redacted in Debug output.
#[derive(Clone, PartialEq, Eq)]
pub struct Session {
    access_token: String,
    instance_url: String,
    issued_at: DateTime<Utc>,
    token_type: Option<String>,
    id: Option<String>,
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("access_token", &"[REDACTED]")
            .field("instance_url", &self.instance_url)
            .field("issued_at", &self.issued_at)
            .field("token_type", &self.token_type)
            .field("id", &self.id)
            .finish()
    }
}

impl Session {
    /// Create a session from known values.
    pub fn new(access_token: impl Into<String>, instance_url: impl Into<String>) -> Self {
        Self {
            access_token: access_token.into(),
            instance_url: instance_url.into().trim_end_matches('/').to_string(),
            issued_at: Utc::now(),
            token_type: None,
            id: None,
        }
    }

    /// The bearer token.
    pub fn access_token(&self) -> &str {
        &self.access_token
    }

    /// The instance URL every API call is made against.
    pub fn instance_url(&self) -> &str {
        &self.instance_url
    }

    /// When the server issued the token, or when it was received if the server did not say.
    pub fn issued_at(&self) -> DateTime<Utc> {
        self.issued_at
    }

    /// Token type reported by the server.
    pub fn token_type(&self) -> Option<&str> {
        self.token_type.as_deref()
    }

    /// Identity URL reported by the server.
    pub fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }
}

impl From<TokenResponse> for Session {
    fn from(token: TokenResponse) -> Self {
        let issued_at = token
            .issued_at
            .as_deref()
            .and_then(|millis| millis.parse::<i64>().ok())
            .and_then(DateTime::from_timestamp_millis)
            .unwrap_or_else(Utc::now);

        Self {
            access_token: token.access_token,
            instance_url: token.instance_url.trim_end_matches('/').to_string(),
            issued_at,
            token_type: token.token_type,
            id: token.id,
        }
    }
}

/// Owns the login configuration and the cached session.
///
/// Share one manager (behind an `Arc`) between every request that should
/// reuse the same session.
///
/// # Example
///
/// ```rust,ignore
/// use sf_compose_auth::{AuthConfig, SessionManager};
///
/// let manager = SessionManager::new(AuthConfig::from_env()?)?;
/// let token = manager.token().await?;        // logs in
/// let again = manager.token().await?;        // cached
/// manager.invalidate().await;                // next call logs in again
/// ```
#[derive(Debug)]
pub struct SessionManager {
    config: AuthConfig,
    http: SfHttpClient,
    session: Mutex<Option<Session>>,
}

impl SessionManager {
    /// Create a manager with a default HTTP client.
    pub fn new(config: AuthConfig) -> Result<Self> {
        let http = SfHttpClient::new(ClientConfig::default())?;
        Self::with_http_client(config, http)
    }

    /// Create a manager sharing an existing HTTP client.
    pub fn with_http_client(config: AuthConfig, http: SfHttpClient) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            config,
            http,
            session: Mutex::new(None),
        })
    }

    /// The login configuration.
    pub fn config(&self) -> &AuthConfig {
        &self.config
    }

    /// The HTTP client used for the login exchange and for API calls.
    pub fn http(&self) -> &SfHttpClient {
        &self.http
    }

    /// The default API version for requests that do not override it.
    pub fn api_version(&self) -> &str {
        self.config.api_version()
    }

    /// Return the cached session, logging in first if there is none.
    ///
    /// A failed login leaves the cache empty; the error is returned and the
    /// next call tries again.
    pub async fn session(&self) -> Result<Session> {
        let mut guard = self.session.lock().await;

        if let Some(session) = guard.as_ref() {
            debug!("Reusing cached session");
            return Ok(session.clone());
        }

        let session = self.authenticate().await?;
        *guard = Some(session.clone());
        Ok(session)
    }

    /// The bearer token of the current session.
    pub async fn token(&self) -> Result<String> {
        Ok(self.session().await?.access_token)
    }

    /// The server-asserted instance URL of the current session.
    pub async fn instance_url(&self) -> Result<String> {
        Ok(self.session().await?.instance_url)
    }

    /// Returns true if a session is cached.
    pub async fn is_authenticated(&self) -> bool {
        self.session.lock().await.is_some()
    }

    /// Drop the cached session; the next access logs in again.
    pub async fn invalidate(&self) {
        if self.session.lock().await.take().is_some() {
            info!("Session invalidated");
        }
    }

    #[instrument(skip(self), fields(username = %self.config.username()))]
    async fn authenticate(&self) -> Result<Session> {
        match request_token(&self.http, &self.config).await {
            Ok(token) => {
                let session = Session::from(token);
                info!(instance_url = %session.instance_url, "Authenticated");
                Ok(session)
            }
            Err(err) => {
                warn!(error = %err, "Authentication failed");
                Err(err)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use std::sync::Arc;
    use wiremock::matchers::{body_string_contains, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn token_body(token: &str) -> serde_json::Value {
        serde_json::json!({
            "access_token": token,
            "instance_url": "https://my.fake.tld/",
            "id": "https://my.fake.tld/id/00D1X0000008bP2UAI/0051t000003LPVHAA4",
            "token_type": "Bearer",
            "issued_at": "1573829868942",
            "signature": "RmFrZSBzaWduYXR1cmU="
        })
    }

    fn manager(server: &MockServer) -> SessionManager {
        let config = AuthConfig::new(
            "fakeClientId",
            "fakeClientSecret",
            "fakeUsername",
            "fakeValidPassword",
        )
        .with_base_url(server.uri())
        .with_api_version("v0.0");

        SessionManager::new(config).unwrap()
    }

    #[tokio::test]
    async fn test_token_fetched_once() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/services/oauth2/token"))
            .and(header("Content-Type", "application/x-www-form-urlencoded"))
            .and(body_string_contains("grant_type=password"))
            .and(body_string_contains("client_id=fakeClientId"))
            .and(body_string_contains("username=fakeUsername"))
            .respond_with(ResponseTemplate::new(200).set_body_json(token_body("fakeAccessToken")))
            .expect(1)
            .mount(&server)
            .await;

        let manager = manager(&server);
        assert!(!manager.is_authenticated().await);

        let token = manager.token().await.unwrap();
        let token_again = manager.token().await.unwrap();

        assert_eq!(token, "fakeAccessToken");
        assert_eq!(token, token_again);
        assert!(manager.is_authenticated().await);
    }

    #[tokio::test]
    async fn test_instance_url_is_server_asserted() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/services/oauth2/token"))
            .respond_with(ResponseTemplate::new(200).set_body_json(token_body("t")))
            .expect(1)
            .mount(&server)
            .await;

        let manager = manager(&server);
        assert_eq!(manager.instance_url().await.unwrap(), "https://my.fake.tld");
        assert_eq!(manager.api_version(), "v0.0");

        let session = manager.session().await.unwrap();
        assert_eq!(session.token_type(), Some("Bearer"));
        assert_eq!(session.issued_at().timestamp_millis(), 1573829868942);
    }

    #[tokio::test]
    async fn test_invalidate_forces_new_login() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/services/oauth2/token"))
            .respond_with(ResponseTemplate::new(200).set_body_json(token_body("fakeAccessToken")))
            .expect(2)
            .mount(&server)
            .await;

        let manager = manager(&server);
        manager.token().await.unwrap();
        manager.invalidate().await;
        assert!(!manager.is_authenticated().await);
        manager.token().await.unwrap();
    }

    #[tokio::test]
    async fn test_failed_login_is_not_cached() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/services/oauth2/token"))
            .respond_with(ResponseTemplate::new(400).set_body_json(serde_json::json!({
                "error": "invalid_grant",
                "error_description": "authentication failure"
            })))
            .expect(2)
            .mount(&server)
            .await;

        let manager = manager(&server);

        let err = manager.token().await.unwrap_err();
        assert!(err.is_authentication());
        assert!(matches!(err.kind, ErrorKind::OAuth { .. }));
        assert!(!err.to_string().contains("fakeValidPassword"));
        assert!(!manager.is_authenticated().await);

        // Nothing cached: the next call performs a fresh exchange.
        assert!(manager.token().await.is_err());
    }

    #[tokio::test]
    async fn test_concurrent_first_calls_share_one_login() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/services/oauth2/token"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(token_body("fakeAccessToken"))
                    .set_delay(std::time::Duration::from_millis(100)),
            )
            .expect(1)
            .mount(&server)
            .await;

        let manager = Arc::new(manager(&server));
        let handles: Vec<_> = (0..8)
            .map(|_| {
                let manager = Arc::clone(&manager);
                tokio::spawn(async move { manager.token().await })
            })
            .collect();

        for handle in handles {
            assert_eq!(handle.await.unwrap().unwrap(), "fakeAccessToken");
        }
    }

    #[test]
    fn test_session_debug_redacts_token() {
        let session = Session::new("super_secret_access_token", "https://na1.salesforce.com/");
        let debug_output = format!("{:?}", session);

        assert_eq!(session.instance_url(), "https://na1.salesforce.com");
        assert!(debug_output.contains("[REDACTED]"));
        assert!(!debug_output.contains("super_secret_access_token"));
    }

    #[test]
    fn test_session_from_token_without_issued_at() {
        let before = Utc::now();
        let session = Session::from(TokenResponse {
            access_token: "t".to_string(),
            instance_url: "https://x.tld".to_string(),
            id: None,
            token_type: None,
            issued_at: Some("not-a-number".to_string()),
            signature: None,
        });

        assert!(session.issued_at() >= before);
    }
}
