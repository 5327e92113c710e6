//! Login configuration for the username-password flow.
//!
//! [`AuthConfig`] is immutable once handed to a
//! [`SessionManager`](crate::SessionManager). Its `Debug` output redacts the
//! client secret and the password.

use crate::error::{Error, ErrorKind, Result};
use crate::PRODUCTION_LOGIN_URL;

/// Default OAuth grant type.
pub const DEFAULT_GRANT_TYPE: &str = "password";

/// Credentials and endpoints used to obtain a session.
#[derive(Clone)]
pub struct AuthConfig {
    auth_url: Option<String>,
    grant_type: String,
    client_id: String,
    client_secret: String,
    username: String,
    password: String,
    base_url: String,
    api_version: String,
}

impl std::fmt::Debug for AuthConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthConfig")
            .field("auth_url", &self.auth_url())
            .field("grant_type", &self.grant_type)
            .field("client_id", &self.client_id)
            .field("client_secret", &"[REDACTED]")
            .field("username", &self.username)
            .field("password", &"[REDACTED]")
            .field("base_url", &self.base_url)
            .field("api_version", &self.api_version)
            .finish()
    }
}

impl AuthConfig {
    /// Create a config for the username-password flow against the production login host.
    pub fn new(
        client_id: impl Into<String>,
        client_secret: impl Into<String>,
        username: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        Self {
            auth_url: None,
            grant_type: DEFAULT_GRANT_TYPE.to_string(),
            client_id: client_id.into(),
            client_secret: client_secret.into(),
            username: username.into(),
            password: password.into(),
            base_url: PRODUCTION_LOGIN_URL.to_string(),
            api_version: sf_compose_client::DEFAULT_API_VERSION.to_string(),
        }
    }

    /// Set the token endpoint explicitly.
    pub fn with_auth_url(mut self, auth_url: impl Into<String>) -> Self {
        self.auth_url = Some(auth_url.into());
        self
    }

    /// Set the base URL used to reach the login host.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    /// Set the OAuth grant type.
    pub fn with_grant_type(mut self, grant_type: impl Into<String>) -> Self {
        self.grant_type = grant_type.into();
        self
    }

    /// Set the default API version (`"v62.0"` or `"62.0"`).
    pub fn with_api_version(mut self, version: impl Into<String>) -> Self {
        self.api_version = version.into();
        self
    }

    /// Load the config from environment variables.
    ///
    /// Required:
    /// - `SF_CLIENT_ID` or `SALESFORCE_CLIENT_ID`
    /// - `SF_CLIENT_SECRET` or `SALESFORCE_CLIENT_SECRET`
    /// - `SF_USERNAME` or `SALESFORCE_USERNAME`
    /// - `SF_PASSWORD` or `SALESFORCE_PASSWORD`
    ///
    /// Optional:
    /// - `SF_BASE_URL` (default: <https://login.salesforce.com>)
    /// - `SF_AUTH_URL` (default: `<base_url>/services/oauth2/token`)
    /// - `SF_GRANT_TYPE` (default: `password`)
    /// - `SF_API_VERSION` (default: `v62.0`)
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let var = |name: &str| {
            lookup(&format!("SF_{}", name))
                .or_else(|| lookup(&format!("SALESFORCE_{}", name)))
                .filter(|value| !value.is_empty())
        };
        let required = |name: &str| {
            var(name).ok_or_else(|| Error::new(ErrorKind::EnvVar(format!("SF_{}", name))))
        };

        let mut config = Self::new(
            required("CLIENT_ID")?,
            required("CLIENT_SECRET")?,
            required("USERNAME")?,
            required("PASSWORD")?,
        );

        if let Some(base_url) = var("BASE_URL") {
            config = config.with_base_url(base_url);
        }
        if let Some(auth_url) = var("AUTH_URL") {
            config = config.with_auth_url(auth_url);
        }
        if let Some(grant_type) = var("GRANT_TYPE") {
            config = config.with_grant_type(grant_type);
        }
        if let Some(api_version) = var("API_VERSION") {
            config = config.with_api_version(api_version);
        }

        Ok(config)
    }

    /// Check that every required field is present.
    pub fn validate(&self) -> Result<()> {
        let fields = [
            ("grant_type", &self.grant_type),
            ("client_id", &self.client_id),
            ("client_secret", &self.client_secret),
            ("username", &self.username),
            ("password", &self.password),
            ("base_url", &self.base_url),
            ("api_version", &self.api_version),
        ];

        for (name, value) in fields {
            if value.trim().is_empty() {
                return Err(Error::new(ErrorKind::Config(format!(
                    "{} must not be empty",
                    name
                ))));
            }
        }

        Ok(())
    }

    /// The token endpoint: the explicit one, else `<base_url>/services/oauth2/token`.
    pub fn auth_url(&self) -> String {
        match &self.auth_url {
            Some(url) => url.clone(),
            None => format!("{}/services/oauth2/token", self.base_url),
        }
    }

    /// The OAuth grant type.
    pub fn grant_type(&self) -> &str {
        &self.grant_type
    }

    /// The connected app's client id.
    pub fn client_id(&self) -> &str {
        &self.client_id
    }

    /// The login username.
    pub fn username(&self) -> &str {
        &self.username
    }

    /// The base URL used to reach the login host.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// The default API version.
    pub fn api_version(&self) -> &str {
        &self.api_version
    }

    /// Form fields of the token request, in wire order.
    pub(crate) fn token_form(&self) -> [(&'static str, &str); 5] {
        [
            ("grant_type", self.grant_type.as_str()),
            ("client_id", self.client_id.as_str()),
            ("client_secret", self.client_secret.as_str()),
            ("username", self.username.as_str()),
            ("password", self.password.as_str()),
        ]
    }
}
