//! Error types for sf-compose-auth.
//!
//! Error messages are designed to avoid exposing sensitive credential data.

/// Result type alias for sf-compose-auth operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error type for sf-compose-auth operations.
///
/// Error messages are sanitized to prevent accidental credential exposure.
#[derive(Debug, thiserror::Error)]
#[error("{kind}")]
pub struct Error {
    /// The kind of error that occurred.
    pub kind: ErrorKind,
    /// Optional source error.
    #[source]
    pub source: Option<Box<dyn std::error::Error + Send + Sync>>,
}

impl Error {
    /// Create a new error with the given kind.
    pub fn new(kind: ErrorKind) -> Self {
        Self { kind, source: None }
    }

    /// Create a new error with the given kind and source.
    pub fn with_source(
        kind: ErrorKind,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self {
            kind,
            source: Some(Box::new(source)),
        }
    }

    /// Returns true if the login exchange itself failed.
    pub fn is_authentication(&self) -> bool {
        matches!(
            self.kind,
            ErrorKind::Authentication(_) | ErrorKind::OAuth { .. }
        )
    }
}

/// The kind of error that occurred.
///
/// Error messages avoid including credential values.
#[derive(Debug, thiserror::Error)]
pub enum ErrorKind {
    /// The login exchange failed (transport failure or unusable response).
    #[error("Authentication failed: {0}")]
    Authentication(String),

    /// OAuth error response from the auth endpoint.
    #[error("OAuth error: {error} - {description}")]
    OAuth { error: String, description: String },

    /// Invalid credentials configuration.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Environment variable not set.
    #[error("Environment variable not set: {0}")]
    EnvVar(String),

    /// JSON error.
    #[error("JSON error: {0}")]
    Json(String),
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::with_source(ErrorKind::Json(err.to_string()), err)
    }
}

impl From<sf_compose_client::Error> for Error {
    fn from(err: sf_compose_client::Error) -> Self {
        let message = sf_compose_client::security::sanitize_error_message(&err.to_string());
        Error::with_source(ErrorKind::Authentication(message), err)
    }
}
