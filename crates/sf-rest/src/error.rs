//! Error types for sf-compose-rest.
//!
//! Every public `execute` either resolves with its typed payload or fails with
//! one of four kinds: authentication, validation, remote (non-2xx) or transport.
//! Building an executor from bad credentials fails earlier with a config error.

use sf_compose_auth::ErrorKind as AuthErrorKind;
use sf_compose_client::{ApiError, ErrorKind as ClientErrorKind};

use crate::composite::CompositeResponse;

/// Result type alias for sf-compose-rest operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error type for sf-compose-rest operations.
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

    pub(crate) fn validation(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Validation(message.into()))
    }

    /// Returns true if a request shape was rejected before any network call.
    pub fn is_validation(&self) -> bool {
        matches!(self.kind, ErrorKind::Validation(_))
    }

    /// Returns true if the server answered with a non-2xx status.
    pub fn is_remote(&self) -> bool {
        matches!(self.kind, ErrorKind::Remote { .. })
    }

    /// Returns true if the login exchange failed.
    pub fn is_authentication(&self) -> bool {
        matches!(self.kind, ErrorKind::Authentication(_))
    }

    /// Returns true if the credentials were rejected before any login attempt.
    pub fn is_config(&self) -> bool {
        matches!(self.kind, ErrorKind::Config(_))
    }

    /// Returns true if no response was received.
    pub fn is_transport(&self) -> bool {
        matches!(self.kind, ErrorKind::Transport(_))
    }

    /// HTTP status of a remote error.
    pub fn status(&self) -> Option<u16> {
        match &self.kind {
            ErrorKind::Remote { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// The decoded `[{message, errorCode, fields?}]` list of a remote error.
    pub fn api_errors(&self) -> &[ApiError] {
        match &self.kind {
            ErrorKind::Remote { errors, .. } => errors,
            _ => &[],
        }
    }

    /// The `compositeResponse` carried by a failed composite request.
    pub fn composite_response(&self) -> Option<&CompositeResponse> {
        match &self.kind {
            ErrorKind::Remote { composite, .. } => composite.as_ref(),
            _ => None,
        }
    }
}

/// The kind of error that occurred.
#[derive(Debug, thiserror::Error)]
pub enum ErrorKind {
    /// The login exchange failed.
    #[error("Authentication error: {0}")]
    Authentication(String),

    /// Credentials are incomplete or could not be read from the environment.
    #[error("Configuration error: {0}")]
    Config(String),

    /// A request violates a documented constraint; nothing was sent.
    #[error("Validation error: {0}")]
    Validation(String),

    /// The server answered with a non-2xx status.
    #[error("{status} {status_text}")]
    Remote {
        status: u16,
        status_text: String,
        /// Standard Salesforce error list; empty when the body has another shape.
        errors: Vec<ApiError>,
        /// Present when the body is a composite response.
        composite: Option<CompositeResponse>,
        /// The decoded body, unchanged.
        body: serde_json::Value,
    },

    /// No response was received (timeout, DNS, refused connection...).
    #[error("Transport error: {0}")]
    Transport(String),

    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    Json(String),
}

impl From<sf_compose_client::Error> for Error {
    fn from(err: sf_compose_client::Error) -> Self {
        let kind = match &err.kind {
            ClientErrorKind::Remote {
                status,
                status_text,
                body,
            } => ErrorKind::Remote {
                status: *status,
                status_text: status_text.clone(),
                errors: ApiError::list_from_value(body),
                composite: CompositeResponse::from_body(body),
                body: body.clone(),
            },
            ClientErrorKind::Json(message) => ErrorKind::Json(message.clone()),
            _ => ErrorKind::Transport(err.to_string()),
        };
        Error::with_source(kind, err)
    }
}

impl From<sf_compose_auth::Error> for Error {
    fn from(err: sf_compose_auth::Error) -> Self {
        let kind = match &err.kind {
            AuthErrorKind::Config(_) | AuthErrorKind::EnvVar(_) => {
                ErrorKind::Config(err.to_string())
            }
            _ => ErrorKind::Authentication(err.to_string()),
        };
        Error::with_source(kind, err)
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::with_source(ErrorKind::Json(err.to_string()), err)
    }
}
