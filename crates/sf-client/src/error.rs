//! Error types for sf-compose-client.

use serde::Deserialize;

/// Result type alias for sf-compose-client operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error type for sf-compose-client operations.
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

    /// Returns true if no HTTP response was received (timeout, DNS, refused connection...).
    pub fn is_transport(&self) -> bool {
        matches!(
            self.kind,
            ErrorKind::Timeout | ErrorKind::Connection(_) | ErrorKind::Other(_)
        )
    }

    /// Returns true if the server answered with a non-2xx status.
    pub fn is_remote(&self) -> bool {
        matches!(self.kind, ErrorKind::Remote { .. })
    }

    /// HTTP status of a remote error.
    pub fn status(&self) -> Option<u16> {
        match &self.kind {
            ErrorKind::Remote { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Decoded body of a remote error.
    pub fn body(&self) -> Option<&serde_json::Value> {
        match &self.kind {
            ErrorKind::Remote { body, .. } => Some(body),
            _ => None,
        }
    }

    /// Decode the body of a remote error as the standard Salesforce error list.
    ///
    /// Returns an empty list when the body has a different shape (a composite
    /// response, an OAuth error object, plain text).
    pub fn api_errors(&self) -> Vec<ApiError> {
        self.body().map(ApiError::list_from_value).unwrap_or_default()
    }
}

/// The kind of error that occurred.
#[derive(Debug, thiserror::Error)]
pub enum ErrorKind {
    /// Request timeout.
    #[error("Request timeout")]
    Timeout,

    /// Connection error.
    #[error("Connection error: {0}")]
    Connection(String),

    /// The server answered with a non-2xx status.
    #[error("HTTP error: {status} {status_text}")]
    Remote {
        status: u16,
        status_text: String,
        /// Response body, decoded as JSON when possible, otherwise a JSON string.
        body: serde_json::Value,
    },

    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    Json(String),

    /// Invalid URL.
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    /// Invalid configuration.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Other error.
    #[error("{0}")]
    Other(String),
}

/// One entry of a Salesforce error body.
///
/// Non-2xx responses from the REST API carry an ordered list of these.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, serde::Serialize)]
pub struct ApiError {
    pub message: String,
    #[serde(rename = "errorCode")]
    pub error_code: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fields: Option<Vec<String>>,
}

impl ApiError {
    /// Decode a JSON value as an error list, accepting a single error object too.
    pub fn list_from_value(value: &serde_json::Value) -> Vec<ApiError> {
        if let Ok(errors) = serde_json::from_value::<Vec<ApiError>>(value.clone()) {
            return errors;
        }
        serde_json::from_value::<ApiError>(value.clone())
            .map(|err| vec![err])
            .unwrap_or_default()
    }
}

impl From<reqwest::Error> for Error {
    fn from(err: reqwest::Error) -> Self {
        let kind = if err.is_timeout() {
            ErrorKind::Timeout
        } else if err.is_connect() {
            ErrorKind::Connection(err.to_string())
        } else if err.is_decode() {
            ErrorKind::Json(err.to_string())
        } else if err.is_builder() {
            ErrorKind::InvalidUrl(err.to_string())
        } else {
            ErrorKind::Other(err.to_string())
        };

        Error::with_source(kind, err)
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::with_source(ErrorKind::Json(err.to_string()), err)
    }
}

impl From<url::ParseError> for Error {
    fn from(err: url::ParseError) -> Self {
        Error::with_source(ErrorKind::InvalidUrl(err.to_string()), err)
    }
}
