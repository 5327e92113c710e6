//! # sf-compose-client
//!
//! HTTP transport for the sf-compose Salesforce client.
//!
//! This crate is the only place that talks to the network. It provides:
//! - [`SfHttpClient`]: one request, one attempt, no internal retry
//! - [`RequestBuilder`] / [`RequestMethod`]: method, URL, bearer token, JSON or form body
//! - [`Response`] and the [`ResponseExt`] status check
//! - [`Error`]: transport failures versus non-2xx remote answers, with the decoded
//!   Salesforce error body ([`ApiError`])
//! - [`security`]: SOQL escaping, query-string encoding, error-message sanitising
//!
//! ## Example
//!
//! ```rust,ignore
//! use sf_compose_client::{ClientConfig, SfHttpClient};
//!
//! let http = SfHttpClient::new(ClientConfig::default())?;
//! let limits: serde_json::Value = http
//!     .send_json(
//!         http.get("https://myorg.my.salesforce.com/services/data/v62.0/limits")
//!             .bearer_auth(token),
//!     )
//!     .await?;
//! ```

mod client;
mod config;
mod error;
mod request;
mod response;
pub mod security;

pub use client::SfHttpClient;
pub use config::{ClientConfig, ClientConfigBuilder};
pub use error::{ApiError, Error, ErrorKind, Result};
pub use request::{RequestBody, RequestBuilder, RequestMethod};
pub use response::{Response, ResponseExt};

/// Default Salesforce API version.
pub const DEFAULT_API_VERSION: &str = "v62.0";

/// User-Agent string for the client
pub const USER_AGENT: &str = concat!("sf-compose/", env!("CARGO_PKG_VERSION"));

/// Render an API version as a path segment, adding the leading `v` when missing.
///
/// ```rust
/// assert_eq!(sf_compose_client::api_version_segment("62.0"), "v62.0");
/// assert_eq!(sf_compose_client::api_version_segment("v46.0"), "v46.0");
/// ```
pub fn api_version_segment(version: &str) -> String {
    if version.starts_with('v') {
        version.to_string()
    } else {
        format!("v{}", version)
    }
}
