//! # sf-compose-auth
//!
//! Username-password OAuth login with a lazily created, shared session.
//!
//! ## Security
//!
//! - Credentials are sent as a form body, never in the URL
//! - Tokens, secrets and passwords are redacted in Debug output
//! - Tracing spans skip credential parameters
//! - Error messages are sanitized before they carry any server text
//!
//! ## Example
//!
//! ```rust,ignore
//! use sf_compose_auth::{AuthConfig, SessionManager};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), sf_compose_auth::Error> {
//!     let config = AuthConfig::from_env()?;
//!     let manager = SessionManager::new(config)?;
//!
//!     // The first call logs in; later calls reuse the cached session.
//!     let session = manager.session().await?;
//!     println!("Connected to {}", session.instance_url());
//!
//!     Ok(())
//! }
//! ```

mod config;
mod error;
mod oauth;
mod session;

pub use config::{AuthConfig, DEFAULT_GRANT_TYPE};
pub use error::{Error, ErrorKind, Result};
pub use oauth::TokenResponse;
pub use session::{Session, SessionManager};

/// Default Salesforce login URL for production.
pub const PRODUCTION_LOGIN_URL: &str = "https://login.salesforce.com";
