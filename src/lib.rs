//! # sf-compose
//!
//! A Salesforce REST client built around request descriptors and composite
//! batches, with a lazily created session shared by every request.
//!
//! ## Security
//!
//! - Sensitive data (tokens, secrets, passwords) are redacted in Debug output
//! - Tracing/logging skips credential parameters
//! - Error messages sanitize any credential data
//!
//! ## Crates
//!
//! - **sf-compose-client** - HTTP transport: one attempt per call, Salesforce error decoding
//! - **sf-compose-auth** - Username-password login and the shared `SessionManager`
//! - **sf-compose-rest** - SObject and query descriptors, composite batches, the `Executor`
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use sf_compose::{AuthConfig, Composite, Executor, SObjectRequest};
//! use serde_json::json;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let executor = Executor::from_config(AuthConfig::from_env()?)?;
//!
//!     let composite = Composite::new(true)
//!         .add("NewAccount", SObjectRequest::create("Account", json!({"Name": "Acme"})))
//!         .add("GetAccount", SObjectRequest::get("Account", "@{NewAccount.id}"));
//!
//!     let response = executor.execute(&composite).await?;
//!     println!("{:?}", response.get("GetAccount").map(|r| &r.body));
//!
//!     Ok(())
//! }
//! ```

// Re-export all crates for convenient access
#[cfg(feature = "auth")]
pub use sf_compose_auth as auth;
#[cfg(feature = "client")]
pub use sf_compose_client as client;
#[cfg(feature = "rest")]
pub use sf_compose_rest as rest;

// Re-export commonly used types at the top level
#[cfg(feature = "auth")]
pub use sf_compose_auth::{AuthConfig, Session, SessionManager};
#[cfg(feature = "client")]
pub use sf_compose_client::{ClientConfig, SfHttpClient};
#[cfg(feature = "rest")]
pub use sf_compose_rest::{
    Composite, CompositeResponse, DuplicateKeyPolicy, Executable, Executor, QueryRequest,
    SObjectRequest,
};
