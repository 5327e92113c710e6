//! # sf-compose-rest
//!
//! Typed request descriptors for the Salesforce REST API and a composite
//! coordinator that sends several of them in one atomic exchange.
//!
//! ## Features
//!
//! - **SObject requests** - create, read, update and delete single records
//! - **SOQL queries** - free-text queries returning typed records
//! - **Composite** - up to 25 ordered sub-requests that can reference each
//!   other's results with `@{ReferenceId.field}`
//! - **Executor** - runs any of the above with one lazily created, shared session
//!
//! Every request performs exactly one HTTP call. Nothing is retried.
//!
//! ## Example
//!
//! ```rust,ignore
//! use sf_compose_rest::{Composite, Executor, QueryRequest, SObjectRequest};
//! use sf_compose_auth::AuthConfig;
//! use serde_json::json;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), sf_compose_rest::Error> {
//!     let executor = Executor::from_config(AuthConfig::from_env()?)?;
//!
//!     // Query
//!     let contacts = executor
//!         .execute(&QueryRequest::new("select id, name from contact limit 10"))
//!         .await?;
//!
//!     // Create a lead and a task pointing at it, atomically
//!     let composite = Composite::new(true)
//!         .add("NewLead", SObjectRequest::create("Lead", json!({"LastName": "Jones", "Company": "Acme"})))
//!         .add("AddTask", SObjectRequest::create("Task", json!({"Subject": "Call", "WhoId": "@{NewLead.id}"})));
//!
//!     match executor.execute(&composite).await {
//!         Ok(response) => println!("created {:?}", response.get("NewLead")),
//!         Err(err) => {
//!             if let Some(response) = err.composite_response() {
//!                 for failed in response.errors() {
//!                     eprintln!("{}: {:?}", failed.reference_id, failed.api_errors());
//!                 }
//!             }
//!         }
//!     }
//!
//!     Ok(())
//! }
//! ```

mod composite;
mod error;
mod executable;
mod executor;
mod query;
mod sobject;

// Composite API
pub use composite::{
    Composite, CompositeRequest, CompositeResponse, CompositeSubrequest, CompositeSubresponse,
    DuplicateKeyPolicy, MAX_SUBREQUESTS,
};

// Error types
pub use error::{Error, ErrorKind, Result};

// Execution
pub use executable::{Executable, Subrequest};
pub use executor::Executor;

// Query types
pub use query::{QueryRequest, QueryResult, RecordAttributes, SalesforceRecord};

// SObject types
pub use sobject::{RecordCreateResult, RecordError, SObjectRequest};

// Re-export lower-layer types that users might need
pub use sf_compose_auth::{AuthConfig, Session, SessionManager};
pub use sf_compose_client::{ApiError, ClientConfig, ClientConfigBuilder, RequestMethod};
