//! Binds a shared [`SessionManager`] to any [`Executable`].

use std::sync::Arc;

use tracing::instrument;

use sf_compose_auth::{AuthConfig, SessionManager};

use crate::error::Result;
use crate::executable::Executable;

/// Runs requests with one shared session.
///
/// Cloning an executor is cheap; clones share the session.
///
/// # Example
///
/// ```rust,ignore
/// use sf_compose_rest::{Composite, Executor, QueryRequest, SObjectRequest};
/// use sf_compose_auth::AuthConfig;
/// use serde_json::json;
///
/// let executor = Executor::from_config(AuthConfig::from_env()?)?;
///
/// let contacts = executor
///     .execute(&QueryRequest::new("select id, name from contact limit 10"))
///     .await?;
///
/// let response = executor
///     .execute(
///         &Composite::new(true)
///             .add("NewLead", SObjectRequest::create("Lead", json!({"LastName": "Jones", "Company": "Acme"})))
///             .add("AddTask", SObjectRequest::create("Task", json!({"WhoId": "@{NewLead.id}"}))),
///     )
///     .await?;
/// ```
#[derive(Debug, Clone)]
pub struct Executor {
    session: Arc<SessionManager>,
}

impl Executor {
    pub fn new(session: Arc<SessionManager>) -> Self {
        Self { session }
    }

    /// Create an executor with its own session manager.
    pub fn from_config(config: AuthConfig) -> Result<Self> {
        Ok(Self::new(Arc::new(SessionManager::new(config)?)))
    }

    pub fn session(&self) -> &Arc<SessionManager> {
        &self.session
    }

    /// Make sure a session exists, then run `request`.
    ///
    /// Errors are returned as produced; a `401` does not trigger a new login.
    /// Call [`SessionManager::invalidate`] and retry to force one.
    #[instrument(skip(self, request))]
    pub async fn execute<E>(&self, request: &E) -> Result<E::Output>
    where
        E: Executable + Sync,
    {
        self.session.session().await?;
        request.execute(&self.session).await
    }
}

impl From<Arc<SessionManager>> for Executor {
    fn from(session: Arc<SessionManager>) -> Self {
        Self::new(session)
    }
}
