//! The shared capability of every request type.

use std::future::Future;

use serde_json::Value;

use sf_compose_auth::SessionManager;
use sf_compose_client::{RequestMethod, Response};

use crate::error::Result;
use crate::query::QueryRequest;
use crate::sobject::SObjectRequest;

/// Path prefix of every REST data resource.
pub(crate) const DATA_PATH_PREFIX: &str = "/services/data/";

/// A request that can be turned into one authenticated HTTP call.
///
/// Implemented by [`SObjectRequest`], [`QueryRequest`] and
/// [`Composite`](crate::Composite).
pub trait Executable {
    /// The typed success payload.
    type Output;

    /// Check the request shape. Never touches the network.
    fn validate(&self) -> Result<()>;

    /// The resource path (relative to the instance URL), using the request's own
    /// API version override, else the session's default.
    fn build_url(&self, session: &SessionManager) -> String;

    /// Validate, then perform exactly one authenticated call.
    fn execute(&self, session: &SessionManager)
        -> impl Future<Output = Result<Self::Output>> + Send;
}

/// A request that can be embedded in a [`Composite`](crate::Composite).
#[derive(Debug, Clone, PartialEq)]
pub enum Subrequest {
    SObject(SObjectRequest),
    Query(QueryRequest),
}

impl Subrequest {
    /// The HTTP verb of the sub-request.
    pub fn method(&self) -> RequestMethod {
        match self {
            Subrequest::SObject(request) => request.method(),
            Subrequest::Query(request) => request.method(),
        }
    }

    /// The sub-request body, if any.
    pub fn body(&self) -> Option<&Value> {
        match self {
            Subrequest::SObject(request) => request.body(),
            Subrequest::Query(request) => request.body(),
        }
    }

    /// Check the sub-request shape.
    pub fn validate(&self) -> Result<()> {
        match self {
            Subrequest::SObject(request) => request.validate(),
            Subrequest::Query(request) => request.validate(),
        }
    }

    /// The resource path for the given default API version.
    pub fn build_path(&self, api_version: &str) -> String {
        match self {
            Subrequest::SObject(request) => request.build_path(api_version),
            Subrequest::Query(request) => request.build_path(api_version),
        }
    }
}

impl From<SObjectRequest> for Subrequest {
    fn from(request: SObjectRequest) -> Self {
        Subrequest::SObject(request)
    }
}

impl From<QueryRequest> for Subrequest {
    fn from(request: QueryRequest) -> Self {
        Subrequest::Query(request)
    }
}

/// Send one authenticated request to `<instance_url><path>`.
pub(crate) async fn send(
    session: &SessionManager,
    method: RequestMethod,
    path: &str,
    body: Option<&Value>,
) -> Result<Response> {
    let current = session.session().await?;
    let http = session.http();

    let mut request = http
        .request(method, format!("{}{}", current.instance_url(), path))
        .bearer_auth(current.access_token());
    if let Some(body) = body {
        request = request.json_value(body.clone());
    }

    Ok(http.execute(request).await?)
}
