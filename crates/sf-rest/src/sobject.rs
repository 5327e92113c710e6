//! Single-record operations on the `sobjects` resource.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::instrument;

use sf_compose_auth::SessionManager;
use sf_compose_client::security::url as url_security;
use sf_compose_client::{api_version_segment, RequestMethod};

use crate::error::{Error, Result};
use crate::executable::{send, Executable, DATA_PATH_PREFIX};

/// Describes one operation on an sObject type or record.
///
/// Path parameters are appended verbatim, so composite placeholders such as
/// `@{NewAccount.id}` reach the server untouched.
///
/// # Example
///
/// ```rust
/// use sf_compose_rest::SObjectRequest;
/// use serde_json::json;
///
/// let update = SObjectRequest::update("Account", "001xx000003DGb2AAG", json!({"Name": "Acme"}));
/// assert_eq!(
///     update.build_path("v62.0"),
///     "/services/data/v62.0/sobjects/Account/001xx000003DGb2AAG"
/// );
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct SObjectRequest {
    method: RequestMethod,
    sobject: String,
    body: Option<Value>,
    params: Vec<String>,
    query_params: Vec<(String, String)>,
    api_version: Option<String>,
}

impl SObjectRequest {
    /// Create a request with no body, path parameters or query string.
    pub fn new(method: RequestMethod, sobject: impl Into<String>) -> Self {
        Self {
            method,
            sobject: sobject.into(),
            body: None,
            params: Vec::new(),
            query_params: Vec::new(),
            api_version: None,
        }
    }

    /// `POST /sobjects/<type>` with the new record's fields.
    pub fn create(sobject: impl Into<String>, body: Value) -> Self {
        Self::new(RequestMethod::Post, sobject).with_body(body)
    }

    /// `GET /sobjects/<type>/<id>`.
    pub fn get(sobject: impl Into<String>, id: impl Into<String>) -> Self {
        Self::new(RequestMethod::Get, sobject).with_param(id)
    }

    /// `PATCH /sobjects/<type>/<id>` with the fields to change.
    pub fn update(sobject: impl Into<String>, id: impl Into<String>, body: Value) -> Self {
        Self::new(RequestMethod::Patch, sobject)
            .with_param(id)
            .with_body(body)
    }

    /// `DELETE /sobjects/<type>/<id>`.
    pub fn delete(sobject: impl Into<String>, id: impl Into<String>) -> Self {
        Self::new(RequestMethod::Delete, sobject).with_param(id)
    }

    /// Set the JSON body. A JSON `null` leaves the request without a body.
    pub fn with_body(mut self, body: Value) -> Self {
        self.body = (!body.is_null()).then_some(body);
        self
    }

    /// Append one path parameter.
    pub fn with_param(mut self, param: impl Into<String>) -> Self {
        self.params.push(param.into());
        self
    }

    /// Append several path parameters, in order.
    pub fn with_params<I, S>(mut self, params: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.params.extend(params.into_iter().map(Into::into));
        self
    }

    /// Append a query-string pair.
    pub fn with_query(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.query_params.push((key.into(), value.into()));
        self
    }

    /// Override the session's default API version for this request.
    pub fn with_api_version(mut self, version: impl Into<String>) -> Self {
        self.api_version = Some(version.into());
        self
    }

    pub fn method(&self) -> RequestMethod {
        self.method
    }

    pub fn sobject(&self) -> &str {
        &self.sobject
    }

    pub fn body(&self) -> Option<&Value> {
        self.body.as_ref()
    }

    pub fn params(&self) -> &[String] {
        &self.params
    }

    pub fn query_params(&self) -> &[(String, String)] {
        &self.query_params
    }

    pub fn api_version(&self) -> Option<&str> {
        self.api_version.as_deref()
    }

    /// Check the request shape.
    ///
    /// Path parameters are only accepted with GET, HEAD, PATCH and DELETE; a
    /// body is rejected with GET and HEAD.
    pub fn validate(&self) -> Result<()> {
        if !self.params.is_empty()
            && !matches!(
                self.method,
                RequestMethod::Get
                    | RequestMethod::Head
                    | RequestMethod::Patch
                    | RequestMethod::Delete
            )
        {
            return Err(Error::validation(format!(
                "Method {} is not supported with sobjects with params API.",
                self.method
            )));
        }

        if self.body.is_some() && self.method.forbids_body() {
            return Err(Error::validation(
                "'body' is not supported with GET or HEAD methods.",
            ));
        }

        Ok(())
    }

    /// `/services/data/<version>/sobjects/<type>[/<p1>/<p2>...][?<qs>]`.
    ///
    /// `api_version` is used only when the request has no override.
    pub fn build_path(&self, api_version: &str) -> String {
        let version = api_version_segment(self.api_version.as_deref().unwrap_or(api_version));
        let mut path = format!("{}{}/sobjects/{}", DATA_PATH_PREFIX, version, self.sobject);

        if !self.params.is_empty() {
            path.push('/');
            path.push_str(&self.params.join("/"));
        }

        if !self.query_params.is_empty() {
            path.push('?');
            path.push_str(&url_security::encode_query_string(
                self.query_params.iter().map(|(k, v)| (k, v)),
            ));
        }

        path
    }

    /// Execute and decode the response body as `T`.
    ///
    /// A `204 No Content` answer decodes from JSON `null`, so use `Value` or
    /// `Option<_>` for updates and deletes.
    #[instrument(skip(self, session), fields(method = %self.method, sobject = %self.sobject))]
    pub async fn execute_as<T: DeserializeOwned>(&self, session: &SessionManager) -> Result<T> {
        self.validate()?;

        let path = self.build_url(session);
        let response = send(session, self.method, &path, self.body.as_ref()).await?;
        let value = response.json_value().await?;

        Ok(serde_json::from_value(value)?)
    }
}

impl Executable for SObjectRequest {
    type Output = Value;

    fn validate(&self) -> Result<()> {
        SObjectRequest::validate(self)
    }

    fn build_url(&self, session: &SessionManager) -> String {
        self.build_path(session.api_version())
    }

    async fn execute(&self, session: &SessionManager) -> Result<Value> {
        self.execute_as(session).await
    }
}

/// Response to a record create.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct RecordCreateResult {
    pub id: String,
    pub success: bool,
    #[serde(default)]
    pub errors: Vec<RecordError>,
}

/// An error entry inside a record operation result.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct RecordError {
    #[serde(rename = "statusCode")]
    pub status_code: String,
    pub message: String,
    #[serde(default)]
    pub fields: Vec<String>,
}
