//! SOQL queries on the `query` resource.

use std::collections::HashMap;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::instrument;

use sf_compose_auth::SessionManager;
use sf_compose_client::security::url as url_security;
use sf_compose_client::{api_version_segment, RequestMethod};

use crate::error::Result;
use crate::executable::{send, Executable, DATA_PATH_PREFIX};

/// A read-only SOQL query.
///
/// The query text is sent as the `q` parameter with whitespace encoded as `+`.
/// Build values into the text with
/// [`security::soql`](sf_compose_client::security::soql) to keep them escaped.
///
/// # Example
///
/// ```rust
/// use sf_compose_rest::QueryRequest;
///
/// let query = QueryRequest::new("select id from contact where name = 'Howard Jones'");
/// assert_eq!(
///     query.build_path("v46.0"),
///     "/services/data/v46.0/query/?q=select+id+from+contact+where+name+=+'Howard+Jones'"
/// );
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryRequest {
    query: String,
    api_version: Option<String>,
}

impl QueryRequest {
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            api_version: None,
        }
    }

    /// Override the session's default API version for this query.
    pub fn with_api_version(mut self, version: impl Into<String>) -> Self {
        self.api_version = Some(version.into());
        self
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn api_version(&self) -> Option<&str> {
        self.api_version.as_deref()
    }

    /// Always `GET`.
    pub fn method(&self) -> RequestMethod {
        RequestMethod::Get
    }

    /// Queries never carry a body.
    pub fn body(&self) -> Option<&Value> {
        None
    }

    /// A free-text query has no invalid shape.
    pub fn validate(&self) -> Result<()> {
        Ok(())
    }

    /// `/services/data/<version>/query/?q=<encoded query>`.
    pub fn build_path(&self, api_version: &str) -> String {
        let version = api_version_segment(self.api_version.as_deref().unwrap_or(api_version));
        format!(
            "{}{}/query/?q={}",
            DATA_PATH_PREFIX,
            version,
            url_security::encode_query_text(&self.query)
        )
    }

    /// Execute and decode the records as `T`.
    ///
    /// Only the first page is returned; follow
    /// [`QueryResult::next_records_url`] to read further.
    #[instrument(skip(self, session))]
    pub async fn execute_as<T: DeserializeOwned>(
        &self,
        session: &SessionManager,
    ) -> Result<QueryResult<T>> {
        let path = self.build_url(session);
        let response = send(session, RequestMethod::Get, &path, None).await?;
        Ok(response.json().await?)
    }
}

impl Executable for QueryRequest {
    type Output = QueryResult<SalesforceRecord>;

    fn validate(&self) -> Result<()> {
        QueryRequest::validate(self)
    }

    fn build_url(&self, session: &SessionManager) -> String {
        self.build_path(session.api_version())
    }

    async fn execute(&self, session: &SessionManager) -> Result<QueryResult<SalesforceRecord>> {
        self.execute_as(session).await
    }
}

/// Result of a SOQL query.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct QueryResult<T> {
    /// Total number of records matching the query.
    #[serde(rename = "totalSize")]
    pub total_size: u64,

    /// Whether all records are returned (no more pages).
    pub done: bool,

    /// The records.
    pub records: Vec<T>,

    /// URL to fetch next batch of results.
    #[serde(
        rename = "nextRecordsUrl",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub next_records_url: Option<String>,
}

/// A record returned by a query: its attributes plus every selected field.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct SalesforceRecord {
    pub attributes: RecordAttributes,
    #[serde(flatten)]
    pub fields: HashMap<String, Value>,
}

impl SalesforceRecord {
    /// A field value by API name.
    pub fn get(&self, field: &str) -> Option<&Value> {
        self.fields.get(field)
    }

    /// The record id, when selected.
    pub fn id(&self) -> Option<&str> {
        self.get("Id").and_then(Value::as_str)
    }
}

/// The `attributes` object of a record.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct RecordAttributes {
    #[serde(rename = "type")]
    pub sobject_type: String,
    #[serde(default)]
    pub url: Option<String>,
}
