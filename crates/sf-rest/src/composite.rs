//! The composite resource: several sub-requests in one HTTP exchange.
//!
//! Sub-requests are sent in insertion order, each under its reference id. A later
//! sub-request may point at an earlier result with `@{ReferenceId.field}`; that
//! syntax is resolved by the server and passed through here as plain text.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, instrument, warn};

use sf_compose_auth::SessionManager;
use sf_compose_client::{api_version_segment, ApiError, RequestMethod};

use crate::error::{Error, Result};
use crate::executable::{send, Executable, Subrequest, DATA_PATH_PREFIX};

/// Maximum number of sub-requests the composite resource accepts.
pub const MAX_SUBREQUESTS: usize = 25;

/// What [`Composite::add`] does with a reference id that is already present.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum DuplicateKeyPolicy {
    /// The new sub-request replaces the old one in its original position.
    #[default]
    Replace,
    /// [`Composite::build_payload`] fails, naming the duplicated reference id.
    Reject,
}

/// Builds and executes one composite request.
///
/// A `Composite` is meant to be executed once.
///
/// # Example
///
/// ```rust
/// use sf_compose_rest::{Composite, SObjectRequest};
/// use serde_json::json;
///
/// let composite = Composite::new(true)
///     .add("NewLead", SObjectRequest::create("Lead", json!({"LastName": "Jones", "Company": "Acme"})))
///     .add("AddTask", SObjectRequest::create("Task", json!({"Subject": "Call", "WhoId": "@{NewLead.id}"})));
///
/// let payload = composite.build_payload("v62.0").unwrap();
/// assert_eq!(payload.subrequests[1].reference_id, "AddTask");
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Composite {
    all_or_none: bool,
    api_version: Option<String>,
    requests: Vec<(String, Subrequest)>,
    duplicate_policy: DuplicateKeyPolicy,
    duplicate_keys: Vec<String>,
}

impl Composite {
    /// Create an empty composite. With `all_or_none`, any failing sub-request
    /// rolls back the whole batch.
    pub fn new(all_or_none: bool) -> Self {
        Self {
            all_or_none,
            api_version: None,
            requests: Vec::new(),
            duplicate_policy: DuplicateKeyPolicy::default(),
            duplicate_keys: Vec::new(),
        }
    }

    /// Override the session's default API version for the composite resource.
    pub fn with_api_version(mut self, version: impl Into<String>) -> Self {
        self.api_version = Some(version.into());
        self
    }

    /// Choose how duplicate reference ids are handled.
    pub fn with_duplicate_key_policy(mut self, policy: DuplicateKeyPolicy) -> Self {
        self.duplicate_policy = policy;
        self
    }

    /// Add a sub-request under `reference_id`.
    pub fn add(mut self, reference_id: impl Into<String>, request: impl Into<Subrequest>) -> Self {
        let reference_id = reference_id.into();
        let request = request.into();

        match self.requests.iter_mut().find(|(key, _)| *key == reference_id) {
            Some((_, existing)) => {
                warn!(reference_id = %reference_id, "Duplicate composite reference id");
                *existing = request;
                self.duplicate_keys.push(reference_id);
            }
            None => self.requests.push((reference_id, request)),
        }

        self
    }

    /// The sub-requests, in submission order.
    pub fn requests(&self) -> &[(String, Subrequest)] {
        &self.requests
    }

    /// The sub-request stored under `reference_id`.
    pub fn get(&self, reference_id: &str) -> Option<&Subrequest> {
        self.requests
            .iter()
            .find(|(key, _)| key == reference_id)
            .map(|(_, request)| request)
    }

    pub fn len(&self) -> usize {
        self.requests.len()
    }

    pub fn is_empty(&self) -> bool {
        self.requests.is_empty()
    }

    pub fn all_or_none(&self) -> bool {
        self.all_or_none
    }

    pub fn api_version(&self) -> Option<&str> {
        self.api_version.as_deref()
    }

    pub fn duplicate_key_policy(&self) -> DuplicateKeyPolicy {
        self.duplicate_policy
    }

    /// Check the composite and every sub-request, in order.
    pub fn validate(&self) -> Result<()> {
        if self.requests.is_empty() {
            return Err(Error::validation("composite request has no sub-requests"));
        }

        if self.requests.len() > MAX_SUBREQUESTS {
            return Err(Error::validation(format!(
                "composite request has {} sub-requests, the limit is {}",
                self.requests.len(),
                MAX_SUBREQUESTS
            )));
        }

        if self.duplicate_policy == DuplicateKeyPolicy::Reject {
            if let Some(key) = self.duplicate_keys.first() {
                return Err(Error::validation(format!(
                    "duplicate composite reference id '{}'",
                    key
                )));
            }
        }

        for (_, request) in &self.requests {
            request.validate()?;
        }

        Ok(())
    }

    /// Build the request body. Fails on the first invalid sub-request.
    ///
    /// `api_version` is the default for sub-requests without their own override.
    pub fn build_payload(&self, api_version: &str) -> Result<CompositeRequest> {
        self.validate()?;

        let subrequests = self
            .requests
            .iter()
            .map(|(reference_id, request)| CompositeSubrequest {
                method: request.method(),
                reference_id: reference_id.clone(),
                url: request.build_path(api_version),
                body: request.body().cloned(),
            })
            .collect();

        Ok(CompositeRequest {
            all_or_none: self.all_or_none,
            subrequests,
        })
    }

    /// `/services/data/<version>/composite`.
    pub fn build_path(&self, api_version: &str) -> String {
        let version = api_version_segment(self.api_version.as_deref().unwrap_or(api_version));
        format!("{}{}/composite", DATA_PATH_PREFIX, version)
    }
}

impl Executable for Composite {
    type Output = CompositeResponse;

    fn validate(&self) -> Result<()> {
        Composite::validate(self)
    }

    fn build_url(&self, session: &SessionManager) -> String {
        self.build_path(session.api_version())
    }

    /// POST the payload. A non-2xx answer (including a rolled-back
    /// `all_or_none` batch) fails with a remote error whose
    /// [`composite_response`](Error::composite_response) holds every sub-response.
    #[instrument(skip(self, session), fields(subrequests = self.requests.len(), all_or_none = self.all_or_none))]
    async fn execute(&self, session: &SessionManager) -> Result<CompositeResponse> {
        let payload = self.build_payload(session.api_version())?;
        let body = serde_json::to_value(&payload)?;
        debug!(count = payload.subrequests.len(), "Sending composite request");

        let path = self.build_url(session);
        let response = send(session, RequestMethod::Post, &path, Some(&body)).await?;
        Ok(response.json().await?)
    }
}

/// Body of a composite request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompositeRequest {
    #[serde(rename = "allOrNone")]
    pub all_or_none: bool,
    #[serde(rename = "compositeRequest")]
    pub subrequests: Vec<CompositeSubrequest>,
}

/// One entry of a composite request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompositeSubrequest {
    pub method: RequestMethod,
    #[serde(rename = "referenceId")]
    pub reference_id: String,
    pub url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub body: Option<Value>,
}

/// Response from a composite request, in submission order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompositeResponse {
    #[serde(rename = "compositeResponse")]
    pub responses: Vec<CompositeSubresponse>,
}

impl CompositeResponse {
    /// Decode a response body that carries a `compositeResponse` array.
    pub(crate) fn from_body(body: &Value) -> Option<Self> {
        body.get("compositeResponse")?;
        serde_json::from_value(body.clone()).ok()
    }

    /// The sub-response for `reference_id`.
    pub fn get(&self, reference_id: &str) -> Option<&CompositeSubresponse> {
        self.responses
            .iter()
            .find(|response| response.reference_id == reference_id)
    }

    /// Sub-responses with a non-2xx status.
    pub fn errors(&self) -> impl Iterator<Item = &CompositeSubresponse> {
        self.responses.iter().filter(|response| !response.is_success())
    }

    pub fn len(&self) -> usize {
        self.responses.len()
    }

    pub fn is_empty(&self) -> bool {
        self.responses.is_empty()
    }
}

/// Response from a single sub-request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompositeSubresponse {
    #[serde(default)]
    pub body: Value,
    #[serde(rename = "httpHeaders", default)]
    pub http_headers: HashMap<String, String>,
    #[serde(rename = "httpStatusCode")]
    pub http_status_code: u16,
    #[serde(rename = "referenceId")]
    pub reference_id: String,
}

impl CompositeSubresponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.http_status_code)
    }

    /// The body decoded as an error list; empty for successful sub-responses.
    pub fn api_errors(&self) -> Vec<ApiError> {
        if self.is_success() {
            return Vec::new();
        }
        ApiError::list_from_value(&self.body)
    }
}
