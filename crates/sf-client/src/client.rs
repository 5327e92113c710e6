//! Core HTTP client: one request, one attempt, Salesforce error decoding.

use tracing::{debug, info, instrument};

use crate::config::ClientConfig;
use crate::error::{Error, ErrorKind, Result};
use crate::request::{RequestBody, RequestBuilder, RequestMethod};
use crate::response::{Response, ResponseExt};

/// HTTP client for Salesforce APIs.
///
/// Each call to [`SfHttpClient::execute`] performs exactly one HTTP exchange.
/// A response that never arrives surfaces as a transport error
/// ([`Error::is_transport`]); a non-2xx response surfaces as
/// [`ErrorKind::Remote`] with its decoded body.
#[derive(Debug, Clone)]
pub struct SfHttpClient {
    inner: reqwest::Client,
    config: ClientConfig,
}

impl SfHttpClient {
    pub fn new(config: ClientConfig) -> Result<Self> {
        let inner = reqwest::Client::builder()
            .timeout(config.timeout)
            .connect_timeout(config.connect_timeout)
            .pool_idle_timeout(config.pool_idle_timeout)
            .pool_max_idle_per_host(config.pool_max_idle_per_host)
            .user_agent(&config.user_agent)
            .gzip(config.accept_compressed)
            .deflate(config.accept_compressed)
            .build()
            .map_err(|e| Error::with_source(ErrorKind::Config(e.to_string()), e))?;

        Ok(Self { inner, config })
    }

    /// A client built from [`ClientConfig::default`].
    pub fn default_client() -> Result<Self> {
        Self::new(ClientConfig::default())
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub fn request(&self, method: RequestMethod, url: impl Into<String>) -> RequestBuilder {
        RequestBuilder::new(method, url)
    }

    pub fn get(&self, url: impl Into<String>) -> RequestBuilder {
        self.request(RequestMethod::Get, url)
    }

    pub fn post(&self, url: impl Into<String>) -> RequestBuilder {
        self.request(RequestMethod::Post, url)
    }

    pub fn delete(&self, url: impl Into<String>) -> RequestBuilder {
        self.request(RequestMethod::Delete, url)
    }

    /// Send `request` once and turn a non-2xx answer into [`ErrorKind::Remote`].
    #[instrument(skip(self, request), fields(method = %request.method))]
    pub async fn execute(&self, request: RequestBuilder) -> Result<Response> {
        let url = request_url(&request)?;
        let outgoing = self.prepare(&request, &url)?;

        if self.config.enable_tracing {
            // Path only: the query string may carry SOQL text.
            debug!(method = %request.method, path = %url.path(), "Sending request");
        }

        let response = outgoing.send().await?;
        if self.config.enable_tracing {
            log_status(&response);
        }

        Response::new(response).check_salesforce_error().await
    }

    /// [`execute`](Self::execute), then decode the JSON body as `T`.
    pub async fn send_json<T: serde::de::DeserializeOwned>(
        &self,
        request: RequestBuilder,
    ) -> Result<T> {
        self.execute(request).await?.json().await
    }

    fn prepare(&self, request: &RequestBuilder, url: &url::Url) -> Result<reqwest::RequestBuilder> {
        let mut outgoing = self
            .inner
            .request(reqwest::Method::from(request.method), url.as_str());

        if let Some(token) = &request.bearer_token {
            outgoing = outgoing.bearer_auth(token);
        }
        for (name, value) in &request.headers {
            outgoing = outgoing.header(name.as_str(), value.as_str());
        }

        let payload = match &request.body {
            None => return Ok(outgoing),
            Some(RequestBody::Json(value)) => serde_json::to_vec(value)?,
            Some(RequestBody::Form(fields)) => serde_urlencoded::to_string(fields)
                .map_err(|e| Error::with_source(ErrorKind::Other(e.to_string()), e))?
                .into_bytes(),
        };
        Ok(outgoing.body(payload))
    }
}

fn log_status(response: &reqwest::Response) {
    let status = response.status().as_u16();
    let content_length = response.content_length();
    if response.status().is_success() {
        debug!(status, content_length, "Response received");
    } else {
        info!(status, content_length, "Non-success response");
    }
}

/// The request URL with the builder's query pairs appended.
fn request_url(request: &RequestBuilder) -> Result<url::Url> {
    let mut url = url::Url::parse(&request.url)?;
    if !request.query_params.is_empty() {
        let mut pairs = url.query_pairs_mut();
        for (name, value) in &request.query_params {
            pairs.append_pair(name, value);
        }
    }
    Ok(url)
}
