//! Transport settings shared by every request an org connection makes.

use std::time::Duration;

/// Default overall deadline for one HTTP exchange.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);
/// Default deadline for establishing the TCP/TLS connection.
pub const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(10);
/// How long an unused pooled connection is kept open.
pub const DEFAULT_POOL_IDLE_TIMEOUT: Duration = Duration::from_secs(90);
/// Idle connections kept per instance host.
pub const DEFAULT_POOL_MAX_IDLE: usize = 10;

/// How [`SfHttpClient`](crate::SfHttpClient) talks to a Salesforce instance.
///
/// Each call is a single attempt; there is no retry or backoff setting.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub timeout: Duration,
    pub connect_timeout: Duration,
    pub pool_idle_timeout: Duration,
    pub pool_max_idle_per_host: usize,
    /// Sent as the `User-Agent` header on every request.
    pub user_agent: String,
    /// Advertise gzip and deflate in `Accept-Encoding`.
    pub accept_compressed: bool,
    /// Log each exchange at `debug`/`info` level.
    pub enable_tracing: bool,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            timeout: DEFAULT_TIMEOUT,
            connect_timeout: DEFAULT_CONNECT_TIMEOUT,
            pool_idle_timeout: DEFAULT_POOL_IDLE_TIMEOUT,
            pool_max_idle_per_host: DEFAULT_POOL_MAX_IDLE,
            user_agent: crate::USER_AGENT.to_owned(),
            accept_compressed: true,
            enable_tracing: true,
        }
    }
}

impl ClientConfig {
    /// Start from the defaults and override what you need.
    pub fn builder() -> ClientConfigBuilder {
        ClientConfigBuilder {
            inner: Self::default(),
        }
    }
}

/// Chainable overrides for [`ClientConfig`].
#[derive(Debug, Default)]
pub struct ClientConfigBuilder {
    inner: ClientConfig,
}

impl ClientConfigBuilder {
    pub fn with_timeout(self, timeout: Duration) -> Self {
        self.map(|c| c.timeout = timeout)
    }

    pub fn with_connect_timeout(self, timeout: Duration) -> Self {
        self.map(|c| c.connect_timeout = timeout)
    }

    pub fn with_pool_idle_timeout(self, timeout: Duration) -> Self {
        self.map(|c| c.pool_idle_timeout = timeout)
    }

    pub fn with_pool_max_idle(self, max: usize) -> Self {
        self.map(|c| c.pool_max_idle_per_host = max)
    }

    /// Replace the `sf-compose/<version>` agent string.
    pub fn with_user_agent(self, user_agent: impl Into<String>) -> Self {
        let user_agent = user_agent.into();
        self.map(|c| c.user_agent = user_agent)
    }

    pub fn with_compression(self, enabled: bool) -> Self {
        self.map(|c| c.accept_compressed = enabled)
    }

    pub fn with_tracing(self, enabled: bool) -> Self {
        self.map(|c| c.enable_tracing = enabled)
    }

    pub fn build(self) -> ClientConfig {
        self.inner
    }

    fn map(mut self, apply: impl FnOnce(&mut ClientConfig)) -> Self {
        apply(&mut self.inner);
        self
    }
}
