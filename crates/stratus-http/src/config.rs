//! Client configuration.

use std::time::Duration;

/// Configuration for a Stratus client.
///
/// The configuration is immutable once the client is constructed; there is
/// no process-global session state. Tests and callers needing different
/// limits construct a second client (or override limits per API handle).
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Project (tenant) name, part of every request path.
    pub project: String,
    /// Api-key sent with every request.
    pub api_key: String,
    /// Scheme and host of the platform, without a trailing slash.
    pub base_url: String,
    /// Maximum concurrent sub-requests per logical call.
    pub max_workers: usize,
    /// Maximum retry attempts for transient failures.
    pub max_retries: u32,
    /// Request timeout.
    pub timeout: Duration,
    /// Base delay for exponential backoff (in milliseconds).
    pub base_delay_ms: u64,
    /// Maximum delay between retries (in milliseconds).
    pub max_delay_ms: u64,
    /// Whether to gzip request bodies above the size threshold.
    /// Compression is a pure optimization; disabling it never changes
    /// semantics.
    pub gzip: bool,
    /// User agent string.
    pub user_agent: String,
}

impl ClientConfig {
    /// Creates a configuration for the given project with default limits.
    pub fn new(project: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            project: project.into(),
            api_key: api_key.into(),
            ..Self::default()
        }
    }

    /// Points the client at a different deployment, e.g. a test server.
    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Overrides the worker-pool size.
    #[must_use]
    pub const fn with_max_workers(mut self, max_workers: usize) -> Self {
        self.max_workers = max_workers;
        self
    }

    /// Overrides the retry limit.
    #[must_use]
    pub const fn with_max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = max_retries;
        self
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            project: String::new(),
            api_key: String::new(),
            base_url: "https://api.stratusdata.io".to_string(),
            max_workers: 10,
            max_retries: 10,
            timeout: Duration::from_secs(60),
            base_delay_ms: 500,
            max_delay_ms: 30_000,
            gzip: true,
            user_agent: format!("stratus-rs/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}
