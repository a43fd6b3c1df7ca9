//! Shared HTTP client configuration and error classification.

use std::time::Duration;

use geo::Coord;
use reqwest::Client;
use thiserror::Error;
use url::Url;

/// Default user agent for outbound requests.
pub const DEFAULT_USER_AGENT: &str = "roadside/0.1";

/// Default collaborator address.
pub const DEFAULT_BASE_URL: &str = "http://localhost:3000";

/// Default request timeout in seconds.
const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Error type for HTTP provider construction failures.
#[derive(Debug, Error)]
pub enum ProviderBuildError {
    /// Failed to build the HTTP client.
    #[error("failed to build HTTP client: {0}")]
    HttpClient(#[from] reqwest::Error),
    /// The base URL could not be parsed or joined.
    #[error("invalid service URL {url}: {source}")]
    InvalidUrl {
        /// The rejected base URL.
        url: String,
        /// Parser error.
        #[source]
        source: url::ParseError,
    },
}

/// Configuration shared by the HTTP providers.
#[derive(Debug, Clone)]
pub struct HttpProviderConfig {
    /// Base URL of the collaborator service (e.g., `"http://localhost:3000"`).
    pub base_url: String,
    /// Request timeout duration.
    pub timeout: Duration,
    /// User agent string for requests.
    pub user_agent: String,
}

impl Default for HttpProviderConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_owned(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            user_agent: DEFAULT_USER_AGENT.to_owned(),
        }
    }
}

impl HttpProviderConfig {
    /// Create a new configuration with the given base URL.
    #[must_use]
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Default::default()
        }
    }

    /// Set the request timeout.
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set the user agent string.
    #[must_use]
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    pub(crate) fn build_client(&self) -> Result<Client, ProviderBuildError> {
        Ok(Client::builder()
            .user_agent(&self.user_agent)
            .connect_timeout(self.timeout)
            .timeout(self.timeout)
            .build()?)
    }

    /// Resolve `path` beneath the base URL, keeping any base path prefix.
    pub(crate) fn endpoint(&self, path: &str) -> Result<Url, ProviderBuildError> {
        let base = format!("{}/", self.base_url.trim_end_matches('/'));
        Url::parse(&base)
            .and_then(|base| base.join(path))
            .map_err(|source| ProviderBuildError::InvalidUrl {
                url: self.base_url.clone(),
                source,
            })
    }
}

/// Transport-level failure, independent of which service was called.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Failure {
    Timeout { timeout_secs: u64 },
    Status { status: u16 },
    Network,
}

/// Classify a reqwest error the same way for every provider.
pub(crate) fn classify(error: &reqwest::Error, timeout: Duration) -> Failure {
    if error.is_timeout() {
        return Failure::Timeout {
            timeout_secs: timeout.as_secs(),
        };
    }
    if let Some(status) = error.status() {
        return Failure::Status {
            status: status.as_u16(),
        };
    }
    Failure::Network
}

/// Format a coordinate as the `"lat,lng"` pair the services expect.
pub(crate) fn lat_lng(coord: Coord<f64>) -> String {
    format!("{},{}", coord.y, coord.x)
}
