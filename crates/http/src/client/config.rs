//! Client configuration

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Default backend endpoint
pub const DEFAULT_BASE_URL: &str = "http://localhost:8000/api/v1";

/// Settings for building a [`MarketClient`](super::MarketClient)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    /// Backend base URL, e.g. `https://codemarket.example/api/v1`
    pub base_url: String,
    /// Request timeout in seconds (0 disables it; ignored in the browser)
    pub timeout_secs: u64,
    pub user_agent: String,
    pub query: QueryPolicy,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout_secs: 30,
            user_agent: concat!("codemarket-client/", env!("CARGO_PKG_VERSION")).to_string(),
            query: QueryPolicy::default(),
        }
    }
}

impl ClientConfig {
    pub fn timeout(&self) -> Option<Duration> {
        (self.timeout_secs > 0).then(|| Duration::from_secs(self.timeout_secs))
    }
}

/// Retry and freshness rules for read queries
///
/// Mutations are never retried and never cached.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct QueryPolicy {
    /// Extra attempts after a failed read
    pub retries: u32,
    /// How long a cached read stays fresh, in seconds
    pub stale_time_secs: u64,
}

impl Default for QueryPolicy {
    fn default() -> Self {
        Self {
            retries: 1,
            stale_time_secs: 5 * 60,
        }
    }
}

impl QueryPolicy {
    pub fn stale_time(&self) -> Duration {
        Duration::from_secs(self.stale_time_secs)
    }
}
