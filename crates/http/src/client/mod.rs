//! Codemarket API client

pub mod cache;
pub mod config;
pub mod error;
pub mod token_store;

pub use error::ClientError;

use cache::{QueryCache, QueryKey};
use config::{ClientConfig, QueryPolicy};
use reqwest::{Client, ClientBuilder, Method};
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;
use token_store::TokenStore;
use tracing::{debug, warn};

/// Codemarket API client
///
/// Cheap to clone; clones share the connection pool, the token store and
/// the query cache.
#[derive(Clone)]
pub struct MarketClient {
    inner: Arc<ClientInner>,
}

struct ClientInner {
    client: Client,
    base_url: String,
    tokens: TokenStore,
    cache: QueryCache,
    policy: QueryPolicy,
}

impl MarketClient {
    /// Create a new client with default configuration
    pub fn new(base_url: impl Into<String>, tokens: TokenStore) -> Result<Self, ClientError> {
        Self::builder().base_url(base_url).tokens(tokens).build()
    }

    /// Create a client from loaded configuration
    pub fn from_config(config: &ClientConfig, tokens: TokenStore) -> Result<Self, ClientError> {
        let mut builder = Self::builder()
            .base_url(&config.base_url)
            .user_agent(&config.user_agent)
            .query_policy(config.query)
            .tokens(tokens);
        if let Some(timeout) = config.timeout() {
            builder = builder.timeout(timeout);
        }
        builder.build()
    }

    /// Create a new client builder
    pub fn builder() -> MarketClientBuilder {
        MarketClientBuilder::default()
    }

    /// Get the base URL
    pub fn base_url(&self) -> &str {
        &self.inner.base_url
    }

    pub fn tokens(&self) -> &TokenStore {
        &self.inner.tokens
    }

    pub fn cache(&self) -> &QueryCache {
        &self.inner.cache
    }

    pub fn query_policy(&self) -> QueryPolicy {
        self.inner.policy
    }

    /// Create a request builder carrying the current access token
    ///
    /// The token is looked up when the request is built, never cached, so
    /// a token saved a moment ago is already used.
    pub fn request(&self, method: Method, path: &str) -> reqwest::RequestBuilder {
        let url = format!("{}{}", self.inner.base_url, path);
        let mut request = self.inner.client.request(method, url);

        if let Some(token) = self.inner.tokens.access_token() {
            request = request.bearer_auth(token);
        }

        request
    }

    /// Execute a request and handle common errors
    pub async fn execute<T: DeserializeOwned>(
        &self,
        request: reqwest::RequestBuilder,
    ) -> Result<T, ClientError> {
        let request = request.build()?;
        let method = request.method().clone();
        let path = request.url().path().to_string();
        debug!(%method, %path, "Sending request");

        let response = self.inner.client.execute(request).await?;
        let status = response.status();

        if status.is_success() {
            let body = response.bytes().await?;
            if body.is_empty() {
                return Ok(serde_json::from_value(Value::Null)?);
            }
            Ok(serde_json::from_slice(&body)?)
        } else {
            let message = match response.text().await {
                Ok(message) => message,
                Err(err) => {
                    warn!(
                        %method,
                        %path,
                        status = status.as_u16(),
                        error = %err,
                        "Failed to read error body"
                    );
                    String::new()
                }
            };
            debug!(%method, %path, status = status.as_u16(), "Request rejected");
            Err(ClientError::from_status(status, message))
        }
    }

    /// Run a cached `GET` query
    ///
    /// Fresh results are served from the cache, identical queries in flight
    /// share one request, and a failed attempt is retried per the query
    /// policy.
    pub async fn query<T: DeserializeOwned>(&self, key: QueryKey) -> Result<T, ClientError> {
        let value = self
            .inner
            .cache
            .get_or_fetch(&key, self.inner.policy.stale_time(), || {
                self.fetch_with_retry(&key)
            })
            .await?;
        Ok(serde_json::from_value(value)?)
    }

    async fn fetch_with_retry(&self, key: &QueryKey) -> Result<Value, ClientError> {
        let mut attempt = 0;
        loop {
            let request = self.request(Method::GET, key.path()).query(key.query());
            match self.execute::<Value>(request).await {
                Ok(value) => return Ok(value),
                Err(err) if attempt < self.inner.policy.retries => {
                    attempt += 1;
                    warn!(%key, attempt, error = %err, "Query failed, retrying");
                }
                Err(err) => return Err(err),
            }
        }
    }

    /// Drop cached queries under a path prefix
    pub fn invalidate(&self, prefix: &str) {
        self.inner.cache.invalidate(prefix);
    }

    pub fn clear_cache(&self) {
        self.inner.cache.clear();
    }
}

/// Builder for MarketClient
#[derive(Default)]
pub struct MarketClientBuilder {
    base_url: Option<String>,
    tokens: Option<TokenStore>,
    timeout: Option<Duration>,
    user_agent: Option<String>,
    policy: Option<QueryPolicy>,
}

impl MarketClientBuilder {
    /// Set the base URL
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = Some(url.into());
        self
    }

    /// Set the token store consulted on every request
    pub fn tokens(mut self, tokens: TokenStore) -> Self {
        self.tokens = Some(tokens);
        self
    }

    /// Set the request timeout
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Set the user agent
    pub fn user_agent(mut self, agent: impl Into<String>) -> Self {
        self.user_agent = Some(agent.into());
        self
    }

    /// Set retry and freshness rules for read queries
    pub fn query_policy(mut self, policy: QueryPolicy) -> Self {
        self.policy = Some(policy);
        self
    }

    /// Build the client
    pub fn build(self) -> Result<MarketClient, ClientError> {
        let base_url = self
            .base_url
            .ok_or_else(|| ClientError::Configuration("base_url is required".into()))?;

        // Ensure base_url ends without a trailing slash
        let base_url = base_url.trim_end_matches('/').to_string();
        if base_url.is_empty() {
            return Err(ClientError::Configuration("base_url is empty".into()));
        }

        let mut client_builder = ClientBuilder::new();

        #[cfg(not(target_arch = "wasm32"))]
        if let Some(timeout) = self.timeout {
            client_builder = client_builder.timeout(timeout);
        }

        #[cfg(target_arch = "wasm32")]
        let _ = self.timeout; // Timeouts not supported on WASM

        if let Some(user_agent) = self.user_agent {
            client_builder = client_builder.user_agent(user_agent);
        } else {
            client_builder = client_builder.user_agent(ClientConfig::default().user_agent);
        }

        let client = client_builder.build()?;

        Ok(MarketClient {
            inner: Arc::new(ClientInner {
                client,
                base_url,
                tokens: self.tokens.unwrap_or_else(TokenStore::in_memory),
                cache: QueryCache::new(),
                policy: self.policy.unwrap_or_default(),
            }),
        })
    }
}
