//! Authenticated JSON session
//!
//! Wraps every resource call with the default headers (`content-type`,
//! `authorization: Bearer`, `x-api-key`), parses the JSON body, surfaces
//! server error envelopes unmodified, and retries rate-limited requests
//! under a bounded policy.

use super::rate_limit::{RateLimiter, RateLimiterConfig};
use super::token::TokenProvider;
use crate::config::ApiConfig;
use crate::error::{Error, Result};
use crate::types::ErrorBody;
use reqwest::{Client, Method, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::time::Duration;
use tracing::{debug, warn};

/// Configuration for session behavior
#[derive(Debug, Clone)]
pub struct SessionConfig {
    /// Per-request timeout
    pub timeout: Duration,
    /// Retry attempts after a 429 before giving up
    pub max_retries: u32,
    /// Wait between 429 retries when the server sends no `retry-after`
    pub retry_after_default: Duration,
    /// Optional client-side pacing
    pub rate_limit: Option<RateLimiterConfig>,
    /// User agent string
    pub user_agent: String,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(30),
            max_retries: 3,
            retry_after_default: Duration::from_secs(60),
            rate_limit: None,
            user_agent: format!("lfm-api/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

impl SessionConfig {
    /// Create a new config builder
    pub fn builder() -> SessionConfigBuilder {
        SessionConfigBuilder::default()
    }
}

/// Builder for session config
#[derive(Default)]
pub struct SessionConfigBuilder {
    config: SessionConfig,
}

impl SessionConfigBuilder {
    /// Set the per-request timeout
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.config.timeout = timeout;
        self
    }

    /// Set how many 429 retries are attempted before giving up
    pub fn max_retries(mut self, retries: u32) -> Self {
        self.config.max_retries = retries;
        self
    }

    /// Set the fallback wait between 429 retries
    pub fn retry_after_default(mut self, wait: Duration) -> Self {
        self.config.retry_after_default = wait;
        self
    }

    /// Enable client-side pacing
    pub fn rate_limit(mut self, config: RateLimiterConfig) -> Self {
        self.config.rate_limit = Some(config);
        self
    }

    /// Set the user agent
    pub fn user_agent(mut self, agent: impl Into<String>) -> Self {
        self.config.user_agent = agent.into();
        self
    }

    /// Build the config
    pub fn build(self) -> SessionConfig {
        self.config
    }
}

/// Options for a single resource request
#[derive(Debug, Clone)]
pub struct FetchOptions {
    /// HTTP method
    pub method: Method,
    /// JSON body for POST-based endpoints
    pub body: Option<Value>,
    /// Additional query pairs
    pub query: Vec<(String, String)>,
}

impl Default for FetchOptions {
    fn default() -> Self {
        Self {
            method: Method::GET,
            body: None,
            query: Vec::new(),
        }
    }
}

impl FetchOptions {
    /// GET with no body
    pub fn new() -> Self {
        Self::default()
    }

    /// POST with a JSON body
    pub fn post(body: Value) -> Self {
        Self {
            method: Method::POST,
            body: Some(body),
            query: Vec::new(),
        }
    }

    /// Add a query pair
    #[must_use]
    pub fn query(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.query.push((key.into(), value.into()));
        self
    }
}

/// An authenticated session against the analytics API
///
/// Owns the token cache for its lifetime; cloning the underlying reqwest
/// client is cheap, but a `Session` is normally created once per process.
pub struct Session {
    client: Client,
    config: ApiConfig,
    session_config: SessionConfig,
    tokens: TokenProvider,
    limiter: Option<RateLimiter>,
}

impl Session {
    /// Create a session with default behavior
    pub fn new(config: ApiConfig) -> Self {
        Self::with_config(config, SessionConfig::default())
    }

    /// Create a session with custom behavior
    pub fn with_config(config: ApiConfig, session_config: SessionConfig) -> Self {
        let client = Client::builder()
            .timeout(session_config.timeout)
            .user_agent(&session_config.user_agent)
            .build()
            .unwrap_or_default();

        let limiter = session_config.rate_limit.as_ref().map(RateLimiter::new);
        let tokens = TokenProvider::with_client(config.clone(), client.clone());

        Self {
            client,
            config,
            session_config,
            tokens,
            limiter,
        }
    }

    /// The token provider backing this session
    pub fn tokens(&self) -> &TokenProvider {
        &self.tokens
    }

    /// Resolve the access token (acquiring it on first use)
    pub async fn access_token(&self) -> Result<String> {
        self.tokens.access_token().await
    }

    /// The API config backing this session
    pub fn config(&self) -> &ApiConfig {
        &self.config
    }

    /// GET a resource path
    pub async fn get(&self, path: &str) -> Result<Value> {
        self.fetch(path, &FetchOptions::new()).await
    }

    /// POST a JSON body to a resource path
    pub async fn post(&self, path: &str, body: Value) -> Result<Value> {
        self.fetch(path, &FetchOptions::post(body)).await
    }

    /// Fetch a resource path and parse the JSON body
    ///
    /// 2xx returns the parsed body. 429 sleeps and retries up to
    /// `max_retries` times. Any other status is surfaced as the server's
    /// error envelope when it parses, or `HttpStatus` otherwise.
    pub async fn fetch(&self, path: &str, opts: &FetchOptions) -> Result<Value> {
        let max_retries = self.session_config.max_retries;
        let mut attempt = 0;

        loop {
            if let Some(ref limiter) = self.limiter {
                limiter.wait().await;
            }

            let token = self.tokens.access_token().await?;
            let url = self.config.api_url(path);

            let mut req = self
                .client
                .request(opts.method.clone(), &url)
                .header("content-type", "application/json")
                .header("x-api-key", &self.config.api_key)
                .bearer_auth(&token);

            if !opts.query.is_empty() {
                req = req.query(&opts.query);
            }
            if let Some(ref body) = opts.body {
                req = req.json(body);
            }

            let response = req.send().await?;
            let status = response.status();

            if status == StatusCode::TOO_MANY_REQUESTS {
                if attempt < max_retries {
                    let wait = extract_retry_after(&response)
                        .unwrap_or(self.session_config.retry_after_default);
                    warn!(
                        path,
                        attempt = attempt + 1,
                        max = max_retries,
                        wait_secs = wait.as_secs(),
                        "rate limited, retrying"
                    );
                    tokio::time::sleep(wait).await;
                    attempt += 1;
                    continue;
                }
                return Err(Error::RateLimited {
                    retry_after_seconds: extract_retry_after(&response)
                        .unwrap_or(self.session_config.retry_after_default)
                        .as_secs(),
                });
            }

            let body = response.text().await?;

            if status.is_success() {
                debug!(path, status = status.as_u16(), "fetch succeeded");
                return serde_json::from_str(&body).map_err(Error::from);
            }

            // Surface the server's error envelope unmodified when it parses
            return match serde_json::from_str::<ErrorBody>(&body) {
                Ok(envelope) => Err(Error::Api(envelope)),
                Err(_) => Err(Error::http_status(status.as_u16(), body)),
            };
        }
    }

    /// Fetch a resource path and deserialize the body into `T`
    pub async fn fetch_json<T: DeserializeOwned>(
        &self,
        path: &str,
        opts: &FetchOptions,
    ) -> Result<T> {
        let value = self.fetch(path, opts).await?;
        serde_json::from_value(value).map_err(Error::from)
    }
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("api_host", &self.config.api_host)
            .field("max_retries", &self.session_config.max_retries)
            .field("has_rate_limiter", &self.limiter.is_some())
            .finish_non_exhaustive()
    }
}

/// Parse the `retry-after` header as a second count
fn extract_retry_after(response: &Response) -> Option<Duration> {
    response
        .headers()
        .get("retry-after")
        .and_then(|v| v.to_str().ok())
        .and_then(|s| s.parse().ok())
        .map(Duration::from_secs)
}
