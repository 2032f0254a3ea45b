//! OAuth2 client-credentials token acquisition and caching
//!
//! One token is acquired lazily per process and shared by every request.
//! The cache sits behind an `RwLock` with a double-checked write path, so
//! concurrent first callers share a single in-flight acquisition instead
//! of firing duplicate token requests.

use crate::config::ApiConfig;
use crate::error::{Error, Result};
use chrono::{DateTime, Utc};
use reqwest::Client;
use serde::Deserialize;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::debug;

const GRANT_TYPE: &str = "client_credentials";
const SCOPE: &str = "api/basic";

/// A cached access token with optional server-reported expiry
#[derive(Debug, Clone)]
pub struct CachedToken {
    /// The bearer token value
    pub token: String,
    /// Expiry, when the token endpoint reported `expires_in`
    pub expires_at: Option<DateTime<Utc>>,
}

impl CachedToken {
    /// A token with a known expiry instant (or none)
    pub fn new(token: String, expires_at: Option<DateTime<Utc>>) -> Self {
        Self { token, expires_at }
    }

    /// A token expiring `seconds` from now
    pub fn expires_in(token: String, seconds: i64) -> Self {
        Self {
            token,
            expires_at: Some(Utc::now() + chrono::Duration::seconds(seconds)),
        }
    }

    /// Whether the token should be refreshed (30 second safety buffer).
    /// Tokens without a reported expiry are cached for process lifetime.
    pub fn is_expired(&self) -> bool {
        match self.expires_at {
            Some(expires_at) => Utc::now() + chrono::Duration::seconds(30) >= expires_at,
            None => false,
        }
    }
}

/// Acquires and caches the process-wide access token
pub struct TokenProvider {
    config: ApiConfig,
    cached: Arc<RwLock<Option<CachedToken>>>,
    http: Client,
}

impl TokenProvider {
    /// Create a provider with its own HTTP client
    pub fn new(config: ApiConfig) -> Self {
        Self::with_client(config, Client::new())
    }

    /// Create a provider sharing an existing HTTP client
    pub fn with_client(config: ApiConfig, http: Client) -> Self {
        Self {
            config,
            cached: Arc::new(RwLock::new(None)),
            http,
        }
    }

    /// Return the cached token, acquiring one on first use.
    ///
    /// The cached path takes only a read lock and performs no network I/O.
    pub async fn access_token(&self) -> Result<String> {
        {
            let cached = self.cached.read().await;
            if let Some(token) = cached.as_ref() {
                if !token.is_expired() {
                    return Ok(token.token.clone());
                }
            }
        }

        let mut cached = self.cached.write().await;

        // Another task may have acquired while we waited for the write lock
        if let Some(token) = cached.as_ref() {
            if !token.is_expired() {
                return Ok(token.token.clone());
            }
        }

        let token = self.obtain_token().await?;
        let value = token.token.clone();
        *cached = Some(token);
        Ok(value)
    }

    /// Whether a token is currently cached
    pub async fn has_token(&self) -> bool {
        self.cached.read().await.is_some()
    }

    /// Drop the cached token, forcing re-acquisition on next use
    pub async fn clear(&self) {
        *self.cached.write().await = None;
    }

    /// Perform the client-credentials flow against the token endpoint
    async fn obtain_token(&self) -> Result<CachedToken> {
        let form = [
            ("client_id", self.config.client_id.as_str()),
            ("client_secret", self.config.client_secret.as_str()),
            ("grant_type", GRANT_TYPE),
            ("scope", SCOPE),
        ];

        debug!(url = %self.config.token_url(), "acquiring access token");
        let response = self
            .http
            .post(self.config.token_url())
            .form(&form)
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;
        if !status.is_success() {
            return Err(Error::auth(status.as_u16(), body));
        }

        let parsed: TokenResponse = serde_json::from_str(&body)
            .map_err(|_| Error::auth(status.as_u16(), body.clone()))?;
        match parsed.access_token {
            Some(token) => Ok(match parsed.expires_in {
                Some(seconds) => CachedToken::expires_in(token, seconds),
                None => CachedToken::new(token, None),
            }),
            // 200 with no token in it, surface the raw body
            None => Err(Error::auth(status.as_u16(), body)),
        }
    }
}

impl std::fmt::Debug for TokenProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenProvider")
            .field("auth_host", &self.config.auth_host)
            .finish_non_exhaustive()
    }
}

/// Token endpoint response body
#[derive(Debug, Deserialize)]
struct TokenResponse {
    #[serde(default)]
    access_token: Option<String>,
    #[serde(default)]
    expires_in: Option<i64>,
    #[serde(default)]
    #[allow(dead_code)]
    token_type: Option<String>,
}

#[cfg(test)]
mod token_tests {
    use super::*;

    #[test]
    fn test_cached_token_not_expired() {
        let token = CachedToken::expires_in("tok".to_string(), 3600);
        assert!(!token.is_expired());
    }

    #[test]
    fn test_cached_token_expired() {
        let token = CachedToken::expires_in("tok".to_string(), -100);
        assert!(token.is_expired());
    }

    #[test]
    fn test_cached_token_without_expiry_never_expires() {
        let token = CachedToken::new("tok".to_string(), None);
        assert!(!token.is_expired());
    }

    #[test]
    fn test_expiry_buffer() {
        // within the 30s buffer counts as expired
        let token = CachedToken::expires_in("tok".to_string(), 10);
        assert!(token.is_expired());
    }
}
