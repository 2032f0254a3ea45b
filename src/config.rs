//! API configuration
//!
//! Credentials and hosts are loaded once from the environment at process
//! start and never mutated afterwards. Hosts may be bare hostnames
//! (`api.lfmdev.in`) or full URLs, which test setups use to point the
//! client at a mock server.

use crate::error::{Error, Result};

/// Version segment shared by every resource endpoint
pub const API_VERSION: &str = "v20200626";

const DEFAULT_AUTH_HOST: &str = "auth.lfmdev.in";
const DEFAULT_API_HOST: &str = "api.lfmdev.in";

const ENV_API_KEY: &str = "LFM_API_KEY";
const ENV_CLIENT_ID: &str = "LFM_API_CLIENT_ID";
const ENV_CLIENT_SECRET: &str = "LFM_API_CLIENT_SECRET";
const ENV_AUTH_HOST: &str = "LFM_API_AUTH_HOST";
const ENV_API_HOST: &str = "LFM_API_HOST";

/// Immutable API credentials and endpoints
#[derive(Debug, Clone)]
pub struct ApiConfig {
    /// Per-account API key, sent as `x-api-key` on every request
    pub api_key: String,
    /// OAuth2 client ID
    pub client_id: String,
    /// OAuth2 client secret
    pub client_secret: String,
    /// Host of the OAuth2 token endpoint
    pub auth_host: String,
    /// Host of the resource API
    pub api_host: String,
}

impl ApiConfig {
    /// Create a config with the default hosts
    pub fn new(
        api_key: impl Into<String>,
        client_id: impl Into<String>,
        client_secret: impl Into<String>,
    ) -> Self {
        Self {
            api_key: api_key.into(),
            client_id: client_id.into(),
            client_secret: client_secret.into(),
            auth_host: DEFAULT_AUTH_HOST.to_string(),
            api_host: DEFAULT_API_HOST.to_string(),
        }
    }

    /// Load credentials from `LFM_API_*` environment variables
    pub fn from_env() -> Result<Self> {
        Ok(Self {
            api_key: require_env(ENV_API_KEY)?,
            client_id: require_env(ENV_CLIENT_ID)?,
            client_secret: require_env(ENV_CLIENT_SECRET)?,
            auth_host: std::env::var(ENV_AUTH_HOST)
                .unwrap_or_else(|_| DEFAULT_AUTH_HOST.to_string()),
            api_host: std::env::var(ENV_API_HOST).unwrap_or_else(|_| DEFAULT_API_HOST.to_string()),
        })
    }

    /// Override the auth host
    #[must_use]
    pub fn with_auth_host(mut self, host: impl Into<String>) -> Self {
        self.auth_host = host.into();
        self
    }

    /// Override the API host
    #[must_use]
    pub fn with_api_host(mut self, host: impl Into<String>) -> Self {
        self.api_host = host.into();
        self
    }

    /// Full URL of the OAuth2 token endpoint
    pub fn token_url(&self) -> String {
        format!("{}/oauth2/token", absolute(&self.auth_host))
    }

    /// Full URL for a resource path (`/v20200626/...`)
    pub fn api_url(&self, path: &str) -> String {
        let base = absolute(&self.api_host);
        let base = base.trim_end_matches('/');
        if path.starts_with('/') {
            format!("{base}{path}")
        } else {
            format!("{base}/{path}")
        }
    }
}

/// Prefix a bare host with `https://`; full URLs pass through unchanged
fn absolute(host: &str) -> String {
    if host.starts_with("http://") || host.starts_with("https://") {
        host.to_string()
    } else {
        format!("https://{host}")
    }
}

fn require_env(var: &str) -> Result<String> {
    std::env::var(var).map_err(|_| Error::missing_env(var))
}

/// Build a versioned resource path, e.g. `versioned("brand_views")`
/// yields `/v20200626/brand_views`
pub fn versioned(resource: &str) -> String {
    format!("/{API_VERSION}/{}", resource.trim_start_matches('/'))
}
