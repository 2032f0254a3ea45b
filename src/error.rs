//! Error types for the LFM API client
//!
//! All public APIs return `Result<T, Error>` where Error is defined here.
//! Server-reported API errors keep their raw envelope (`ErrorBody`) so
//! callers can assert on `error_code`/`service_code` pairs.

use crate::types::ErrorBody;
use thiserror::Error;

/// The main error type for the LFM API client
#[derive(Error, Debug)]
pub enum Error {
    // ============================================================================
    // Configuration Errors
    // ============================================================================
    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("Missing required environment variable: {var}")]
    MissingEnv { var: String },

    // ============================================================================
    // Authentication Errors
    // ============================================================================
    #[error("Auth endpoint returned status code: {status}")]
    Auth { status: u16, body: String },

    // ============================================================================
    // API Errors
    // ============================================================================
    /// The server returned a non-2xx status with a parseable error envelope.
    /// The envelope is surfaced unmodified.
    #[error("{0}")]
    Api(ErrorBody),

    /// Non-2xx status whose body did not parse as an error envelope.
    #[error("HTTP {status}: {body}")]
    HttpStatus { status: u16, body: String },

    #[error("Rate limited, retry after {retry_after_seconds}s")]
    RateLimited { retry_after_seconds: u64 },

    #[error("Max retries ({max_retries}) exceeded")]
    MaxRetriesExceeded { max_retries: u32 },

    // ============================================================================
    // Transport / Parsing Errors
    // ============================================================================
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Failed to parse JSON: {0}")]
    JsonParse(#[from] serde_json::Error),

    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    #[error("Invalid name pattern: {0}")]
    Pattern(#[from] regex::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl Error {
    /// Create a config error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Create a missing environment variable error
    pub fn missing_env(var: impl Into<String>) -> Self {
        Self::MissingEnv { var: var.into() }
    }

    /// Create an auth error carrying the HTTP status and raw response body
    pub fn auth(status: u16, body: impl Into<String>) -> Self {
        Self::Auth {
            status,
            body: body.into(),
        }
    }

    /// Create an HTTP status error
    pub fn http_status(status: u16, body: impl Into<String>) -> Self {
        Self::HttpStatus {
            status,
            body: body.into(),
        }
    }

    /// The server error envelope, if this is an API error
    pub fn as_api(&self) -> Option<&ErrorBody> {
        match self {
            Self::Api(body) => Some(body),
            _ => None,
        }
    }

    /// Check if this error is retryable
    pub fn is_retryable(&self) -> bool {
        match self {
            Error::Http(_) | Error::RateLimited { .. } => true,
            Error::HttpStatus { status, .. } => is_retryable_status(*status),
            _ => false,
        }
    }
}

/// Check if an HTTP status code is retryable
fn is_retryable_status(status: u16) -> bool {
    matches!(status, 429 | 500 | 502 | 503 | 504)
}

/// Result type alias for the LFM API client
pub type Result<T> = std::result::Result<T, Error>;
