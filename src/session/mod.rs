//! Session module
//!
//! A `Session` owns the OAuth2 client-credentials token lifecycle and
//! performs authenticated JSON calls against the resource API, with
//! bounded retry on rate limiting and optional client-side pacing.

mod client;
mod rate_limit;
mod token;

pub use client::{FetchOptions, Session, SessionConfig, SessionConfigBuilder};
pub use rate_limit::{RateLimiter, RateLimiterConfig};
pub use token::{CachedToken, TokenProvider};
