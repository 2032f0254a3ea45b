//! Client-side request pacing
//!
//! A token-bucket limiter (governor) applied before each request. The API
//! enforces its own limits with 429 responses; pacing keeps a full page
//! walk from tripping them in the first place.

use governor::clock::DefaultClock;
use governor::middleware::NoOpMiddleware;
use governor::state::{InMemoryState, NotKeyed};
use governor::{Quota, RateLimiter as Governor};
use std::num::NonZeroU32;
use std::sync::Arc;

/// Configuration for request pacing
#[derive(Debug, Clone)]
pub struct RateLimiterConfig {
    /// Sustained requests per second
    pub requests_per_second: u32,
    /// Burst allowance
    pub burst_size: u32,
}

impl Default for RateLimiterConfig {
    fn default() -> Self {
        Self {
            requests_per_second: 2,
            burst_size: 2,
        }
    }
}

impl RateLimiterConfig {
    /// Create a pacing config
    pub fn new(requests_per_second: u32, burst_size: u32) -> Self {
        Self {
            requests_per_second,
            burst_size,
        }
    }
}

/// Token bucket rate limiter
#[derive(Clone)]
pub struct RateLimiter {
    limiter: Arc<Governor<NotKeyed, InMemoryState, DefaultClock, NoOpMiddleware>>,
}

impl RateLimiter {
    /// Create a limiter with the given config
    pub fn new(config: &RateLimiterConfig) -> Self {
        let one = NonZeroU32::new(1).unwrap();
        let quota = Quota::per_second(NonZeroU32::new(config.requests_per_second).unwrap_or(one))
            .allow_burst(NonZeroU32::new(config.burst_size).unwrap_or(one));

        Self {
            limiter: Arc::new(Governor::direct(quota)),
        }
    }

    /// Wait until a request may be issued
    pub async fn wait(&self) {
        self.limiter.until_ready().await;
    }

    /// Check whether a request may be issued immediately
    pub fn check(&self) -> bool {
        self.limiter.check().is_ok()
    }
}

impl std::fmt::Debug for RateLimiter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RateLimiter").finish()
    }
}
