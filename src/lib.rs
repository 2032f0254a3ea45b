//! # LFM API client
//!
//! Client library and contract-test support for the LFM brand/content
//! analytics HTTP API.
//!
//! ## Features
//!
//! - **Session**: OAuth2 client-credentials token acquisition with a
//!   process-wide cache, default headers, and bounded 429 retry
//! - **Page walking**: full enumeration of paginated resources across
//!   both continuation protocols (`has_more_pages` counter and opaque
//!   `next_page_token` cursor)
//! - **Cohort helpers**: brand view cohort assembly and regex set lookup
//! - **Typed surface**: serde models for the list/record/error envelopes
//!   and the dataset dictionary
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use lfm_api::{fetch_all_pages, ApiConfig, Result, Session};
//!
//! #[tokio::main]
//! async fn main() -> Result<()> {
//!     let session = Session::new(ApiConfig::from_env()?);
//!
//!     let mut total = 0;
//!     let walk = fetch_all_pages(&session, "/v20200626/brand_views?per_page=1000", |page| {
//!         total += page["records"].as_array().map_or(0, Vec::len);
//!     })
//!     .await?;
//!
//!     println!("{} brand views across {} pages", total, walk.pages);
//!     Ok(())
//! }
//! ```

#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::doc_markdown)]

// ============================================================================
// Module declarations
// ============================================================================

/// Error types for the client
pub mod error;

/// API credentials and endpoint configuration
pub mod config;

/// Response envelopes and dictionary types
pub mod types;

/// Query-parameter encodings (fields, sort, filters, paging)
pub mod query;

/// Authenticated session with token caching and 429 retry
pub mod session;

/// Page walking across both continuation protocols
pub mod pagination;

/// Brand view cohort assembly and set lookup
pub mod cohort;

/// Analytics fetch requests
pub mod analytics;

/// Command-line interface
pub mod cli;

// ============================================================================
// Re-exports
// ============================================================================

pub use analytics::AnalyticsRequest;
pub use cohort::{build_brand_view_cohort, filter_brand_sets_by_name, find_brand_set_by_name};
pub use config::{versioned, ApiConfig, API_VERSION};
pub use error::{Error, Result};
pub use pagination::{fetch_all_pages, fetch_all_pages_with, PageCursor, PageWalk, PageWalker};
pub use query::{Filter, QueryParams, SortDir, SortField};
pub use session::{FetchOptions, Session, SessionConfig};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Crate name
pub const NAME: &str = env!("CARGO_PKG_NAME");
