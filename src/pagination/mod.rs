//! Pagination module
//!
//! Fully enumerates a paginated resource by driving repeated `Session`
//! fetches and handing each page to a visitor callback. Two continuation
//! protocols coexist across API versions: a `has_more_pages` flag with a
//! client-tracked page counter, and an opaque `next_page_token` cursor
//! echoed back verbatim. The walker resolves whichever the response
//! carries into a single `PageCursor` and injects it into the next
//! request.

mod types;
mod walker;

pub use types::{PageCursor, PageWalk};
pub use walker::{fetch_all_pages, fetch_all_pages_with, PageWalker};
