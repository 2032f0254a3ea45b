//! Page continuation types

use serde_json::Value;

/// Continuation marker resolved from a list response
///
/// Exactly one variant applies to a given endpoint; the walker resolves
/// the marker once per response rather than re-checking fields mid-loop.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PageCursor {
    /// `has_more_pages` protocol: the next page number, counted client-side
    PageNumber(u32),
    /// `next_page_token` protocol: opaque server cursor, echoed back verbatim
    Token(String),
}

impl PageCursor {
    /// Resolve the continuation signal of a response body.
    ///
    /// `current_page` is the 1-based number of the page just fetched; the
    /// page-counter protocol continues at `current_page + 1`. Returns
    /// `None` when the response carries no continuation signal.
    pub fn from_response(body: &Value, current_page: u32) -> Option<Self> {
        if body.get("has_more_pages").and_then(Value::as_bool) == Some(true) {
            return Some(Self::PageNumber(current_page + 1));
        }

        match body.get("next_page_token") {
            Some(Value::String(token)) if !token.is_empty() => Some(Self::Token(token.clone())),
            _ => None,
        }
    }
}

/// Result of a completed page walk
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageWalk {
    /// Number of pages fetched
    pub pages: u32,
    /// Records seen across all pages
    pub records: u64,
}

/// Count the records carried by one page body
pub(crate) fn records_in(body: &Value) -> u64 {
    body.get("records")
        .and_then(Value::as_array)
        .map_or(0, |records| records.len() as u64)
}
