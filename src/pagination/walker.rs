//! Sequential page walker

use super::types::{records_in, PageCursor, PageWalk};
use crate::error::Result;
use crate::query::append_query_pair;
use crate::session::{FetchOptions, Session};
use serde_json::Value;
use std::time::Duration;
use tracing::{debug, warn};

const DEFAULT_PAGE_DELAY: Duration = Duration::from_millis(500);

/// Drives repeated fetches until a resource is fully enumerated
///
/// Strictly sequential: page N+1 is requested only after page N's visitor
/// returns, so pages arrive in order and the walker holds at most one
/// page at a time. Accumulation is the caller's concern.
#[derive(Debug, Clone)]
pub struct PageWalker {
    delay: Duration,
}

impl Default for PageWalker {
    fn default() -> Self {
        Self::new()
    }
}

impl PageWalker {
    /// Create a walker with the default inter-page delay (500ms)
    pub fn new() -> Self {
        Self {
            delay: DEFAULT_PAGE_DELAY,
        }
    }

    /// Create a walker with a custom inter-page delay
    pub fn with_delay(delay: Duration) -> Self {
        Self { delay }
    }

    /// Enumerate every page of `path`, invoking `visit` once per page.
    ///
    /// The first request is issued exactly as given. Afterwards the next
    /// marker is injected per protocol: the page number goes into the
    /// JSON body's `page` field when the request has a body, otherwise
    /// into a `page` query parameter; an opaque token always goes into a
    /// `page_token` query parameter. All other fields and parameters are
    /// left untouched. Any fetch error propagates unmodified; pages
    /// already visited are not rolled back.
    pub async fn walk<F>(
        &self,
        session: &Session,
        path: &str,
        opts: FetchOptions,
        mut visit: F,
    ) -> Result<PageWalk>
    where
        F: FnMut(&Value),
    {
        let mut opts = opts;
        let mut pages: u32 = 1;
        let mut records: u64 = 0;
        let mut last_token: Option<String> = None;

        let mut body = session.fetch(path, &opts).await?;
        records += records_in(&body);
        visit(&body);

        while let Some(cursor) = PageCursor::from_response(&body, pages) {
            let next_path = match cursor {
                PageCursor::PageNumber(page) => {
                    if let Some(request_body) = opts.body.as_mut().and_then(Value::as_object_mut) {
                        // body-bearing request: bump the page field in place
                        request_body.insert("page".to_string(), Value::from(page));
                        path.to_string()
                    } else {
                        append_query_pair(path, "page", &page.to_string())
                    }
                }
                PageCursor::Token(token) => {
                    if last_token.as_deref() == Some(token.as_str()) {
                        // a static dataset must not hand back the same
                        // cursor twice; stop rather than loop forever
                        warn!(path, token = %token, "server repeated a page token, stopping walk");
                        break;
                    }
                    let next = append_query_pair(path, "page_token", &token);
                    last_token = Some(token);
                    next
                }
            };

            tokio::time::sleep(self.delay).await;

            debug!(path = %next_path, page = pages + 1, "fetching next page");
            body = session.fetch(&next_path, &opts).await?;
            pages += 1;
            records += records_in(&body);
            visit(&body);
        }

        Ok(PageWalk { pages, records })
    }
}

/// Walk every page of a GET endpoint with the default walker
pub async fn fetch_all_pages<F>(session: &Session, path: &str, visit: F) -> Result<PageWalk>
where
    F: FnMut(&Value),
{
    PageWalker::new()
        .walk(session, path, FetchOptions::new(), visit)
        .await
}

/// Walk every page of an endpoint with explicit request options
pub async fn fetch_all_pages_with<F>(
    session: &Session,
    path: &str,
    opts: FetchOptions,
    visit: F,
) -> Result<PageWalk>
where
    F: FnMut(&Value),
{
    PageWalker::new().walk(session, path, opts, visit).await
}
