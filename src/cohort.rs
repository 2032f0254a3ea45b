//! Brand view cohort assembly and set lookup
//!
//! Compositions over the page walker: flattening brand view IDs into an
//! ordered cohort, and regex name lookup over the (possibly paginated)
//! brand view set listing.

use crate::config::versioned;
use crate::error::Result;
use crate::pagination::{PageWalk, PageWalker};
use crate::query::{Filter, QueryParams};
use crate::session::{FetchOptions, Session};
use crate::types::BrandViewSet;
use regex::Regex;
use serde_json::Value;
use std::time::Duration;

const COHORT_PAGE_SIZE: u32 = 1000;

/// Ordered brand view IDs assembled by set membership and/or filters
///
/// Pages through either the full brand view listing or the members of a
/// named set, flattening `records[].id` in server order.
pub async fn build_brand_view_cohort(
    session: &Session,
    filters: &[Filter],
    set_id: Option<u64>,
) -> Result<Vec<u64>> {
    build_brand_view_cohort_with(session, &PageWalker::new(), filters, set_id).await
}

/// Cohort assembly with an explicit walker (tests use a zero-delay one)
pub async fn build_brand_view_cohort_with(
    session: &Session,
    walker: &PageWalker,
    filters: &[Filter],
    set_id: Option<u64>,
) -> Result<Vec<u64>> {
    let base = match set_id {
        Some(id) => versioned(&format!("brand_view_sets/{id}/brand_views")),
        None => versioned("brand_views"),
    };

    let mut params = QueryParams::new().per_page(COHORT_PAGE_SIZE);
    if !filters.is_empty() {
        params = params.filters(filters.iter().cloned());
    }
    let path = params.append_to(&base)?;

    let mut ids = Vec::new();
    walker
        .walk(session, &path, FetchOptions::new(), |page| {
            collect_ids(page, &mut ids);
        })
        .await?;

    Ok(ids)
}

/// All brand view sets whose name matches `pattern`, in server order
pub async fn filter_brand_sets_by_name(
    session: &Session,
    pattern: &str,
) -> Result<Vec<BrandViewSet>> {
    filter_brand_sets_by_name_with(session, &PageWalker::new(), pattern).await
}

/// Set filtering with an explicit walker
pub async fn filter_brand_sets_by_name_with(
    session: &Session,
    walker: &PageWalker,
    pattern: &str,
) -> Result<Vec<BrandViewSet>> {
    let name_rx = Regex::new(pattern)?;

    let mut matches: Vec<BrandViewSet> = Vec::new();
    walker
        .walk(
            session,
            &versioned("brand_view_sets"),
            FetchOptions::new(),
            |page| {
                let records = page.get("records").and_then(Value::as_array);
                for record in records.into_iter().flatten() {
                    let named = record
                        .get("name")
                        .and_then(Value::as_str)
                        .is_some_and(|name| name_rx.is_match(name));
                    if named {
                        if let Ok(set) = serde_json::from_value(record.clone()) {
                            matches.push(set);
                        }
                    }
                }
            },
        )
        .await?;

    Ok(matches)
}

/// The first brand view set whose name matches `pattern`
///
/// First-match-wins; ordering follows the server's response order, and no
/// disambiguation is attempted when several sets match.
pub async fn find_brand_set_by_name(
    session: &Session,
    pattern: &str,
) -> Result<Option<BrandViewSet>> {
    let mut sets = filter_brand_sets_by_name(session, pattern).await?;
    Ok(if sets.is_empty() {
        None
    } else {
        Some(sets.remove(0))
    })
}

/// Walk every page of a set's member listing (convenience for tests and
/// callers that inspect raw pages rather than IDs)
pub async fn walk_set_members<F>(
    session: &Session,
    set_id: u64,
    page_delay: Duration,
    visit: F,
) -> Result<PageWalk>
where
    F: FnMut(&Value),
{
    PageWalker::with_delay(page_delay)
        .walk(
            session,
            &versioned(&format!("brand_view_sets/{set_id}/brand_views")),
            FetchOptions::new(),
            visit,
        )
        .await
}

fn collect_ids(page: &Value, ids: &mut Vec<u64>) {
    let records = page.get("records").and_then(Value::as_array);
    for record in records.into_iter().flatten() {
        if let Some(id) = record.get("id").and_then(Value::as_u64) {
            ids.push(id);
        }
    }
}
