//! Analytics fetch requests
//!
//! `/v20200626/analytics/fetch` takes a POST body naming a dataset, a
//! cohort of brand view IDs, a date range, and the metrics/groupings to
//! compute. Responses are table-shaped (`records` of rows plus `columns`
//! metadata) and paginate through the request body's `page` field.

use crate::config::versioned;
use crate::error::Result;
use crate::pagination::{PageWalk, PageWalker};
use crate::query::{Filter, SortField};
use crate::session::{FetchOptions, Session};
use chrono::{Datelike, Duration, NaiveDate, Utc};
use serde::Serialize;
use serde_json::Value;

/// An analytics fetch request body
#[derive(Debug, Clone, Serialize, Default)]
pub struct AnalyticsRequest {
    /// Cohort of brand view IDs to analyze
    pub ids: Vec<u64>,
    /// Dataset to query
    pub dataset_id: String,
    /// Inclusive start date, `YYYY-MM-DD`
    pub start_date: String,
    /// Inclusive end date, `YYYY-MM-DD`
    pub end_date: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub metrics: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub group_by: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub sort: Vec<SortField>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub filters: Vec<Filter>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub source_attributes: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub per_page: Option<u32>,
}

impl AnalyticsRequest {
    /// Start a request against a dataset
    pub fn new(dataset_id: impl Into<String>) -> Self {
        Self {
            dataset_id: dataset_id.into(),
            ..Self::default()
        }
    }

    /// Set the cohort
    #[must_use]
    pub fn ids(mut self, ids: Vec<u64>) -> Self {
        self.ids = ids;
        self
    }

    /// Set the inclusive date range
    #[must_use]
    pub fn date_range(mut self, start: impl Into<String>, end: impl Into<String>) -> Self {
        self.start_date = start.into();
        self.end_date = end.into();
        self
    }

    /// Add metrics to compute
    #[must_use]
    pub fn metrics<S: Into<String>>(mut self, metrics: impl IntoIterator<Item = S>) -> Self {
        self.metrics.extend(metrics.into_iter().map(Into::into));
        self
    }

    /// Add grouping dimensions
    #[must_use]
    pub fn group_by<S: Into<String>>(mut self, fields: impl IntoIterator<Item = S>) -> Self {
        self.group_by.extend(fields.into_iter().map(Into::into));
        self
    }

    /// Add a sort clause
    #[must_use]
    pub fn sort(mut self, sort: SortField) -> Self {
        self.sort.push(sort);
        self
    }

    /// Add a filter predicate
    #[must_use]
    pub fn filter(mut self, filter: Filter) -> Self {
        self.filters.push(filter);
        self
    }

    /// Add source attributes to echo alongside each row
    #[must_use]
    pub fn source_attributes<S: Into<String>>(
        mut self,
        attrs: impl IntoIterator<Item = S>,
    ) -> Self {
        self.source_attributes
            .extend(attrs.into_iter().map(Into::into));
        self
    }

    /// Set the page size
    #[must_use]
    pub fn per_page(mut self, per_page: u32) -> Self {
        self.per_page = Some(per_page);
        self
    }

    /// Fetch the first (or only) page of results
    pub async fn fetch(&self, session: &Session) -> Result<Value> {
        session
            .post(&versioned("analytics/fetch"), serde_json::to_value(self)?)
            .await
    }

    /// Fetch every page, invoking `visit` per page (body paging)
    pub async fn fetch_all<F>(&self, session: &Session, visit: F) -> Result<PageWalk>
    where
        F: FnMut(&Value),
    {
        self.fetch_all_with(session, &PageWalker::new(), visit).await
    }

    /// Fetch every page with an explicit walker
    pub async fn fetch_all_with<F>(
        &self,
        session: &Session,
        walker: &PageWalker,
        visit: F,
    ) -> Result<PageWalk>
    where
        F: FnMut(&Value),
    {
        let opts = FetchOptions::post(serde_json::to_value(self)?);
        walker
            .walk(session, &versioned("analytics/fetch"), opts, visit)
            .await
    }
}

// ============================================================================
// Date-range helpers
// ============================================================================

/// Yesterday's date, `YYYY-MM-DD`
pub fn yesterday() -> String {
    n_days_ago(1)
}

/// The date `n` days ago, `YYYY-MM-DD`
pub fn n_days_ago(n: i64) -> String {
    (Utc::now().date_naive() - Duration::days(n))
        .format("%Y-%m-%d")
        .to_string()
}

/// First and last day of the previous calendar month, `YYYY-MM-DD`
pub fn last_month() -> (String, String) {
    let today = Utc::now().date_naive();
    let first_of_this_month =
        NaiveDate::from_ymd_opt(today.year(), today.month(), 1).unwrap_or(today);
    let last_of_prev = first_of_this_month - Duration::days(1);
    let first_of_prev = NaiveDate::from_ymd_opt(last_of_prev.year(), last_of_prev.month(), 1)
        .unwrap_or(last_of_prev);
    (
        first_of_prev.format("%Y-%m-%d").to_string(),
        last_of_prev.format("%Y-%m-%d").to_string(),
    )
}
