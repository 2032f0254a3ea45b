//! Query-parameter encodings
//!
//! List endpoints take `fields` as a comma-joined string and `sort`/
//! `filters` as JSON-encoded arrays embedded in query string values.
//! `QueryParams` builds those pairs; the same `Filter`/`SortField` types
//! serialize into analytics request bodies unchanged.

use crate::error::Result;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A single filter predicate
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Filter {
    pub field: String,
    pub operator: String,
    pub values: Vec<Value>,
}

impl Filter {
    /// Create a filter with an arbitrary operator
    pub fn new(field: impl Into<String>, operator: impl Into<String>, values: Vec<Value>) -> Self {
        Self {
            field: field.into(),
            operator: operator.into(),
            values,
        }
    }

    /// Equality filter against a single value
    pub fn eq(field: impl Into<String>, value: impl Into<Value>) -> Self {
        Self::new(field, "=", vec![value.into()])
    }

    /// Membership filter (`IN`) against several values
    pub fn is_in<V: Into<Value>>(field: impl Into<String>, values: Vec<V>) -> Self {
        Self::new(field, "IN", values.into_iter().map(Into::into).collect())
    }
}

/// Sort direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SortDir {
    Asc,
    Desc,
}

/// A single sort clause
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SortField {
    pub field: String,
    pub dir: SortDir,
}

impl SortField {
    /// Ascending sort on a field
    pub fn asc(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            dir: SortDir::Asc,
        }
    }

    /// Descending sort on a field
    pub fn desc(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            dir: SortDir::Desc,
        }
    }
}

/// Builder for list-endpoint query parameters
#[derive(Debug, Clone, Default)]
pub struct QueryParams {
    fields: Vec<String>,
    sort: Vec<SortField>,
    filters: Vec<Filter>,
    per_page: Option<u32>,
}

impl QueryParams {
    /// Create an empty parameter set
    pub fn new() -> Self {
        Self::default()
    }

    /// Request specific fields on each record
    #[must_use]
    pub fn fields<S: Into<String>>(mut self, fields: impl IntoIterator<Item = S>) -> Self {
        self.fields.extend(fields.into_iter().map(Into::into));
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

    /// Add several filter predicates
    #[must_use]
    pub fn filters(mut self, filters: impl IntoIterator<Item = Filter>) -> Self {
        self.filters.extend(filters);
        self
    }

    /// Set the page size
    #[must_use]
    pub fn per_page(mut self, per_page: u32) -> Self {
        self.per_page = Some(per_page);
        self
    }

    /// Encode into query-string pairs
    pub fn to_pairs(&self) -> Result<Vec<(String, String)>> {
        let mut pairs = Vec::new();
        if !self.fields.is_empty() {
            pairs.push(("fields".to_string(), self.fields.join(",")));
        }
        if !self.sort.is_empty() {
            pairs.push(("sort".to_string(), serde_json::to_string(&self.sort)?));
        }
        if !self.filters.is_empty() {
            pairs.push(("filters".to_string(), serde_json::to_string(&self.filters)?));
        }
        if let Some(per_page) = self.per_page {
            pairs.push(("per_page".to_string(), per_page.to_string()));
        }
        Ok(pairs)
    }

    /// Append the encoded parameters to a path
    pub fn append_to(&self, path: &str) -> Result<String> {
        let mut path = path.to_string();
        for (key, value) in self.to_pairs()? {
            path = append_query_pair(&path, &key, &value);
        }
        Ok(path)
    }
}

/// Append one `key=value` pair to a path, percent-encoding the value and
/// picking `?` or `&` based on whether the path already carries a query
pub fn append_query_pair(path: &str, key: &str, value: &str) -> String {
    let sep = if path.contains('?') { '&' } else { '?' };
    let encoded: String = url::form_urlencoded::Serializer::new(String::new())
        .append_pair(key, value)
        .finish();
    format!("{path}{sep}{encoded}")
}
