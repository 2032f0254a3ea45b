//! Shared support for the contract tests
//!
//! Mock-server scaffolding for both pagination protocols plus the
//! response-shape checks the scenarios assert over and over.

#![allow(dead_code)]

use lfm_api::session::RateLimiterConfig;
use lfm_api::{ApiConfig, PageWalker, Session, SessionConfig};
use serde_json::{json, Value};
use std::time::Duration;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, Request, Respond, ResponseTemplate};

pub const TEST_TOKEN: &str = "test-token";
pub const TEST_API_KEY: &str = "test-api-key";

/// Start a mock server with the token endpoint mounted and return a
/// session pointed at it (fast retries, no pacing)
pub async fn start_api() -> (MockServer, Session) {
    let server = MockServer::start().await;
    mount_token(&server).await;
    let session = session_for(&server);
    (server, session)
}

/// A session against the mock server with test-friendly timings
pub fn session_for(server: &MockServer) -> Session {
    let config = ApiConfig::new(TEST_API_KEY, "test-client", "test-secret")
        .with_auth_host(server.uri())
        .with_api_host(server.uri());
    let session_config = SessionConfig::builder()
        .max_retries(3)
        .retry_after_default(Duration::from_millis(10))
        .build();
    Session::with_config(config, session_config)
}

/// A session with client-side pacing enabled
pub fn paced_session_for(server: &MockServer) -> Session {
    let config = ApiConfig::new(TEST_API_KEY, "test-client", "test-secret")
        .with_auth_host(server.uri())
        .with_api_host(server.uri());
    let session_config = SessionConfig::builder()
        .retry_after_default(Duration::from_millis(10))
        .rate_limit(RateLimiterConfig::new(100, 10))
        .build();
    Session::with_config(config, session_config)
}

/// Mount the OAuth2 token endpoint
pub async fn mount_token(server: &MockServer) {
    Mock::given(method("POST"))
        .and(path("/oauth2/token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "access_token": TEST_TOKEN,
            "token_type": "Bearer",
            "expires_in": 3600
        })))
        .mount(server)
        .await;
}

/// A page walker with no inter-page delay
pub fn fast_walker() -> PageWalker {
    PageWalker::with_delay(Duration::ZERO)
}

/// Generate `count` brand view records with sequential IDs starting at 1
pub fn brand_view_records(count: usize) -> Vec<Value> {
    (1..=count)
        .map(|i| {
            json!({
                "id": i,
                "name": format!("Brand {i}"),
                "type": if i % 7 == 0 { "CUSTOM" } else { "STANDARD" },
                "dimensions": {}
            })
        })
        .collect()
}

// ============================================================================
// Paging responders
// ============================================================================

/// Serves a fixed dataset through the `has_more_pages` protocol.
///
/// Reads `page` (default 1) and `per_page` from the query string and
/// slices the dataset accordingly, reporting `total_records`.
pub struct CountedPages {
    records: Vec<Value>,
    default_per_page: usize,
}

impl CountedPages {
    pub fn new(records: Vec<Value>) -> Self {
        Self {
            records,
            default_per_page: 1000,
        }
    }

    pub fn with_default_per_page(mut self, per_page: usize) -> Self {
        self.default_per_page = per_page;
        self
    }
}

impl Respond for CountedPages {
    fn respond(&self, request: &Request) -> ResponseTemplate {
        let page = query_usize(request, "page").unwrap_or(1).max(1);
        let per_page = query_usize(request, "per_page").unwrap_or(self.default_per_page);

        let start = (page - 1) * per_page;
        let end = (start + per_page).min(self.records.len());
        let slice: Vec<Value> = self.records.get(start..end).unwrap_or(&[]).to_vec();

        ResponseTemplate::new(200).set_body_json(json!({
            "records": slice,
            "page": page,
            "has_more_pages": end < self.records.len(),
            "total_records": self.records.len()
        }))
    }
}

/// Serves a fixed dataset through the `next_page_token` protocol.
///
/// Cursors are `cursor-N` where N is the next start offset; the final
/// page carries a null token. Reports `record_count`.
pub struct TokenPages {
    records: Vec<Value>,
    per_page: usize,
}

impl TokenPages {
    pub fn new(records: Vec<Value>, per_page: usize) -> Self {
        Self { records, per_page }
    }
}

impl Respond for TokenPages {
    fn respond(&self, request: &Request) -> ResponseTemplate {
        let start = query_value(request, "page_token")
            .and_then(|token| token.strip_prefix("cursor-").map(str::to_string))
            .and_then(|offset| offset.parse::<usize>().ok())
            .unwrap_or(0);

        let end = (start + self.per_page).min(self.records.len());
        let slice: Vec<Value> = self.records.get(start..end).unwrap_or(&[]).to_vec();
        let next_token = if end < self.records.len() {
            Value::from(format!("cursor-{end}"))
        } else {
            Value::Null
        };

        ResponseTemplate::new(200).set_body_json(json!({
            "records": slice,
            "page": start / self.per_page + 1,
            "next_page_token": next_token,
            "record_count": self.records.len()
        }))
    }
}

/// Serves a table-shaped analytics result paged through the request
/// body's `page` field.
pub struct BodyPagedTable {
    rows: Vec<Value>,
    columns: Vec<Value>,
    per_page: usize,
}

impl BodyPagedTable {
    pub fn new(rows: Vec<Value>, columns: Vec<Value>, per_page: usize) -> Self {
        Self {
            rows,
            columns,
            per_page,
        }
    }
}

impl Respond for BodyPagedTable {
    fn respond(&self, request: &Request) -> ResponseTemplate {
        let body: Value = serde_json::from_slice(&request.body).unwrap_or(Value::Null);
        let page = body
            .get("page")
            .and_then(Value::as_u64)
            .map_or(1, |p| p.max(1) as usize);

        let start = (page - 1) * self.per_page;
        let end = (start + self.per_page).min(self.rows.len());
        let slice: Vec<Value> = self.rows.get(start..end).unwrap_or(&[]).to_vec();

        ResponseTemplate::new(200).set_body_json(json!({
            "records": slice,
            "columns": self.columns,
            "page": page,
            "has_more_pages": end < self.rows.len(),
            "total_records": self.rows.len()
        }))
    }
}

fn query_value(request: &Request, key: &str) -> Option<String> {
    request
        .url
        .query_pairs()
        .find(|(k, _)| k == key)
        .map(|(_, v)| v.to_string())
}

fn query_usize(request: &Request, key: &str) -> Option<usize> {
    query_value(request, key).and_then(|v| v.parse().ok())
}

// ============================================================================
// Response-shape checks
// ============================================================================

/// A list envelope with at least one record
pub fn expect_records(data: &Value) {
    let records = data
        .get("records")
        .and_then(Value::as_array)
        .expect("response must carry a records array");
    assert!(!records.is_empty(), "records must not be empty");
}

/// Paging fields are present and consistent with the page size
pub fn expect_paging(data: &Value, per_page: Option<usize>) {
    let page = data
        .get("page")
        .and_then(Value::as_u64)
        .expect("paged response must carry a page number");
    assert!(page > 0, "page numbers are 1-based");
    if let Some(per_page) = per_page {
        let len = data["records"].as_array().map_or(0, Vec::len);
        assert!(
            len <= per_page,
            "page holds {len} records, more than per_page={per_page}"
        );
    }
}

/// A brand view record has the required shape
pub fn expect_brand_view(bv: &Value) {
    assert!(bv["id"].as_u64().unwrap_or(0) > 0, "brand view id: {bv}");
    assert!(bv["name"].as_str().is_some_and(|n| !n.is_empty()));
    let view_type = bv["type"].as_str().expect("brand view type");
    assert!(
        view_type == "STANDARD" || view_type == "CUSTOM",
        "unexpected brand view type {view_type}"
    );
}

/// A table response: records of rows plus matching column metadata
pub fn expect_table_response(data: &Value, expected_cols: Option<&[&str]>) {
    expect_records(data);
    let columns = data
        .get("columns")
        .and_then(Value::as_array)
        .expect("table response must carry columns");
    let first_row = data["records"][0]
        .as_array()
        .expect("table rows are arrays");
    assert_eq!(
        columns.len(),
        first_row.len(),
        "column metadata must match row width"
    );

    if let Some(expected) = expected_cols {
        for column in columns {
            let id = column["id"].as_str().expect("column id");
            assert!(expected.contains(&id), "unexpected column {id}");
        }
    }
}
