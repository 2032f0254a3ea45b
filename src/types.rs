//! Response envelopes and dictionary types
//!
//! The API wraps every response in one of three envelopes: a list
//! (`records` plus paging markers), a single record, or an error. Records
//! themselves are kept as opaque JSON and deserialized into the dictionary
//! types below where callers want structure.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

// ============================================================================
// Response envelopes
// ============================================================================

/// A page of a list endpoint
///
/// Two pagination marker schemes coexist across endpoint versions:
/// `has_more_pages` with a client-tracked page counter, and an opaque
/// `next_page_token` echoed back verbatim. Either (or neither) may be set.
#[derive(Debug, Clone, Deserialize)]
pub struct ListResponse {
    /// Ordered page records, opaque to the client
    #[serde(default)]
    pub records: Vec<Value>,
    /// Column metadata, present on table-shaped responses
    #[serde(default)]
    pub columns: Option<Vec<DatasetField>>,
    /// 1-based number of this page
    #[serde(default)]
    pub page: Option<u32>,
    /// Page-counter continuation marker
    #[serde(default)]
    pub has_more_pages: Option<bool>,
    /// Opaque-cursor continuation marker
    #[serde(default)]
    pub next_page_token: Option<String>,
    /// Server-reported total across all pages
    #[serde(default)]
    pub total_records: Option<u64>,
    /// Alternate name for the total used by some endpoints
    #[serde(default)]
    pub record_count: Option<u64>,
}

impl ListResponse {
    /// Server-reported total record count, whichever field carries it
    pub fn total(&self) -> Option<u64> {
        self.total_records.or(self.record_count)
    }

    /// Deserialize every record into `T`
    pub fn records_as<T: serde::de::DeserializeOwned>(&self) -> crate::Result<Vec<T>> {
        self.records
            .iter()
            .map(|r| serde_json::from_value(r.clone()).map_err(crate::Error::from))
            .collect()
    }
}

/// A single-record endpoint response
#[derive(Debug, Clone, Deserialize)]
pub struct RecordResponse {
    /// The record payload
    pub record: Value,
}

impl RecordResponse {
    /// Deserialize the record into `T`
    pub fn record_as<T: serde::de::DeserializeOwned>(&self) -> crate::Result<T> {
        serde_json::from_value(self.record.clone()).map_err(crate::Error::from)
    }
}

/// The error envelope returned with every non-2xx resource response
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ErrorBody {
    /// Server timestamp of the error
    pub error_ts: i64,
    /// Human-readable message
    pub error_msg: String,
    /// Originating service
    pub service_code: u32,
    /// Error code, asserted on by authorization-boundary tests
    pub error_code: u32,
    /// Optional structured detail
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error_details: Option<Value>,
}

impl std::fmt::Display for ErrorBody {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "API error {} (service {}): {}",
            self.error_code, self.service_code, self.error_msg
        )
    }
}

// ============================================================================
// Brand views and sets
// ============================================================================

/// Brand view flavor
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BrandViewType {
    Standard,
    Custom,
}

/// A named, filterable analytics subject
#[derive(Debug, Clone, Deserialize)]
pub struct BrandView {
    pub id: u64,
    pub name: String,
    #[serde(rename = "type")]
    pub view_type: BrandViewType,
    /// Dimension values keyed by field ID, shaped by the `fields` query
    #[serde(default)]
    pub dimensions: Option<BTreeMap<String, Value>>,
}

/// A named collection of brand views
#[derive(Debug, Clone, Deserialize)]
pub struct BrandViewSet {
    pub id: u64,
    pub name: String,
}

// ============================================================================
// Dataset dictionary
// ============================================================================

/// Field role within a dataset
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum FieldClass {
    Metric,
    Dimension,
}

/// Field value type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum FieldDataType {
    String,
    Integer,
    Float,
    Time,
    Boolean,
    Stringset,
}

/// What a field can be used for in a query
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum FieldCapability {
    Sortable,
    Filterable,
    Groupable,
    Selectable,
}

/// Metric accumulation interval
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum FieldInterval {
    Lifetime,
    Delta,
}

/// Lifecycle state of a field or dataset
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum StabilityState {
    Experimental,
    Beta,
    Ga,
    Deprecated,
    Eol,
}

/// Dataset flavor
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DatasetType {
    Analytic,
    DimensionGroup,
}

/// Analysis subject of an analytic dataset
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AnalysisType {
    Content,
    Brand,
}

/// Private-data authorization behavior of a dataset
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AuthorizationType {
    Strict,
    Partial,
}

/// Stat attribution modes available on content datasets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AttributionMode {
    Lifetime,
    InWindow,
    InAction,
}

/// A metric or dimension within a dataset
#[derive(Debug, Clone, Deserialize)]
pub struct DatasetField {
    pub id: String,
    pub name: String,
    pub class: FieldClass,
    pub data_type: FieldDataType,
    #[serde(default)]
    pub public: Option<bool>,
    #[serde(default)]
    pub listable: Option<bool>,
    #[serde(default)]
    pub stability_state: Option<StabilityState>,
    #[serde(default)]
    pub capabilities: Option<Vec<FieldCapability>>,
    /// Present on METRIC fields only
    #[serde(default)]
    pub interval: Option<FieldInterval>,
}

/// A dataset: the schema of metrics and dimensions for one analysis type
#[derive(Debug, Clone, Deserialize)]
pub struct Dataset {
    pub id: String,
    pub name: String,
    pub description: String,
    pub dataset_type: DatasetType,
    /// Set for ANALYTIC datasets, absent for dimension groups
    #[serde(default)]
    pub analysis_type: Option<AnalysisType>,
    #[serde(default)]
    pub primary_time_field: Option<String>,
    #[serde(default)]
    pub stability_state: Option<StabilityState>,
    #[serde(default)]
    pub authorization_type: Option<AuthorizationType>,
    #[serde(default)]
    pub stat_attribution_modes: Option<Vec<AttributionMode>>,
    /// Full field list, present on describe responses
    #[serde(default)]
    pub fields: Option<Vec<DatasetField>>,
}

// ============================================================================
// Platform endpoints
// ============================================================================

/// Kind of change carried by a release update
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum UpdateType {
    Enhancement,
    BugFix,
    LifecycleOrStabilityChange,
}

/// Surface touched by a release update
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum UpdateScope {
    Docs,
    Data,
    Api,
}

/// One entry in a platform release note
#[derive(Debug, Clone, Deserialize)]
pub struct ReleaseUpdate {
    pub update_type: UpdateType,
    pub update_scope: Vec<UpdateScope>,
    pub update_msg: String,
    pub breaking_change: bool,
}

/// A platform release
#[derive(Debug, Clone, Deserialize)]
pub struct ReleaseNote {
    pub release_number: u32,
    pub released_on: String,
    #[serde(default)]
    pub summary: Option<String>,
    pub updates: Vec<ReleaseUpdate>,
}

/// One row of the platform error-code registry
#[derive(Debug, Clone, Deserialize)]
pub struct ErrorCodeEntry {
    pub error_service_code: u32,
    pub error_msg: String,
}
