//! CLI command execution

use super::commands::{Cli, Commands, OutputFormat};
use crate::cohort::{build_brand_view_cohort, find_brand_set_by_name};
use crate::config::{versioned, ApiConfig};
use crate::error::{Error, Result};
use crate::pagination::fetch_all_pages;
use crate::query::{Filter, QueryParams, SortField};
use crate::session::Session;
use serde_json::{json, Value};
use tracing::info;

/// Executes a parsed CLI invocation
pub struct Runner {
    cli: Cli,
}

impl Runner {
    /// Create a runner for a parsed CLI
    pub fn new(cli: Cli) -> Self {
        Self { cli }
    }

    /// Run the selected command
    pub async fn run(&self) -> Result<()> {
        let config = ApiConfig::from_env()?;
        let session = Session::new(config);

        match &self.cli.command {
            Commands::Connect => self.connect(&session).await,
            Commands::Datasets { id } => self.datasets(&session, id.as_deref()).await,
            Commands::ListValues { field } => self.list_values(&session, field).await,
            Commands::BrandViews {
                fields,
                filters,
                sort,
                per_page,
                all,
            } => {
                self.brand_views(
                    &session,
                    fields.as_deref(),
                    filters.as_deref(),
                    sort.as_deref(),
                    *per_page,
                    *all,
                )
                .await
            }
            Commands::BrandViewSets => self.print(&session.get(&versioned("brand_view_sets")).await?),
            Commands::Cohort { set_name, filters } => {
                self.cohort(&session, set_name.as_deref(), filters.as_deref())
                    .await
            }
            Commands::ReleaseNotes => {
                self.print(&session.get(&versioned("platform/release_notes")).await?)
            }
            Commands::ErrorCodes => {
                self.print(&session.get(&versioned("platform/error_codes")).await?)
            }
        }
    }

    /// Obtain a token, then list datasets over the authenticated session
    async fn connect(&self, session: &Session) -> Result<()> {
        session.access_token().await?;
        info!("obtained an access token");
        let datasets = session.get(&versioned("datasets")).await?;
        self.print(&datasets)
    }

    async fn datasets(&self, session: &Session, id: Option<&str>) -> Result<()> {
        let path = match id {
            Some(id) => versioned(&format!("datasets/{id}")),
            None => versioned("datasets"),
        };
        self.print(&session.get(&path).await?)
    }

    async fn list_values(&self, session: &Session, field: &str) -> Result<()> {
        let path = crate::query::append_query_pair(&versioned("list_values"), "field", field);
        self.print(&session.get(&path).await?)
    }

    async fn brand_views(
        &self,
        session: &Session,
        fields: Option<&str>,
        filters: Option<&str>,
        sort: Option<&str>,
        per_page: Option<u32>,
        all: bool,
    ) -> Result<()> {
        let mut params = QueryParams::new();
        if let Some(fields) = fields {
            params = params.fields(fields.split(',').map(str::trim));
        }
        if let Some(filters) = filters {
            let filters: Vec<Filter> = serde_json::from_str(filters)?;
            params = params.filters(filters);
        }
        if let Some(sort) = sort {
            let sort: Vec<SortField> = serde_json::from_str(sort)?;
            for clause in sort {
                params = params.sort(clause);
            }
        }
        if let Some(per_page) = per_page {
            params = params.per_page(per_page);
        }

        let path = params.append_to(&versioned("brand_views"))?;
        if all {
            let mut records = Vec::new();
            let walk = fetch_all_pages(session, &path, |page| {
                if let Some(page_records) = page.get("records").and_then(Value::as_array) {
                    records.extend(page_records.iter().cloned());
                }
            })
            .await?;
            info!(pages = walk.pages, records = walk.records, "walk complete");
            self.print(&json!({ "records": records }))
        } else {
            self.print(&session.get(&path).await?)
        }
    }

    async fn cohort(
        &self,
        session: &Session,
        set_name: Option<&str>,
        filters: Option<&str>,
    ) -> Result<()> {
        let set_id = match set_name {
            Some(pattern) => {
                let set = find_brand_set_by_name(session, pattern)
                    .await?
                    .ok_or_else(|| Error::config(format!("no brand view set matches {pattern}")))?;
                info!(set_id = set.id, set_name = %set.name, "resolved brand view set");
                Some(set.id)
            }
            None => None,
        };

        let filters: Vec<Filter> = match filters {
            Some(raw) => serde_json::from_str(raw)?,
            None => Vec::new(),
        };

        let ids = build_brand_view_cohort(session, &filters, set_id).await?;
        self.print(&json!({ "count": ids.len(), "ids": ids }))
    }

    fn print(&self, value: &Value) -> Result<()> {
        let rendered = match self.cli.format {
            OutputFormat::Json => serde_json::to_string(value)?,
            OutputFormat::Pretty => serde_json::to_string_pretty(value)?,
        };
        println!("{rendered}");
        Ok(())
    }
}
