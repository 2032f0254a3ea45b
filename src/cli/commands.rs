//! CLI commands and argument parsing

use clap::{Parser, Subcommand};

/// LFM analytics API client
#[derive(Parser, Debug)]
#[command(name = "lfm-api")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Output format
    #[arg(short, long, global = true, default_value = "pretty")]
    pub format: OutputFormat,

    /// Verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// CLI subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Obtain an access token and list datasets (connectivity check)
    Connect,

    /// List datasets, or describe one by ID
    Datasets {
        /// Dataset ID to describe (e.g. dataset_brand_listenfirst)
        id: Option<String>,
    },

    /// List the values of a listable dimension
    ListValues {
        /// Field ID (e.g. lfm.brand.genres)
        #[arg(long)]
        field: String,
    },

    /// List brand views
    BrandViews {
        /// Fields to include (comma-separated field IDs)
        #[arg(long)]
        fields: Option<String>,

        /// Filters as a JSON array
        #[arg(long)]
        filters: Option<String>,

        /// Sort clauses as a JSON array
        #[arg(long)]
        sort: Option<String>,

        /// Page size
        #[arg(long)]
        per_page: Option<u32>,

        /// Walk every page instead of fetching the first
        #[arg(long)]
        all: bool,
    },

    /// List brand view sets
    BrandViewSets,

    /// Build a brand view cohort (ordered IDs)
    Cohort {
        /// Restrict to a set whose name matches this pattern
        #[arg(long)]
        set_name: Option<String>,

        /// Filters as a JSON array
        #[arg(long)]
        filters: Option<String>,
    },

    /// Retrieve the platform release notes
    ReleaseNotes,

    /// List the platform error-code registry
    ErrorCodes,
}

/// Output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// Compact JSON
    Json,
    /// Pretty-printed JSON
    Pretty,
}
