//! CLI module
//!
//! Small command-line surface over the client, mirroring the workflows
//! the test suite exercises.
//!
//! # Commands
//!
//! - `connect` - Obtain a token and list datasets (connectivity check)
//! - `datasets` - List datasets or describe one
//! - `list-values` - List values of a listable dimension
//! - `brand-views` - List brand views with fields/filters/sort
//! - `brand-view-sets` - List brand view sets
//! - `cohort` - Build a brand view cohort
//! - `release-notes` / `error-codes` - Platform endpoints

mod commands;
mod runner;

pub use commands::{Cli, Commands, OutputFormat};
pub use runner::Runner;
