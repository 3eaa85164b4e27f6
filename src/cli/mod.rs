//! Command-line parsing for the stacked call-series builder.
//!
//! The goal of this module is to keep **argument parsing** and **command
//! dispatch** separate from the pipeline code.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::domain::UnknownCategory;

/// Top-level CLI.
#[derive(Debug, Parser)]
#[command(name = "cb", version, about = "Emergency-call stacked-series builder")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

/// CLI subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Build the stacked series, print a summary and band table, optionally export.
    Stack(StackArgs),
    /// Print per-year call totals and the maximum yearly total.
    Totals(StackArgs),
}

/// Common options for loading and stacking.
///
/// Without shape flags the fire-calls preset applies: the seven SFFD call
/// groups in wide form, `Call Date` dates formatted `%m/%d/%Y`.
#[derive(Debug, Parser, Clone)]
pub struct StackArgs {
    /// Path to the source CSV.
    pub csv: PathBuf,

    /// Name of the date column.
    #[arg(long, default_value = "Call Date")]
    pub date_column: String,

    /// chrono format of the date column (e.g. %m/%d/%Y).
    #[arg(long, default_value = "%m/%d/%Y")]
    pub date_format: String,

    /// Long-shape input: column holding the category label.
    #[arg(long, requires = "count_column")]
    pub category_column: Option<String>,

    /// Long-shape input: column holding the count.
    #[arg(long, requires = "category_column")]
    pub count_column: Option<String>,

    /// Wide-shape input: a COLUMN=LABEL count-column mapping (repeatable).
    #[arg(
        long = "count",
        value_name = "COLUMN=LABEL",
        conflicts_with_all = ["category_column", "count_column"]
    )]
    pub counts: Vec<String>,

    /// Category stacking order (repeatable; defaults to the mapped labels,
    /// or to the fire-calls groups).
    #[arg(long = "category", value_name = "LABEL")]
    pub categories: Vec<String>,

    /// Policy for data categories missing from the stacking order.
    #[arg(long, value_enum, default_value_t = UnknownCategory::Drop)]
    pub unknown: UnknownCategory,

    /// Abort the load on the first bad row instead of skipping it.
    #[arg(long)]
    pub strict: bool,

    /// Maximum number of dates printed in the band table.
    #[arg(long, default_value_t = 12)]
    pub limit: usize,

    /// Export stacked bands to CSV.
    #[arg(long, value_name = "CSV")]
    pub export: Option<PathBuf>,

    /// Export the series (order + bands + max yearly total) to JSON.
    #[arg(long = "export-json", value_name = "JSON")]
    pub export_json: Option<PathBuf>,
}
