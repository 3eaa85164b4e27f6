//! Top-level application orchestration.
//!
//! `src/main.rs` is intentionally tiny; this module is the "real main" that:
//! - parses CLI arguments
//! - resolves the table schema and category order
//! - runs the load/stack pipeline
//! - prints reports and warnings
//! - writes optional exports

use clap::Parser;

use crate::cli::{Cli, Command, StackArgs};
use crate::data::presets;
use crate::domain::{CategoryOrder, LoadConfig, TableSchema, TableShape, WideColumn};
use crate::error::AppError;

pub mod pipeline;

/// Entry point for the `cb` binary.
pub fn run() -> Result<(), AppError> {
    let cli = Cli::parse();

    match cli.command {
        Command::Stack(args) => handle_stack(args),
        Command::Totals(args) => handle_totals(args),
    }
}

fn handle_stack(args: StackArgs) -> Result<(), AppError> {
    let config = load_config_from_args(&args)?;
    let run = pipeline::run_stack(&config)?;

    println!(
        "{}",
        crate::report::format_run_summary(&run.ingest, &run.output, run.max_yearly_total, &config)
    );
    println!(
        "{}",
        crate::report::format_band_table(&run.output.series, config.limit)
    );

    // Optional exports.
    if let Some(path) = &config.export_bands {
        crate::io::export::write_bands_csv(path, &run.output.series)?;
    }
    if let Some(path) = &config.export_series {
        crate::io::export::write_series_json(path, &run.output.series, run.max_yearly_total)?;
    }

    Ok(())
}

fn handle_totals(args: StackArgs) -> Result<(), AppError> {
    let config = load_config_from_args(&args)?;
    let run = pipeline::run_stack(&config)?;

    println!(
        "{}",
        crate::report::format_yearly_totals(&run.yearly_totals, run.max_yearly_total)
    );

    Ok(())
}

/// Resolve CLI flags to a pipeline configuration.
///
/// Shape resolution: an explicit `--category-column/--count-column` pair
/// selects the long shape, explicit `--count COLUMN=LABEL` mappings select
/// the wide shape, and with neither the fire-calls wide preset applies. The
/// category order is never derived from the data: it comes from
/// `--category` flags, else from the wide mapping's label order, else from
/// the fire-calls preset.
pub fn load_config_from_args(args: &StackArgs) -> Result<LoadConfig, AppError> {
    let shape = match (&args.category_column, &args.count_column) {
        (Some(category_column), Some(count_column)) => TableShape::Long {
            category_column: category_column.clone(),
            count_column: count_column.clone(),
        },
        _ if !args.counts.is_empty() => TableShape::Wide {
            columns: parse_count_mappings(&args.counts)?,
        },
        _ => presets::fire_wide_schema().shape,
    };

    let order = if !args.categories.is_empty() {
        CategoryOrder::new(args.categories.iter().cloned())
    } else if let TableShape::Wide { columns } = &shape {
        CategoryOrder::new(columns.iter().map(|wc| wc.category.clone()))
    } else {
        presets::fire_category_order()
    };

    Ok(LoadConfig {
        csv_path: args.csv.clone(),
        schema: TableSchema {
            date_column: args.date_column.clone(),
            date_format: args.date_format.clone(),
            shape,
        },
        order,
        unknown: args.unknown,
        strict: args.strict,
        limit: args.limit,
        export_bands: args.export.clone(),
        export_series: args.export_json.clone(),
    })
}

/// Parse repeated `COLUMN=LABEL` flags. A bare `COLUMN` maps to itself.
fn parse_count_mappings(raw: &[String]) -> Result<Vec<WideColumn>, AppError> {
    raw.iter()
        .map(|entry| match entry.split_once('=') {
            Some((column, label)) if !column.trim().is_empty() && !label.trim().is_empty() => {
                Ok(WideColumn {
                    column: column.trim().to_string(),
                    category: label.trim().to_string(),
                })
            }
            None if !entry.trim().is_empty() => Ok(WideColumn {
                column: entry.trim().to_string(),
                category: entry.trim().to_string(),
            }),
            _ => Err(AppError::new(
                2,
                format!("Invalid --count mapping '{entry}' (expected COLUMN=LABEL)"),
            )),
        })
        .collect()
}
