//! CSV ingest and normalization.
//!
//! This module turns a raw call-log CSV into a clean sequence of
//! `(date, category, count)` observations that are safe to stack.
//!
//! Design goals:
//! - **Strict schema** for required columns (clear errors + exit code 2)
//! - **Row-level validation** (skip bad rows, but report what happened)
//! - **Deterministic behavior** (output follows input row order)
//! - **Separation of concerns**: no grouping or stacking logic here
//!
//! Date parsing is the only thing that can fail a row: an unparseable date
//! under the configured format is reported with its CSV line and raw value,
//! never silently turned into a wrong date. Count fields are coerced
//! permissively instead (see [`coerce_count`]) — that mirrors the upstream
//! exports, where blank cells simply mean "no calls".

use std::collections::HashMap;
use std::fs::File;

use chrono::NaiveDate;
use csv::StringRecord;

use crate::domain::{LoadConfig, Observation, TableSchema, TableShape};
use crate::error::AppError;

/// One raw record from the table source: CSV line number plus a mapping from
/// normalized column name to the (trimmed) field value.
#[derive(Debug, Clone)]
pub struct RawRow {
    /// 1-based CSV line number (header is line 1).
    pub line: usize,
    pub fields: HashMap<String, String>,
}

impl RawRow {
    /// Field value for `column`, if present and non-empty.
    pub fn get(&self, column: &str) -> Option<&str> {
        self.fields
            .get(&normalize_header_name(column))
            .map(String::as_str)
            .filter(|s| !s.is_empty())
    }
}

/// A row-level error encountered during normalization.
#[derive(Debug, Clone)]
pub struct RowError {
    pub line: usize,
    /// The offending raw field value, when there is one.
    pub value: Option<String>,
    pub message: String,
}

/// Pure normalization output: observations in input order, plus every row
/// that could not be normalized. The caller decides whether row errors are
/// fatal (see [`load_observations`] and `LoadConfig::strict`).
#[derive(Debug, Clone)]
pub struct NormalizedRows {
    pub observations: Vec<Observation>,
    pub row_errors: Vec<RowError>,
}

/// Ingest output: normalized observations + row accounting.
#[derive(Debug, Clone)]
pub struct IngestedData {
    pub observations: Vec<Observation>,
    pub row_errors: Vec<RowError>,
    pub rows_read: usize,
    pub rows_used: usize,
}

/// Load a call-log CSV and normalize it to [`Observation`]s.
///
/// With `strict` set, the first bad row aborts the load; otherwise bad rows
/// are skipped and reported via `row_errors`.
pub fn load_observations(config: &LoadConfig) -> Result<IngestedData, AppError> {
    let file = File::open(&config.csv_path).map_err(|e| {
        AppError::new(
            2,
            format!("Failed to open CSV '{}': {e}", config.csv_path.display()),
        )
    })?;

    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(file);

    let headers = reader
        .headers()
        .map_err(|e| AppError::new(2, format!("Failed to read CSV headers: {e}")))?
        .clone();

    let header_map = build_header_map(&headers);
    ensure_schema_columns_exist(&config.schema, &header_map)?;

    let mut rows = Vec::new();
    let mut csv_errors = Vec::new();
    let mut rows_read = 0usize;

    for (idx, result) in reader.records().enumerate() {
        // +2 because:
        // - records() starts at line 1 after headers
        // - CSV is 1-based line numbers
        let line = idx + 2;
        rows_read += 1;

        match result {
            Ok(record) => rows.push(raw_row(line, &record, &header_map)),
            Err(e) => csv_errors.push(RowError {
                line,
                value: None,
                message: format!("CSV parse error: {e}"),
            }),
        }
    }

    let normalized = normalize(&rows, &config.schema);

    let mut row_errors = csv_errors;
    row_errors.extend(normalized.row_errors);
    row_errors.sort_by_key(|e| e.line);

    if config.strict {
        if let Some(first) = row_errors.first() {
            return Err(AppError::new(
                2,
                format!(
                    "Aborting on bad row (strict): line {}: {}",
                    first.line, first.message
                ),
            ));
        }
    }

    let rows_used = rows_read - row_errors.len();
    if normalized.observations.is_empty() {
        return Err(AppError::new(3, "No valid rows remain after normalization."));
    }

    Ok(IngestedData {
        observations: normalized.observations,
        row_errors,
        rows_read,
        rows_used,
    })
}

/// Normalize raw rows to observations under `schema`.
///
/// Pure: no I/O, no sorting, no deduping, and no category validation — the
/// stacker owns ordering and category policy. Each row yields one
/// observation per mapped count column (wide shape) or exactly one (long
/// shape), in input row order.
pub fn normalize(rows: &[RawRow], schema: &TableSchema) -> NormalizedRows {
    let mut observations = Vec::new();
    let mut row_errors = Vec::new();

    for row in rows {
        let Some(raw_date) = row.get(&schema.date_column) else {
            row_errors.push(RowError {
                line: row.line,
                value: None,
                message: format!("Missing value in date column `{}`", schema.date_column),
            });
            continue;
        };

        let date = match NaiveDate::parse_from_str(raw_date, &schema.date_format) {
            Ok(d) => d,
            Err(_) => {
                row_errors.push(RowError {
                    line: row.line,
                    value: Some(raw_date.to_string()),
                    message: format!(
                        "Invalid date '{raw_date}' for format '{}'",
                        schema.date_format
                    ),
                });
                continue;
            }
        };

        match &schema.shape {
            TableShape::Long {
                category_column,
                count_column,
            } => {
                let Some(category) = row.get(category_column) else {
                    row_errors.push(RowError {
                        line: row.line,
                        value: None,
                        message: format!("Missing value in category column `{category_column}`"),
                    });
                    continue;
                };
                observations.push(Observation {
                    date,
                    category: category.to_string(),
                    count: coerce_count(row.get(count_column)),
                });
            }
            TableShape::Wide { columns } => {
                for wc in columns {
                    observations.push(Observation {
                        date,
                        category: wc.category.clone(),
                        count: coerce_count(row.get(&wc.column)),
                    });
                }
            }
        }
    }

    NormalizedRows {
        observations,
        row_errors,
    }
}

/// Coerce a raw count field to a non-negative integer.
///
/// Permissive on purpose: missing, blank, or non-numeric values become 0
/// rather than failing the row (blank cells in the upstream exports mean "no
/// calls that day"). Float-looking values are truncated; negatives clamp to
/// 0 so bands stay monotone. The trade-off is that genuinely bad data can
/// hide behind a zero — the row counts in [`IngestedData`] are the signal
/// for that.
pub fn coerce_count(raw: Option<&str>) -> u64 {
    let Some(s) = raw else { return 0 };
    if let Ok(v) = s.parse::<u64>() {
        return v;
    }
    match s.parse::<f64>() {
        Ok(v) if v.is_finite() && v > 0.0 => v.trunc() as u64,
        _ => 0,
    }
}

fn raw_row(line: usize, record: &StringRecord, header_map: &HashMap<String, usize>) -> RawRow {
    let fields = header_map
        .iter()
        .filter_map(|(name, idx)| {
            let value = record.get(*idx)?.trim();
            (!value.is_empty()).then(|| (name.clone(), value.to_string()))
        })
        .collect();
    RawRow { line, fields }
}

fn build_header_map(headers: &StringRecord) -> HashMap<String, usize> {
    headers
        .iter()
        .enumerate()
        .map(|(idx, name)| (normalize_header_name(name), idx))
        .collect()
}

fn normalize_header_name(name: &str) -> String {
    // Excel and other tools sometimes emit UTF-8 CSVs with a BOM prefix on the
    // first header (e.g. "﻿Call Date"). If we don't strip it, schema
    // validation will incorrectly report missing columns.
    let name = name.trim().trim_start_matches('\u{feff}');
    name.to_ascii_lowercase()
}

fn ensure_schema_columns_exist(
    schema: &TableSchema,
    header_map: &HashMap<String, usize>,
) -> Result<(), AppError> {
    let mut missing = Vec::new();

    let mut check = |column: &str| {
        if !header_map.contains_key(&normalize_header_name(column)) {
            missing.push(format!("`{column}`"));
        }
    };

    check(&schema.date_column);
    match &schema.shape {
        TableShape::Long {
            category_column,
            count_column,
        } => {
            check(category_column);
            check(count_column);
        }
        TableShape::Wide { columns } => {
            for wc in columns {
                check(&wc.column);
            }
        }
    }

    if missing.is_empty() {
        Ok(())
    } else {
        Err(AppError::new(
            2,
            format!("Missing required column(s): {}", missing.join(", ")),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::WideColumn;

    fn row(line: usize, fields: &[(&str, &str)]) -> RawRow {
        RawRow {
            line,
            fields: fields
                .iter()
                .map(|(k, v)| (normalize_header_name(k), v.to_string()))
                .collect(),
        }
    }

    fn long_schema() -> TableSchema {
        TableSchema {
            date_column: "Call Date".to_string(),
            date_format: "%m/%d/%Y".to_string(),
            shape: TableShape::Long {
                category_column: "Custom Grouping".to_string(),
                count_column: "Count".to_string(),
            },
        }
    }

    fn wide_schema() -> TableSchema {
        TableSchema {
            date_column: "Call Date".to_string(),
            date_format: "%m/%d/%Y".to_string(),
            shape: TableShape::Wide {
                columns: vec![
                    WideColumn {
                        column: "Fire".to_string(),
                        category: "Fire".to_string(),
                    },
                    WideColumn {
                        column: "Medical".to_string(),
                        category: "Medical".to_string(),
                    },
                ],
            },
        }
    }

    #[test]
    fn long_rows_normalize_in_input_order() {
        let rows = vec![
            row(2, &[("Call Date", "01/02/2020"), ("Custom Grouping", "Fire"), ("Count", "3")]),
            row(3, &[("Call Date", "01/01/2020"), ("Custom Grouping", "Medical"), ("Count", "2")]),
        ];

        let out = normalize(&rows, &long_schema());
        assert!(out.row_errors.is_empty());
        assert_eq!(out.observations.len(), 2);
        // Not sorted here: the stacker owns ordering.
        assert_eq!(out.observations[0].category, "Fire");
        assert_eq!(out.observations[0].count, 3);
        assert_eq!(out.observations[1].category, "Medical");
        assert_eq!(
            out.observations[1].date,
            NaiveDate::from_ymd_opt(2020, 1, 1).unwrap()
        );
    }

    #[test]
    fn wide_rows_yield_one_observation_per_count_column() {
        let rows = vec![row(
            2,
            &[("Call Date", "03/15/2019"), ("Fire", "1"), ("Medical", "4")],
        )];

        let out = normalize(&rows, &wide_schema());
        assert!(out.row_errors.is_empty());
        assert_eq!(out.observations.len(), 2);
        assert_eq!(out.observations[0].category, "Fire");
        assert_eq!(out.observations[0].count, 1);
        assert_eq!(out.observations[1].category, "Medical");
        assert_eq!(out.observations[1].count, 4);
    }

    #[test]
    fn unparseable_date_is_reported_not_guessed() {
        let rows = vec![
            row(2, &[("Call Date", "13/40/2020"), ("Custom Grouping", "Fire"), ("Count", "1")]),
            row(3, &[("Call Date", "01/05/2020"), ("Custom Grouping", "Fire"), ("Count", "1")]),
        ];

        let out = normalize(&rows, &long_schema());
        assert_eq!(out.observations.len(), 1);
        assert_eq!(out.row_errors.len(), 1);
        let err = &out.row_errors[0];
        assert_eq!(err.line, 2);
        assert_eq!(err.value.as_deref(), Some("13/40/2020"));
        assert!(err.message.contains("Invalid date"));
    }

    #[test]
    fn missing_category_is_a_row_error() {
        let rows = vec![row(2, &[("Call Date", "01/05/2020"), ("Count", "1")])];

        let out = normalize(&rows, &long_schema());
        assert!(out.observations.is_empty());
        assert_eq!(out.row_errors.len(), 1);
        assert!(out.row_errors[0].message.contains("Custom Grouping"));
    }

    #[test]
    fn counts_coerce_permissively() {
        assert_eq!(coerce_count(Some("7")), 7);
        assert_eq!(coerce_count(Some("2.9")), 2);
        assert_eq!(coerce_count(Some("-4")), 0);
        assert_eq!(coerce_count(Some("n/a")), 0);
        assert_eq!(coerce_count(Some("NaN")), 0);
        assert_eq!(coerce_count(None), 0);
    }

    #[test]
    fn header_names_are_bom_stripped_and_case_insensitive() {
        assert_eq!(normalize_header_name("\u{feff}Call Date"), "call date");
        assert_eq!(normalize_header_name("  CALL DATE "), "call date");
    }

    #[test]
    fn missing_count_column_value_is_zero_not_an_error() {
        let rows = vec![row(2, &[("Call Date", "03/15/2019"), ("Fire", "2")])];

        let out = normalize(&rows, &wide_schema());
        assert!(out.row_errors.is_empty());
        assert_eq!(out.observations[1].category, "Medical");
        assert_eq!(out.observations[1].count, 0);
    }
}
