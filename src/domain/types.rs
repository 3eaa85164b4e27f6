//! Shared domain types.
//!
//! These types are intentionally kept lightweight and serializable so they can be:
//!
//! - used in-memory while building the stacked series
//! - exported to CSV/JSON for a renderer to consume
//! - reloaded later for comparisons

use std::path::PathBuf;

use chrono::NaiveDate;
use clap::ValueEnum;
use serde::{Deserialize, Serialize};

/// One `(date, category, count)` fact taken from the source table.
///
/// Day precision only; counts are non-negative by construction. Duplicate
/// `(date, category)` pairs may occur in raw inputs and are resolved by the
/// stacker, not here.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Observation {
    pub date: NaiveDate,
    pub category: String,
    pub count: u64,
}

/// Fixed, ordered list of known category labels.
///
/// The same order drives both stacking (band order at every date) and any
/// legend a renderer draws, so it is defined once in configuration and passed
/// everywhere — never derived from the data itself. An observation whose
/// category is missing from this list is a data-quality problem handled by
/// the [`UnknownCategory`] policy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryOrder(Vec<String>);

impl CategoryOrder {
    pub fn new<I, S>(labels: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self(labels.into_iter().map(Into::into).collect())
    }

    pub fn labels(&self) -> &[String] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Position of `label` in the stacking order, if it is a known category.
    pub fn index_of(&self, label: &str) -> Option<usize> {
        self.0.iter().position(|l| l == label)
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }
}

/// The vertical extent of one category's contribution at one date.
///
/// `low..high` is the cumulative band: `low` is the sum of all earlier
/// categories' counts at the same date, `high` adds this category's count.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StackedBand {
    pub category: String,
    pub low: u64,
    pub high: u64,
}

impl StackedBand {
    /// This category's own count at the band's date.
    pub fn count(&self) -> u64 {
        self.high - self.low
    }
}

/// All bands for a single date, ordered by the shared [`CategoryOrder`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateStack {
    pub date: NaiveDate,
    pub bands: Vec<StackedBand>,
}

impl DateStack {
    /// Total calls on this date (the last band's `high`).
    pub fn total(&self) -> u64 {
        self.bands.last().map(|b| b.high).unwrap_or(0)
    }
}

/// The full stacked output: one [`DateStack`] per distinct input date,
/// ascending by date, each carrying exactly `order.len()` bands.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StackedSeries {
    pub order: CategoryOrder,
    pub dates: Vec<DateStack>,
}

/// One count column of a wide-shape table and the category it maps to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WideColumn {
    pub column: String,
    pub category: String,
}

/// How count data is laid out in the source table.
///
/// The tool's inputs historically came in two shapes, and both stay
/// supported: one `(category, count)` column pair per row, or several count
/// columns keyed by category label.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum TableShape {
    /// Long form: one row per `(date, category)` with a count column.
    Long {
        category_column: String,
        count_column: String,
    },
    /// Wide form: one row per date with a fixed set of count columns.
    Wide { columns: Vec<WideColumn> },
}

/// Column mapping for the loader: where dates live, how they are formatted,
/// and where counts come from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableSchema {
    pub date_column: String,
    /// chrono format string, e.g. `%m/%d/%Y`.
    pub date_format: String,
    pub shape: TableShape,
}

/// Policy for observations whose category is not in the [`CategoryOrder`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum UnknownCategory {
    /// Leave the observation out of the series, but report what was dropped.
    Drop,
    /// Fail the run, naming the offending label.
    Fail,
}

/// A full run's configuration as understood by the pipeline.
///
/// This is derived from CLI flags (plus the fire-calls preset defaults).
#[derive(Debug, Clone)]
pub struct LoadConfig {
    pub csv_path: PathBuf,
    pub schema: TableSchema,
    pub order: CategoryOrder,
    pub unknown: UnknownCategory,
    /// Abort the load on the first bad row instead of skipping it.
    pub strict: bool,

    /// Maximum number of dates shown in the printed band table.
    pub limit: usize,

    pub export_bands: Option<PathBuf>,
    pub export_series: Option<PathBuf>,
}

/// A saved series file (JSON): everything a renderer needs to draw the
/// stacked area chart — band geometry, the legend/stacking order, and the
/// yearly maximum used to size the value axis.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SeriesFile {
    pub tool: String,
    pub order: CategoryOrder,
    pub max_yearly_total: u64,
    pub dates: Vec<DateStack>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn index_of_follows_declaration_order() {
        let order = CategoryOrder::new(["Medical", "Fire"]);
        assert_eq!(order.index_of("Medical"), Some(0));
        assert_eq!(order.index_of("Fire"), Some(1));
        assert_eq!(order.index_of("Rescue"), None);
    }

    #[test]
    fn empty_date_stack_total_is_zero() {
        let stack = DateStack {
            date: NaiveDate::from_ymd_opt(2020, 1, 1).unwrap(),
            bands: Vec::new(),
        };
        assert_eq!(stack.total(), 0);
    }

    #[test]
    fn band_count_is_high_minus_low() {
        let band = StackedBand {
            category: "Fire".to_string(),
            low: 2,
            high: 5,
        };
        assert_eq!(band.count(), 3);
    }
}
