//! Export the stacked series to CSV/JSON.
//!
//! The CSV is meant to be easy to consume in spreadsheets or downstream
//! scripts; the JSON file is the portable hand-off to a renderer (band
//! geometry + legend order + the yearly maximum for axis sizing).

use std::fs::File;
use std::io::Write;
use std::path::Path;

use crate::domain::{SeriesFile, StackedSeries};
use crate::error::AppError;

/// Write one `date,category,low,high,count` row per band.
pub fn write_bands_csv(path: &Path, series: &StackedSeries) -> Result<(), AppError> {
    let mut file = File::create(path).map_err(|e| {
        AppError::new(2, format!("Failed to create band CSV '{}': {e}", path.display()))
    })?;

    writeln!(file, "date,category,low,high,count")
        .map_err(|e| AppError::new(2, format!("Failed to write band CSV header: {e}")))?;

    for date_stack in &series.dates {
        for band in &date_stack.bands {
            writeln!(
                file,
                "{},{},{},{},{}",
                date_stack.date,
                band.category,
                band.low,
                band.high,
                band.count(),
            )
            .map_err(|e| AppError::new(2, format!("Failed to write band CSV row: {e}")))?;
        }
    }

    Ok(())
}

/// Write a series JSON file (schema: [`SeriesFile`]).
pub fn write_series_json(
    path: &Path,
    series: &StackedSeries,
    max_yearly_total: u64,
) -> Result<(), AppError> {
    let file = File::create(path).map_err(|e| {
        AppError::new(2, format!("Failed to create series JSON '{}': {e}", path.display()))
    })?;

    let out = SeriesFile {
        tool: "cb".to_string(),
        order: series.order.clone(),
        max_yearly_total,
        dates: series.dates.clone(),
    };

    serde_json::to_writer_pretty(file, &out)
        .map_err(|e| AppError::new(2, format!("Failed to write series JSON: {e}")))?;

    Ok(())
}
