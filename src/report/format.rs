//! Run summary and table formatting.

use crate::domain::{LoadConfig, StackedSeries};
use crate::io::ingest::IngestedData;
use crate::series::StackOutput;

/// How many row errors to echo in the summary before truncating.
const MAX_ROW_ERRORS_SHOWN: usize = 5;

/// Format the full run summary (row accounting + series shape + warnings).
pub fn format_run_summary(
    ingest: &IngestedData,
    output: &StackOutput,
    max_yearly_total: u64,
    config: &LoadConfig,
) -> String {
    let mut out = String::new();

    out.push_str("=== cb - stacked call series ===\n");
    out.push_str(&format!("Source: {}\n", config.csv_path.display()));
    out.push_str(&format!(
        "Rows: read={} used={} skipped={}\n",
        ingest.rows_read,
        ingest.rows_used,
        ingest.row_errors.len()
    ));

    let series = &output.series;
    if let (Some(first), Some(last)) = (series.dates.first(), series.dates.last()) {
        out.push_str(&format!(
            "Dates: n={} | span {} .. {}\n",
            series.dates.len(),
            first.date,
            last.date
        ));
    }
    out.push_str(&format!(
        "Categories ({}): {}\n",
        series.order.len(),
        series.order.labels().join(", ")
    ));
    out.push_str(&format!("Max yearly total: {max_yearly_total}\n"));

    if !ingest.row_errors.is_empty() {
        out.push_str("\nSkipped rows:\n");
        for err in ingest.row_errors.iter().take(MAX_ROW_ERRORS_SHOWN) {
            match &err.value {
                Some(value) => {
                    out.push_str(&format!("  line {}: {} ('{}')\n", err.line, err.message, value))
                }
                None => out.push_str(&format!("  line {}: {}\n", err.line, err.message)),
            }
        }
        let hidden = ingest.row_errors.len().saturating_sub(MAX_ROW_ERRORS_SHOWN);
        if hidden > 0 {
            out.push_str(&format!("  ... and {hidden} more\n"));
        }
    }

    if !output.dropped.is_empty() {
        out.push_str("\nDropped (not in category order):\n");
        for d in &output.dropped {
            out.push_str(&format!("  {}: {} call(s)\n", d.category, d.count));
        }
    }

    out.push('\n');
    out
}

/// Format the per-date band table, one `low..high` cell per category.
pub fn format_band_table(series: &StackedSeries, limit: usize) -> String {
    let mut out = String::new();

    let widths: Vec<usize> = series
        .order
        .iter()
        .map(|label| label.len().max(8))
        .collect();

    out.push_str(&format!("{:<10}", "Date"));
    for (label, &w) in series.order.iter().zip(&widths) {
        out.push_str(&format!("  {label:>w$}"));
    }
    out.push_str(&format!("  {:>8}\n", "Total"));

    for date_stack in series.dates.iter().take(limit) {
        out.push_str(&format!("{}", date_stack.date));
        for (band, &w) in date_stack.bands.iter().zip(&widths) {
            let cell = format!("{}..{}", band.low, band.high);
            out.push_str(&format!("  {cell:>w$}"));
        }
        out.push_str(&format!("  {:>8}\n", date_stack.total()));
    }

    let hidden = series.dates.len().saturating_sub(limit);
    if hidden > 0 {
        out.push_str(&format!("... and {hidden} more date(s)\n"));
    }

    out
}

/// Format the per-year totals table.
pub fn format_yearly_totals(totals: &[(i32, u64)], max_yearly_total: u64) -> String {
    let mut out = String::new();

    out.push_str("Yearly call totals:\n");
    for (year, total) in totals {
        let marker = if *total == max_yearly_total { " *" } else { "" };
        out.push_str(&format!("  {year}  {total:>8}{marker}\n"));
    }
    out.push_str(&format!("Max yearly total: {max_yearly_total}\n"));

    out
}
