//! Terminal rendering of pipeline results and query outputs.

use comfy_table::modifiers::UTF8_ROUND_CORNERS;
use comfy_table::presets::UTF8_FULL_CONDENSED;
use comfy_table::{Attribute, Cell, CellAlignment, ContentArrangement, Table as Display};

use medallion_model::{CellValue, Stage, Table};
use medallion_query::{RankedValue, RollupResult};
use medallion_validate::QualityReport;

use crate::pipeline::RunReport;

fn styled() -> Display {
    let mut table = Display::new();
    table
        .load_preset(UTF8_FULL_CONDENSED)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic);
    table
}

fn header_cell(text: &str) -> Cell {
    Cell::new(text).add_attribute(Attribute::Bold)
}

/// Format an aggregate without trailing zeros (10.50 -> 10.5, 10.0 -> 10).
fn fmt_number(v: f64) -> String {
    let s = format!("{v:.4}");
    s.trim_end_matches('0').trim_end_matches('.').to_string()
}

fn cell_text(value: &CellValue) -> String {
    match value {
        CellValue::Text(s) => s.clone(),
        CellValue::Number(n) => fmt_number(*n),
        CellValue::Timestamp(dt) => dt.format("%Y-%m-%dT%H:%M:%S").to_string(),
        CellValue::Missing => String::new(),
    }
}

/// Run summary: row counts, timings and dedup effect per stage.
pub fn print_run_summary(report: &RunReport) {
    let mut table = styled();
    table.set_header(vec![
        header_cell("Stage"),
        header_cell("Rows"),
        header_cell("Seconds"),
        header_cell("Decision"),
    ]);
    table.add_row(vec![
        "bronze".to_string(),
        report.metrics.bronze_rows.to_string(),
        "-".to_string(),
        "-".to_string(),
    ]);
    for stage in [&report.silver, &report.gold] {
        table.add_row(vec![
            stage.stage.to_string(),
            stage.rows.to_string(),
            format!("{:.2}", stage.secs),
            format!("{:?}", stage.decision).to_lowercase(),
        ]);
    }
    if let Some(column) = table.column_mut(1) {
        column.set_cell_alignment(CellAlignment::Right);
    }
    println!("{table}");
    println!(
        "Duplicates eliminated (bronze -> silver): {:.2}%",
        report.metrics.duplicate_pct()
    );
    println!("Total silver+gold time: {:.2}s", report.metrics.total_secs());
    if !report.coercions.is_empty() {
        println!("Coercion warnings: {}", report.coercions.len());
    }
    if let Some(quality) = &report.quality {
        print_quality(quality);
    }
}

/// Quality findings, or a clean bill.
pub fn print_quality(report: &QualityReport) {
    if report.is_clean() {
        println!("Quality: no findings.");
        return;
    }
    let mut table = styled();
    table.set_header(vec![
        header_cell("Severity"),
        header_cell("Kind"),
        header_cell("Column"),
        header_cell("Count"),
        header_cell("Message"),
    ]);
    for finding in &report.findings {
        table.add_row(vec![
            format!("{:?}", finding.severity).to_lowercase(),
            format!("{:?}", finding.kind),
            finding.column.clone().unwrap_or_else(|| "-".to_string()),
            finding.count.to_string(),
            finding.message.clone(),
        ]);
    }
    println!("{table}");
}

/// Which stage tables exist, with row counts.
pub fn print_status(statuses: &[(Stage, Option<usize>)]) {
    let mut table = styled();
    table.set_header(vec![
        header_cell("Stage"),
        header_cell("Present"),
        header_cell("Rows"),
    ]);
    for (stage, rows) in statuses {
        table.add_row(vec![
            stage.to_string(),
            if rows.is_some() { "yes" } else { "no" }.to_string(),
            rows.map_or_else(|| "-".to_string(), |r| r.to_string()),
        ]);
    }
    println!("{table}");
}

/// Print a stage table clipped to `max_rows`/`max_columns` (0 = all).
pub fn print_table(data: &Table, max_rows: usize, max_columns: usize) {
    let columns: Vec<_> = if max_columns == 0 {
        data.columns().iter().collect()
    } else {
        data.columns().iter().take(max_columns).collect()
    };
    let rows = if max_rows == 0 {
        data.height()
    } else {
        data.height().min(max_rows)
    };

    let mut table = styled();
    table.set_header(columns.iter().map(|c| header_cell(&c.name)));
    for row in 0..rows {
        table.add_row(columns.iter().map(|c| cell_text(&c.values[row])));
    }
    println!("{table}");
    println!(
        "Showing {rows} of {} rows, {} of {} columns.",
        data.height(),
        columns.len(),
        data.width()
    );
}

/// Rollup result: one column per hierarchy level plus the aggregate.
pub fn print_rollup(result: &RollupResult) {
    let mut table = styled();
    let mut header: Vec<Cell> = result.hierarchy.iter().map(|h| header_cell(h)).collect();
    header.push(header_cell(&format!("total_{}", result.measure)));
    table.set_header(header);
    for row in &result.rows {
        let mut cells: Vec<String> = row.levels.clone();
        cells.push(fmt_number(row.total));
        table.add_row(cells);
    }
    if let Some(column) = table.column_mut(result.hierarchy.len()) {
        column.set_cell_alignment(CellAlignment::Right);
    }
    println!("{table}");
}

/// Top-K values with their source row positions.
pub fn print_topk(ranked: &[RankedValue], column: &str) {
    let mut table = styled();
    table.set_header(vec![
        header_cell("Rank"),
        header_cell("Row"),
        header_cell(column),
    ]);
    for (rank, value) in ranked.iter().enumerate() {
        table.add_row(vec![
            (rank + 1).to_string(),
            value.row.to_string(),
            fmt_number(value.value),
        ]);
    }
    println!("{table}");
}

/// Tail of the rolling-mean series next to the source values.
pub fn print_rolling(
    values: &[CellValue],
    means: &[Option<f64>],
    column: &str,
    window: usize,
    tail: usize,
) {
    let start = means.len().saturating_sub(tail);
    let mut table = styled();
    table.set_header(vec![
        header_cell("Row"),
        header_cell(column),
        header_cell(&format!("mean_{window}")),
    ]);
    for idx in start..means.len() {
        table.add_row(vec![
            idx.to_string(),
            values.get(idx).map(cell_text).unwrap_or_default(),
            means[idx].map(fmt_number).unwrap_or_default(),
        ]);
    }
    println!("{table}");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fmt_number_trims_trailing_zeros() {
        assert_eq!(fmt_number(10.0), "10");
        assert_eq!(fmt_number(10.5), "10.5");
        assert_eq!(fmt_number(-3.25), "-3.25");
    }
}
