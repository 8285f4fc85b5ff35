//! Column name canonicalization and null-sentinel normalization.

use medallion_model::{CellValue, Column, Table};

/// Literal tokens treated as absent values, besides empty and
/// whitespace-only strings.
const NULL_TOKENS: [&str; 3] = ["NULL", "null", "None"];

/// Canonicalize a raw column name.
///
/// Lowercased, trimmed, and every run of characters outside `[a-z0-9_]`
/// collapsed to a single underscore. Idempotent.
pub fn normalize_name(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut in_run = false;
    for ch in raw.trim().chars() {
        let lower = ch.to_ascii_lowercase();
        if lower.is_ascii_lowercase() || lower.is_ascii_digit() || lower == '_' {
            out.push(lower);
            in_run = false;
        } else if !in_run {
            out.push('_');
            in_run = true;
        }
    }
    out
}

/// Whether a textual value is one of the null-like sentinels.
pub fn is_null_sentinel(value: &str) -> bool {
    value.trim().is_empty() || NULL_TOKENS.contains(&value)
}

/// Canonicalize names and replace null-like sentinels with `Missing`.
///
/// Names colliding after normalization get a numeric suffix so the table
/// keeps unique addressing.
pub fn normalize_table(raw: &Table) -> medallion_model::Result<Table> {
    let mut table = Table::new();
    for column in raw.columns() {
        let base = normalize_name(&column.name);
        let mut name = base.clone();
        let mut suffix = 2usize;
        while table.column(&name).is_some() {
            name = format!("{base}_{suffix}");
            suffix += 1;
        }
        if name != base {
            tracing::warn!(original = %column.name, renamed = %name, "column name collision after normalization");
        }
        let values = column
            .values
            .iter()
            .map(|v| match v {
                CellValue::Text(s) if is_null_sentinel(s) => CellValue::Missing,
                other => other.clone(),
            })
            .collect();
        table.push_column(Column::new(name, column.kind, values))?;
    }
    Ok(table)
}
