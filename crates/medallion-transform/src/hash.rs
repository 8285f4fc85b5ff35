//! Stable per-row content identity and exact-duplicate removal.
//!
//! Each row is serialized into a canonical JSON object: one encoder per
//! value kind, composed over columns sorted lexicographically by name, so
//! the hash is independent of physical column order and in-memory
//! representation. The serialization is digested with SHA-256 and
//! hex-encoded into the `hash_id` column.

use std::collections::BTreeSet;

use sha2::{Digest, Sha256};

use medallion_model::{CellValue, Column, ColumnKind, HASH_COLUMN, Table};

/// Canonical serialization of one row view.
///
/// Keys arrive sorted (the row view is a `BTreeMap`); values encode as
/// JSON: text as a string, numbers as a JSON number (non-finite values as
/// null), timestamps as an ISO-8601 string, missing as null.
pub fn canonical_row(row: &std::collections::BTreeMap<&str, &CellValue>) -> String {
    let mut object = serde_json::Map::with_capacity(row.len());
    for (name, value) in row {
        object.insert((*name).to_string(), encode_value(value));
    }
    serde_json::Value::Object(object).to_string()
}

fn encode_value(value: &CellValue) -> serde_json::Value {
    match value {
        CellValue::Text(s) => serde_json::Value::String(s.clone()),
        CellValue::Number(v) => serde_json::Number::from_f64(*v)
            .map_or(serde_json::Value::Null, serde_json::Value::Number),
        CellValue::Timestamp(dt) => {
            serde_json::Value::String(dt.format("%Y-%m-%dT%H:%M:%S").to_string())
        }
        CellValue::Missing => serde_json::Value::Null,
    }
}

fn hash_canonical(canonical: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(canonical.as_bytes());
    hex::encode(hasher.finalize())
}

/// Content hash per row. An existing `hash_id` column never participates
/// in its own hash, so rehashing an already-hashed table is stable.
pub fn hash_rows(table: &Table) -> Vec<String> {
    (0..table.height())
        .map(|idx| {
            let mut row = table.row(idx);
            row.remove(HASH_COLUMN);
            hash_canonical(&canonical_row(&row))
        })
        .collect()
}

#[derive(Debug)]
pub struct DedupOutcome {
    pub table: Table,
    /// Rows dropped as exact duplicates.
    pub removed: usize,
}

/// Attach `hash_id` and keep only the first occurrence per identity, in
/// original row order. Idempotent: a second pass removes nothing.
pub fn dedupe_by_hash(table: &Table) -> medallion_model::Result<DedupOutcome> {
    let hashes = hash_rows(table);
    let mut seen = BTreeSet::new();
    let keep: Vec<bool> = hashes.iter().map(|h| seen.insert(h.clone())).collect();
    let removed = keep.iter().filter(|&&k| !k).count();

    let filtered = table.filter_rows(&keep);
    let kept_hashes: Vec<CellValue> = hashes
        .into_iter()
        .zip(&keep)
        .filter(|&(_, &k)| k)
        .map(|(h, _)| CellValue::Text(h))
        .collect();

    let mut deduped = Table::new();
    for column in filtered.columns() {
        if column.name.eq_ignore_ascii_case(HASH_COLUMN) {
            continue;
        }
        deduped.push_column(column.clone())?;
    }
    deduped.push_column(Column::new(HASH_COLUMN, ColumnKind::Text, kept_hashes))?;

    if removed > 0 {
        tracing::info!(removed, kept = deduped.height(), "duplicate rows removed");
    }
    Ok(DedupOutcome {
        table: deduped,
        removed,
    })
}
