//! Silver build: normalization, timestamp reparsing, hashing, dedup.

use medallion_model::{CellValue, ColumnKind, Table};

use crate::datetime::detect_format;
use crate::hash::dedupe_by_hash;
use crate::schema::normalize_table;
use crate::warning::CoercionWarning;

/// Output of one Silver build.
#[derive(Debug)]
pub struct SilverBuild {
    pub table: Table,
    /// Values that failed timestamp reparsing and were coerced to missing.
    pub coercions: Vec<CoercionWarning>,
    /// Exact-duplicate rows removed by identity.
    pub duplicates_removed: usize,
}

/// Build the Silver table from a raw Bronze table.
///
/// Steps, in order: canonicalize column names and null sentinels; detect
/// a date/time format per textual column and reparse matches (failures
/// coerce to missing, never error); attach `hash_id`; drop exact
/// duplicates keeping first occurrence.
pub fn build_silver(bronze: &Table) -> medallion_model::Result<SilverBuild> {
    let mut table = normalize_table(bronze)?;
    let mut coercions = Vec::new();

    let names: Vec<String> = table.column_names().map(str::to_string).collect();
    for name in names {
        let Some(column) = table.column(&name) else {
            continue;
        };
        if column.kind != ColumnKind::Text {
            continue;
        }
        let samples = column.present_values().filter_map(|v| match v {
            CellValue::Text(s) => Some(s.as_str()),
            _ => None,
        });
        let Some(format) = detect_format(samples) else {
            continue;
        };
        tracing::debug!(column = %name, format = format.format, "date format detected");

        let Some(column) = table.column_mut(&name) else {
            continue;
        };
        for (row, value) in column.values.iter_mut().enumerate() {
            let CellValue::Text(raw) = value else {
                continue;
            };
            match format.parse(raw) {
                Some(dt) => *value = CellValue::Timestamp(dt),
                None => {
                    coercions.push(CoercionWarning {
                        column: name.clone(),
                        row,
                        value: raw.clone(),
                        target: ColumnKind::Timestamp,
                    });
                    *value = CellValue::Missing;
                }
            }
        }
        column.kind = ColumnKind::Timestamp;
    }

    let outcome = dedupe_by_hash(&table)?;
    tracing::info!(
        rows = outcome.table.height(),
        duplicates_removed = outcome.removed,
        coercions = coercions.len(),
        "silver table built"
    );
    Ok(SilverBuild {
        table: outcome.table,
        coercions,
        duplicates_removed: outcome.removed,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use medallion_model::{Column, HASH_COLUMN};

    fn text(v: &str) -> CellValue {
        CellValue::Text(v.to_string())
    }

    fn bronze() -> Table {
        let mut table = Table::new();
        table
            .push_column(Column::new(
                "Data Emissão",
                ColumnKind::Text,
                vec![
                    text("2024-01-01"),
                    text("2024-01-02"),
                    text("2024-01-03"),
                    text("2024-01-04"),
                    text("2024-01-05"),
                    text("not a date"),
                    text("2024-01-05"),
                ],
            ))
            .unwrap();
        table
            .push_column(Column::new(
                "Valor",
                ColumnKind::Text,
                vec![
                    text("10"),
                    text("20"),
                    text("NULL"),
                    text("40"),
                    text("50"),
                    text("60"),
                    text("50"),
                ],
            ))
            .unwrap();
        table
    }

    #[test]
    fn silver_normalizes_reparses_and_dedupes() {
        let build = build_silver(&bronze()).unwrap();
        let names: Vec<&str> = build.table.column_names().collect();
        assert_eq!(names, vec!["data_emiss_o", "valor", HASH_COLUMN]);

        // One timestamp coercion failure, coerced to missing.
        assert_eq!(build.coercions.len(), 1);
        assert_eq!(build.coercions[0].value, "not a date");
        let dates = build.table.column("data_emiss_o").unwrap();
        assert_eq!(dates.kind, ColumnKind::Timestamp);
        assert!(dates.values[5].is_missing());

        // The last row duplicates row 4 exactly (after normalization).
        assert_eq!(build.duplicates_removed, 1);
        assert_eq!(build.table.height(), 6);

        // Null sentinel became missing.
        assert!(build.table.column("valor").unwrap().values[2].is_missing());
    }

    #[test]
    fn silver_is_idempotent_over_its_own_output() {
        let once = build_silver(&bronze()).unwrap();
        let twice = build_silver(&once.table).unwrap();
        assert_eq!(twice.duplicates_removed, 0);
        assert_eq!(once.table, twice.table);
    }
}
