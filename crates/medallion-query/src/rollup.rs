//! Hierarchical rollup aggregation.
//!
//! SUM(measure) is computed for every prefix of the grouping hierarchy,
//! from full detail down to the empty grouping (grand total). Omitted
//! hierarchy levels in subtotal rows carry the explicit [`ROLLUP_TOTAL`]
//! marker; missing group keys carry [`MISSING_LEVEL`] so "no data" stays
//! distinguishable from "aggregated across this level".

use std::cmp::Ordering;
use std::collections::BTreeMap;

use medallion_model::{CellValue, Column, ColumnKind, HASH_COLUMN, Table};

use crate::error::{QueryError, Result};

/// Marker filling omitted hierarchy levels of subtotal rows.
pub const ROLLUP_TOTAL: &str = "ALL";

/// Label for group keys whose source value is missing.
pub const MISSING_LEVEL: &str = "(missing)";

/// Rollup flavor; decides hierarchy derivation and tie-break ordering.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RollupMode {
    /// Month → week → day hierarchy derived from a timestamp column.
    Temporal,
    /// Single categorical grouping column.
    Categorical,
}

/// Grouping hierarchy (coarsest first) plus one measure column.
#[derive(Debug, Clone)]
pub struct RollupSpec {
    pub mode: RollupMode,
    pub hierarchy: Vec<String>,
    pub measure: String,
}

/// One result row: hierarchy level values (subtotals padded with
/// [`ROLLUP_TOTAL`]) and the aggregate.
#[derive(Debug, Clone, PartialEq)]
pub struct RollupRow {
    pub levels: Vec<String>,
    pub total: f64,
}

#[derive(Debug, Clone)]
pub struct RollupResult {
    pub hierarchy: Vec<String>,
    pub measure: String,
    pub rows: Vec<RollupRow>,
}

/// Derive `day`, `week` and `month` grouping columns from a timestamp
/// column and return the augmented working table plus the hierarchy
/// order (coarsest first).
pub fn temporal_hierarchy(table: &Table, timestamp_column: &str) -> Result<(Table, Vec<String>)> {
    let base = table
        .column(timestamp_column)
        .ok_or_else(|| QueryError::UnknownColumn {
            name: timestamp_column.to_string(),
        })?;
    if base.kind != ColumnKind::Timestamp {
        return Err(QueryError::NotTimestamp {
            name: timestamp_column.to_string(),
        });
    }

    let mut work = table.clone();
    // Coarsest first: the appended order is the hierarchy order.
    let mut hierarchy = Vec::with_capacity(3);
    for (label, format) in [("month", "%Y-%m"), ("week", "%Y-W%W"), ("day", "%Y-%m-%d")] {
        let name = unique_name(&work, label);
        let values = base
            .values
            .iter()
            .map(|v| match v {
                CellValue::Timestamp(dt) => CellValue::Text(dt.format(format).to_string()),
                _ => CellValue::Missing,
            })
            .collect();
        // Name was made unique and the length copied from an existing
        // column, so the push cannot be rejected.
        if work
            .push_column(Column::new(name.clone(), ColumnKind::Text, values))
            .is_ok()
        {
            hierarchy.push(name);
        }
    }
    Ok((work, hierarchy))
}

fn unique_name(table: &Table, base: &str) -> String {
    let mut name = base.to_string();
    let mut suffix = 2usize;
    while table.column(&name).is_some() {
        name = format!("{base}_{suffix}");
        suffix += 1;
    }
    name
}

/// Columns eligible as a rollup measure: everything outside the
/// hierarchy and the row identity with at least one numeric reading.
pub fn numeric_measures(table: &Table, hierarchy: &[String]) -> Vec<String> {
    table
        .columns()
        .iter()
        .filter(|c| {
            !c.name.eq_ignore_ascii_case(HASH_COLUMN)
                && !hierarchy.iter().any(|h| h.eq_ignore_ascii_case(&c.name))
        })
        .filter(|c| {
            c.kind == ColumnKind::Numeric || c.values.iter().any(|v| v.coerce_f64().is_some())
        })
        .map(|c| c.name.clone())
        .collect()
}

/// Execute a rollup over the working table.
pub fn rollup(table: &Table, spec: &RollupSpec) -> Result<RollupResult> {
    let mut level_values: Vec<Vec<String>> = Vec::with_capacity(spec.hierarchy.len());
    for name in &spec.hierarchy {
        let column = table
            .column(name)
            .ok_or_else(|| QueryError::UnknownColumn { name: name.clone() })?;
        level_values.push(column.values.iter().map(level_label).collect());
    }
    let measure_column =
        table
            .column(&spec.measure)
            .ok_or_else(|| QueryError::UnknownColumn {
                name: spec.measure.clone(),
            })?;
    let eligible = numeric_measures(table, &spec.hierarchy);
    if eligible.is_empty() {
        return Err(QueryError::NoNumericMeasure);
    }
    if !eligible
        .iter()
        .any(|name| name.eq_ignore_ascii_case(&spec.measure))
    {
        return Err(QueryError::NonNumericColumn {
            name: spec.measure.clone(),
        });
    }

    let depth = spec.hierarchy.len();
    let height = table.height();

    // SUM per group key for every hierarchy prefix; missing measure
    // values are skipped the way SQL SUM skips NULL.
    let mut groups: BTreeMap<Vec<String>, f64> = BTreeMap::new();
    for row in 0..height {
        let value = measure_column.values[row].coerce_f64();
        for prefix in 0..=depth {
            let key: Vec<String> = (0..depth)
                .map(|level| {
                    if level < prefix {
                        level_values[level][row].clone()
                    } else {
                        ROLLUP_TOTAL.to_string()
                    }
                })
                .collect();
            let entry = groups.entry(key).or_insert(0.0);
            if let Some(v) = value {
                *entry += v;
            }
        }
    }

    let mut rows: Vec<RollupRow> = groups
        .into_iter()
        .map(|(levels, total)| RollupRow { levels, total })
        .collect();
    sort_rows(&mut rows, spec.mode);

    tracing::debug!(
        groups = rows.len(),
        measure = %spec.measure,
        "rollup computed"
    );
    Ok(RollupResult {
        hierarchy: spec.hierarchy.clone(),
        measure: spec.measure.clone(),
        rows,
    })
}

/// Order by aggregate descending. Ties: temporal mode compares hierarchy
/// level values descending, coarsest first; categorical mode falls back
/// to ascending lexicographic keys so results stay deterministic.
fn sort_rows(rows: &mut [RollupRow], mode: RollupMode) {
    rows.sort_by(|a, b| {
        let by_total = b
            .total
            .partial_cmp(&a.total)
            .unwrap_or(Ordering::Equal);
        by_total.then_with(|| match mode {
            RollupMode::Temporal => b.levels.cmp(&a.levels),
            RollupMode::Categorical => a.levels.cmp(&b.levels),
        })
    });
}

fn level_label(value: &CellValue) -> String {
    match value {
        CellValue::Text(s) => s.clone(),
        CellValue::Number(n) => n.to_string(),
        CellValue::Timestamp(dt) => dt.format("%Y-%m-%dT%H:%M:%S").to_string(),
        CellValue::Missing => MISSING_LEVEL.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn text(v: &str) -> CellValue {
        CellValue::Text(v.to_string())
    }

    fn categorical_table() -> Table {
        let mut table = Table::new();
        table
            .push_column(Column::new(
                "cat",
                ColumnKind::Text,
                vec![text("A"), text("A"), text("B")],
            ))
            .unwrap();
        table
            .push_column(Column::new(
                "v",
                ColumnKind::Numeric,
                vec![
                    CellValue::Number(10.0),
                    CellValue::Number(5.0),
                    CellValue::Number(3.0),
                ],
            ))
            .unwrap();
        table
    }

    #[test]
    fn categorical_rollup_produces_exact_subtotals() {
        let spec = RollupSpec {
            mode: RollupMode::Categorical,
            hierarchy: vec!["cat".to_string()],
            measure: "v".to_string(),
        };
        let result = rollup(&categorical_table(), &spec).unwrap();
        let rows: Vec<(Vec<&str>, f64)> = result
            .rows
            .iter()
            .map(|r| (r.levels.iter().map(String::as_str).collect(), r.total))
            .collect();
        assert_eq!(
            rows,
            vec![
                (vec![ROLLUP_TOTAL], 18.0),
                (vec!["A"], 15.0),
                (vec!["B"], 3.0),
            ]
        );
    }

    #[test]
    fn missing_measure_values_are_skipped() {
        let mut table = categorical_table();
        table.column_mut("v").unwrap().values[1] = CellValue::Missing;
        let spec = RollupSpec {
            mode: RollupMode::Categorical,
            hierarchy: vec!["cat".to_string()],
            measure: "v".to_string(),
        };
        let result = rollup(&table, &spec).unwrap();
        let grand = result
            .rows
            .iter()
            .find(|r| r.levels == vec![ROLLUP_TOTAL.to_string()])
            .unwrap();
        assert_eq!(grand.total, 13.0);
    }

    #[test]
    fn no_numeric_measure_is_a_query_error() {
        let mut table = Table::new();
        table
            .push_column(Column::new(
                "cat",
                ColumnKind::Text,
                vec![text("A"), text("B")],
            ))
            .unwrap();
        table
            .push_column(Column::new(
                "note",
                ColumnKind::Text,
                vec![text("x"), text("y")],
            ))
            .unwrap();
        let spec = RollupSpec {
            mode: RollupMode::Categorical,
            hierarchy: vec!["cat".to_string()],
            measure: "note".to_string(),
        };
        assert_eq!(
            rollup(&table, &spec).unwrap_err(),
            QueryError::NoNumericMeasure
        );
    }

    #[test]
    fn textual_numbers_are_eligible_measures() {
        let mut table = Table::new();
        table
            .push_column(Column::new(
                "cat",
                ColumnKind::Text,
                vec![text("A"), text("B")],
            ))
            .unwrap();
        table
            .push_column(Column::new(
                "v",
                ColumnKind::Text,
                vec![text("2"), text("4")],
            ))
            .unwrap();
        let measures = numeric_measures(&table, &["cat".to_string()]);
        assert_eq!(measures, vec!["v".to_string()]);
    }

    #[test]
    fn temporal_hierarchy_derives_three_levels() {
        let ts = |d: u32| {
            CellValue::Timestamp(
                chrono::NaiveDate::from_ymd_opt(2024, 2, d)
                    .unwrap()
                    .and_hms_opt(9, 0, 0)
                    .unwrap(),
            )
        };
        let mut table = Table::new();
        table
            .push_column(Column::new(
                "issued",
                ColumnKind::Timestamp,
                vec![ts(5), ts(6), CellValue::Missing],
            ))
            .unwrap();
        table
            .push_column(Column::new(
                "v",
                ColumnKind::Numeric,
                vec![
                    CellValue::Number(1.0),
                    CellValue::Number(2.0),
                    CellValue::Number(4.0),
                ],
            ))
            .unwrap();

        let (work, hierarchy) = temporal_hierarchy(&table, "issued").unwrap();
        assert_eq!(
            hierarchy,
            vec!["month".to_string(), "week".to_string(), "day".to_string()]
        );
        let day = work.column("day").unwrap();
        assert_eq!(day.values[0], text("2024-02-05"));
        assert!(day.values[2].is_missing());
        assert_eq!(work.column("month").unwrap().values[1], text("2024-02"));
        assert_eq!(work.column("week").unwrap().values[0], text("2024-W06"));

        let spec = RollupSpec {
            mode: RollupMode::Temporal,
            hierarchy,
            measure: "v".to_string(),
        };
        let result = rollup(&work, &spec).unwrap();
        // Grand total first (ALL,ALL,ALL) with 7.0.
        assert_eq!(result.rows[0].total, 7.0);
        assert_eq!(result.rows[0].levels, vec![ROLLUP_TOTAL; 3]);
        // The missing timestamp groups under the missing label, not ALL.
        assert!(result.rows.iter().any(|r| {
            r.levels == vec![MISSING_LEVEL, MISSING_LEVEL, MISSING_LEVEL] && r.total == 4.0
        }));
    }

    #[test]
    fn temporal_ties_order_descending_by_levels() {
        let mut table = Table::new();
        table
            .push_column(Column::new(
                "month",
                ColumnKind::Text,
                vec![text("2024-01"), text("2024-02")],
            ))
            .unwrap();
        table
            .push_column(Column::new(
                "v",
                ColumnKind::Numeric,
                vec![CellValue::Number(5.0), CellValue::Number(5.0)],
            ))
            .unwrap();
        let spec = RollupSpec {
            mode: RollupMode::Temporal,
            hierarchy: vec!["month".to_string()],
            measure: "v".to_string(),
        };
        let result = rollup(&table, &spec).unwrap();
        let detail: Vec<&RollupRow> = result
            .rows
            .iter()
            .filter(|r| r.levels[0] != ROLLUP_TOTAL)
            .collect();
        assert_eq!(detail[0].levels[0], "2024-02");
        assert_eq!(detail[1].levels[0], "2024-01");
    }

    #[test]
    fn temporal_rollup_requires_timestamp_base() {
        let table = categorical_table();
        let err = temporal_hierarchy(&table, "cat").unwrap_err();
        assert_eq!(
            err,
            QueryError::NotTimestamp {
                name: "cat".to_string()
            }
        );
    }
}
