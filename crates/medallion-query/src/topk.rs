//! Top-K over a numeric reading of one column.

use std::cmp::Ordering;

use medallion_model::Table;

use crate::error::{QueryError, Result};

/// One ranked value with its source row position.
#[derive(Debug, Clone, PartialEq)]
pub struct RankedValue {
    pub row: usize,
    pub value: f64,
}

/// The K largest values of a column, descending.
///
/// Values are coerced per row; rows without a numeric reading are
/// skipped. A column with no numeric reading at all aborts the query.
pub fn top_k(table: &Table, column: &str, k: usize) -> Result<Vec<RankedValue>> {
    let column_ref = table
        .column(column)
        .ok_or_else(|| QueryError::UnknownColumn {
            name: column.to_string(),
        })?;
    let mut ranked: Vec<RankedValue> = column_ref
        .values
        .iter()
        .enumerate()
        .filter_map(|(row, v)| v.coerce_f64().map(|value| RankedValue { row, value }))
        .collect();
    if ranked.is_empty() {
        return Err(QueryError::NonNumericColumn {
            name: column.to_string(),
        });
    }
    // Stable sort keeps earlier rows first among equal values.
    ranked.sort_by(|a, b| b.value.partial_cmp(&a.value).unwrap_or(Ordering::Equal));
    ranked.truncate(k);
    Ok(ranked)
}

#[cfg(test)]
mod tests {
    use super::*;
    use medallion_model::{CellValue, Column, ColumnKind};

    fn text(v: &str) -> CellValue {
        CellValue::Text(v.to_string())
    }

    fn table_with(values: Vec<CellValue>) -> Table {
        let mut table = Table::new();
        table
            .push_column(Column::new("v", ColumnKind::Text, values))
            .unwrap();
        table
    }

    #[test]
    fn returns_largest_values_descending() {
        let table = table_with(vec![text("3"), text("10"), text("7"), text("1")]);
        let top = top_k(&table, "v", 2).unwrap();
        assert_eq!(
            top,
            vec![
                RankedValue {
                    row: 1,
                    value: 10.0
                },
                RankedValue { row: 2, value: 7.0 },
            ]
        );
    }

    #[test]
    fn skips_values_without_numeric_reading() {
        let table = table_with(vec![text("5"), text("oops"), CellValue::Missing, text("2")]);
        let top = top_k(&table, "v", 10).unwrap();
        assert_eq!(top.len(), 2);
        assert_eq!(top[0].value, 5.0);
    }

    #[test]
    fn fully_textual_column_aborts_the_query() {
        let table = table_with(vec![text("a"), text("b")]);
        assert_eq!(
            top_k(&table, "v", 3).unwrap_err(),
            QueryError::NonNumericColumn {
                name: "v".to_string()
            }
        );
    }

    #[test]
    fn unknown_column_is_reported() {
        let table = table_with(vec![text("1")]);
        assert!(matches!(
            top_k(&table, "missing", 1).unwrap_err(),
            QueryError::UnknownColumn { .. }
        ));
    }
}
