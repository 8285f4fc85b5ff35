//! Rolling mean over a numeric reading of one column.

use medallion_model::Table;

use crate::error::{QueryError, Result};

/// Rolling mean with window `window` and min-periods-1 semantics:
/// element `i` averages the numeric readings among positions
/// `max(0, i+1-window)..=i`; windows with no numeric reading yield
/// `None`.
pub fn rolling_mean(table: &Table, column: &str, window: usize) -> Result<Vec<Option<f64>>> {
    if window == 0 {
        return Err(QueryError::InvalidWindow);
    }
    let column_ref = table
        .column(column)
        .ok_or_else(|| QueryError::UnknownColumn {
            name: column.to_string(),
        })?;
    let readings: Vec<Option<f64>> = column_ref.values.iter().map(|v| v.coerce_f64()).collect();
    if readings.iter().all(Option::is_none) && !readings.is_empty() {
        return Err(QueryError::NonNumericColumn {
            name: column.to_string(),
        });
    }

    let means = readings
        .iter()
        .enumerate()
        .map(|(i, _)| {
            let start = (i + 1).saturating_sub(window);
            let in_window: Vec<f64> = readings[start..=i].iter().flatten().copied().collect();
            if in_window.is_empty() {
                None
            } else {
                Some(in_window.iter().sum::<f64>() / in_window.len() as f64)
            }
        })
        .collect();
    Ok(means)
}

#[cfg(test)]
mod tests {
    use super::*;
    use medallion_model::{CellValue, Column, ColumnKind};

    fn number_table(values: Vec<CellValue>) -> Table {
        let mut table = Table::new();
        table
            .push_column(Column::new("v", ColumnKind::Numeric, values))
            .unwrap();
        table
    }

    #[test]
    fn window_grows_until_full() {
        let table = number_table(vec![
            CellValue::Number(1.0),
            CellValue::Number(3.0),
            CellValue::Number(5.0),
            CellValue::Number(7.0),
        ]);
        let means = rolling_mean(&table, "v", 2).unwrap();
        assert_eq!(means, vec![Some(1.0), Some(2.0), Some(4.0), Some(6.0)]);
    }

    #[test]
    fn missing_values_are_excluded_from_the_window() {
        let table = number_table(vec![
            CellValue::Number(2.0),
            CellValue::Missing,
            CellValue::Number(4.0),
        ]);
        let means = rolling_mean(&table, "v", 2).unwrap();
        // Window [2, missing] averages only 2; [missing, 4] only 4.
        assert_eq!(means, vec![Some(2.0), Some(2.0), Some(4.0)]);
    }

    #[test]
    fn zero_window_is_rejected() {
        let table = number_table(vec![CellValue::Number(1.0)]);
        assert_eq!(
            rolling_mean(&table, "v", 0).unwrap_err(),
            QueryError::InvalidWindow
        );
    }

    #[test]
    fn textual_column_aborts_the_query() {
        let mut table = Table::new();
        table
            .push_column(Column::new(
                "v",
                ColumnKind::Text,
                vec![
                    CellValue::Text("a".to_string()),
                    CellValue::Text("b".to_string()),
                ],
            ))
            .unwrap();
        assert!(matches!(
            rolling_mean(&table, "v", 3).unwrap_err(),
            QueryError::NonNumericColumn { .. }
        ));
    }
}
