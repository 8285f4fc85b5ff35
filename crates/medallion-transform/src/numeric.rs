//! Explicit per-column numeric inference.
//!
//! Replaces the upstream habit of "attempt a cast, fall back silently":
//! the result is a typed column kind plus an inspectable list of the
//! values that blocked conversion.

use medallion_model::{CellValue, Column, ColumnKind};

use crate::warning::CoercionWarning;

/// Result of inferring one column.
#[derive(Debug)]
pub struct NumericInference {
    pub kind: ColumnKind,
    /// Converted values when the column became numeric; `None` when the
    /// column keeps its original values.
    pub values: Option<Vec<CellValue>>,
    /// Values that blocked conversion of a predominantly numeric column.
    pub failures: Vec<CoercionWarning>,
}

/// Infer a numeric kind for a textual column.
///
/// The column converts only when every non-missing value parses as a
/// number. A column where at least half the non-missing values parse is
/// considered predominantly numeric; its unparseable values are reported
/// as coercion failures while the column stays textual. Genuinely
/// textual columns produce no noise.
pub fn infer_numeric(column: &Column) -> NumericInference {
    if column.kind != ColumnKind::Text {
        return NumericInference {
            kind: column.kind,
            values: None,
            failures: Vec::new(),
        };
    }

    let mut present = 0usize;
    let mut parsed = 0usize;
    let mut failures = Vec::new();
    for (row, value) in column.values.iter().enumerate() {
        if value.is_missing() {
            continue;
        }
        present += 1;
        if value.coerce_f64().is_some() {
            parsed += 1;
        } else if let CellValue::Text(s) = value {
            failures.push(CoercionWarning {
                column: column.name.clone(),
                row,
                value: s.clone(),
                target: ColumnKind::Numeric,
            });
        }
    }

    if present == 0 {
        return NumericInference {
            kind: ColumnKind::Unknown,
            values: None,
            failures: Vec::new(),
        };
    }
    if parsed == present {
        let values = column
            .values
            .iter()
            .map(|v| match v.coerce_f64() {
                Some(n) => CellValue::Number(n),
                None => CellValue::Missing,
            })
            .collect();
        return NumericInference {
            kind: ColumnKind::Numeric,
            values: Some(values),
            failures: Vec::new(),
        };
    }
    // Mixed column: keep text, surface failures only when numbers dominate.
    if parsed * 2 < present {
        failures.clear();
    }
    NumericInference {
        kind: ColumnKind::Text,
        values: None,
        failures,
    }
}
