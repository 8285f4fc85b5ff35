use std::collections::BTreeMap;

use chrono::NaiveDateTime;

use crate::error::{ModelError, Result};

/// A single cell value.
///
/// All values enter the pipeline as [`CellValue::Text`]; the Silver and
/// Gold builds reparse cells to `Timestamp` and `Number` where a column's
/// inferred kind allows it. `Missing` is the explicit absent marker used
/// for null-like sentinels and failed coercions.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(tag = "kind", content = "value")]
pub enum CellValue {
    Text(String),
    Number(f64),
    Timestamp(NaiveDateTime),
    Missing,
}

impl CellValue {
    pub fn is_missing(&self) -> bool {
        matches!(self, CellValue::Missing)
    }

    /// Attempt a numeric view of the value.
    ///
    /// `Number` passes through; `Text` is parsed after trimming;
    /// timestamps and missing values have no numeric reading.
    pub fn coerce_f64(&self) -> Option<f64> {
        match self {
            CellValue::Number(v) => Some(*v),
            CellValue::Text(s) => {
                let trimmed = s.trim();
                if trimmed.is_empty() {
                    None
                } else {
                    trimmed.parse::<f64>().ok()
                }
            }
            CellValue::Timestamp(_) | CellValue::Missing => None,
        }
    }
}

/// Inferred logical kind of a column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum ColumnKind {
    Text,
    Numeric,
    Timestamp,
    /// All values missing; nothing to infer from.
    Unknown,
}

#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Column {
    pub name: String,
    pub kind: ColumnKind,
    pub values: Vec<CellValue>,
}

impl Column {
    pub fn new(name: impl Into<String>, kind: ColumnKind, values: Vec<CellValue>) -> Self {
        Self {
            name: name.into(),
            kind,
            values,
        }
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Iterator over non-missing values.
    pub fn present_values(&self) -> impl Iterator<Item = &CellValue> {
        self.values.iter().filter(|v| !v.is_missing())
    }
}

/// An ordered sequence of named columns with aligned row positions.
///
/// Column names are unique up to ASCII case; lookups are case-insensitive.
#[derive(Debug, Clone, Default, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Table {
    columns: Vec<Column>,
}

impl Table {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of rows. An empty table (no columns) has zero rows.
    pub fn height(&self) -> usize {
        self.columns.first().map_or(0, Column::len)
    }

    /// Number of columns.
    pub fn width(&self) -> usize {
        self.columns.len()
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub fn column_names(&self) -> impl Iterator<Item = &str> {
        self.columns.iter().map(|c| c.name.as_str())
    }

    /// Append a column, enforcing name uniqueness and row alignment.
    pub fn push_column(&mut self, column: Column) -> Result<()> {
        if self.column(&column.name).is_some() {
            return Err(ModelError::DuplicateColumn { name: column.name });
        }
        if !self.columns.is_empty() && column.len() != self.height() {
            let actual = column.len();
            return Err(ModelError::LengthMismatch {
                name: column.name,
                expected: self.height(),
                actual,
            });
        }
        self.columns.push(column);
        Ok(())
    }

    /// Case-insensitive column lookup.
    pub fn column(&self, name: &str) -> Option<&Column> {
        self.columns
            .iter()
            .find(|c| c.name.eq_ignore_ascii_case(name))
    }

    /// Case-insensitive column lookup, failing when absent.
    pub fn require_column(&self, name: &str) -> Result<&Column> {
        self.column(name).ok_or_else(|| ModelError::ColumnNotFound {
            name: name.to_string(),
        })
    }

    /// Mutable column lookup. Callers must preserve the row alignment.
    pub fn column_mut(&mut self, name: &str) -> Option<&mut Column> {
        self.columns
            .iter_mut()
            .find(|c| c.name.eq_ignore_ascii_case(name))
    }

    /// Ordered name-to-value view of one row.
    ///
    /// Used during hashing and hierarchy construction only; rows are not
    /// a persisted representation.
    pub fn row(&self, idx: usize) -> BTreeMap<&str, &CellValue> {
        self.columns
            .iter()
            .filter_map(|c| c.values.get(idx).map(|v| (c.name.as_str(), v)))
            .collect()
    }

    /// New table keeping only the rows where `keep` is true.
    ///
    /// `keep` is positional; it must cover every row of the table.
    pub fn filter_rows(&self, keep: &[bool]) -> Table {
        let columns = self
            .columns
            .iter()
            .map(|c| Column {
                name: c.name.clone(),
                kind: c.kind,
                values: c
                    .values
                    .iter()
                    .zip(keep.iter())
                    .filter(|&(_, &k)| k)
                    .map(|(v, _)| v.clone())
                    .collect(),
            })
            .collect();
        Table { columns }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn text(v: &str) -> CellValue {
        CellValue::Text(v.to_string())
    }

    #[test]
    fn push_column_rejects_duplicate_names() {
        let mut table = Table::new();
        table
            .push_column(Column::new("a", ColumnKind::Text, vec![text("x")]))
            .unwrap();
        let err = table
            .push_column(Column::new("A", ColumnKind::Text, vec![text("y")]))
            .unwrap_err();
        assert!(matches!(err, ModelError::DuplicateColumn { .. }));
    }

    #[test]
    fn push_column_rejects_misaligned_lengths() {
        let mut table = Table::new();
        table
            .push_column(Column::new("a", ColumnKind::Text, vec![text("x"), text("y")]))
            .unwrap();
        let err = table
            .push_column(Column::new("b", ColumnKind::Text, vec![text("z")]))
            .unwrap_err();
        assert!(matches!(
            err,
            ModelError::LengthMismatch {
                expected: 2,
                actual: 1,
                ..
            }
        ));
    }

    #[test]
    fn filter_rows_keeps_alignment() {
        let mut table = Table::new();
        table
            .push_column(Column::new(
                "a",
                ColumnKind::Text,
                vec![text("1"), text("2"), text("3")],
            ))
            .unwrap();
        table
            .push_column(Column::new(
                "b",
                ColumnKind::Text,
                vec![text("x"), text("y"), text("z")],
            ))
            .unwrap();

        let filtered = table.filter_rows(&[true, false, true]);
        assert_eq!(filtered.height(), 2);
        assert_eq!(filtered.column("b").unwrap().values[1], text("z"));
    }

    #[test]
    fn coerce_f64_parses_trimmed_text() {
        assert_eq!(text(" 4.5 ").coerce_f64(), Some(4.5));
        assert_eq!(text("abc").coerce_f64(), None);
        assert_eq!(CellValue::Number(2.0).coerce_f64(), Some(2.0));
        assert_eq!(CellValue::Missing.coerce_f64(), None);
    }

    #[test]
    fn row_view_is_sorted_by_name() {
        let mut table = Table::new();
        table
            .push_column(Column::new("b", ColumnKind::Text, vec![text("2")]))
            .unwrap();
        table
            .push_column(Column::new("a", ColumnKind::Text, vec![text("1")]))
            .unwrap();
        let row = table.row(0);
        let names: Vec<&str> = row.keys().copied().collect();
        assert_eq!(names, vec!["a", "b"]);
    }
}
