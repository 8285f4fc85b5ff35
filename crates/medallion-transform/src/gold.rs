//! Gold build: explicit numeric typing over the Silver table.
//!
//! Gold carries the same rows as Silver; what changes is the column
//! typing. Quality findings are computed separately by the validate crate
//! and never block this build.

use medallion_model::{Column, ColumnKind, HASH_COLUMN, Table};

use crate::numeric::infer_numeric;
use crate::warning::CoercionWarning;

/// Output of one Gold build.
#[derive(Debug)]
pub struct GoldBuild {
    pub table: Table,
    /// Values that blocked numeric conversion of mixed columns.
    pub coercions: Vec<CoercionWarning>,
}

/// Build the Gold table from Silver by running numeric inference on every
/// textual column except the row identity.
pub fn build_gold(silver: &Table) -> medallion_model::Result<GoldBuild> {
    let mut table = Table::new();
    let mut coercions = Vec::new();
    for column in silver.columns() {
        if column.name.eq_ignore_ascii_case(HASH_COLUMN) {
            table.push_column(column.clone())?;
            continue;
        }
        let inference = infer_numeric(column);
        coercions.extend(inference.failures);
        let values = inference.values.unwrap_or_else(|| column.values.clone());
        table.push_column(Column::new(column.name.clone(), inference.kind, values))?;
    }
    tracing::info!(
        rows = table.height(),
        numeric_columns = table
            .columns()
            .iter()
            .filter(|c| c.kind == ColumnKind::Numeric)
            .count(),
        "gold table built"
    );
    Ok(GoldBuild { table, coercions })
}

#[cfg(test)]
mod tests {
    use super::*;
    use medallion_model::CellValue;

    fn text(v: &str) -> CellValue {
        CellValue::Text(v.to_string())
    }

    #[test]
    fn gold_types_numeric_columns_and_keeps_hash() {
        let mut silver = Table::new();
        silver
            .push_column(Column::new(
                "amount",
                ColumnKind::Text,
                vec![text("1"), text("-2.5")],
            ))
            .unwrap();
        silver
            .push_column(Column::new(
                "label",
                ColumnKind::Text,
                vec![text("a"), text("b")],
            ))
            .unwrap();
        silver
            .push_column(Column::new(
                HASH_COLUMN,
                ColumnKind::Text,
                vec![text("h1"), text("h2")],
            ))
            .unwrap();

        let build = build_gold(&silver).unwrap();
        let amount = build.table.column("amount").unwrap();
        assert_eq!(amount.kind, ColumnKind::Numeric);
        assert_eq!(amount.values[1], CellValue::Number(-2.5));
        assert_eq!(build.table.column("label").unwrap().kind, ColumnKind::Text);
        // hash_id is identity, not data: exempt from inference even
        // though hex digits could parse oddly.
        assert_eq!(
            build.table.column(HASH_COLUMN).unwrap().kind,
            ColumnKind::Text
        );
        assert!(build.coercions.is_empty());
    }

    #[test]
    fn gold_row_count_matches_silver() {
        let mut silver = Table::new();
        silver
            .push_column(Column::new(
                "v",
                ColumnKind::Text,
                vec![text("1"), text("x"), text("3")],
            ))
            .unwrap();
        let build = build_gold(&silver).unwrap();
        assert_eq!(build.table.height(), 3);
        // Mixed column stays textual; the blocker is reported.
        assert_eq!(build.coercions.len(), 1);
        assert_eq!(build.coercions[0].value, "x");
    }
}
