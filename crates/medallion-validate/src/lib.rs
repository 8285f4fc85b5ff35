#![deny(unsafe_code)]

//! Advisory quality checks over the Gold-candidate table.
//!
//! Three rules: missing values anywhere, duplicate row identities
//! (pointing at an upstream dedup defect), and negative values in numeric
//! columns (out-of-domain warning). Findings are informational and never
//! block Gold creation.

use std::collections::BTreeSet;

use medallion_model::{CellValue, ColumnKind, HASH_COLUMN, Table};

/// Finding severity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
pub enum Severity {
    Warning,
    Info,
}

/// What a finding is about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
pub enum FindingKind {
    /// Missing values present somewhere in the table.
    MissingValues,
    /// Duplicate `hash_id` values; Gold should inherit Silver's uniqueness.
    DuplicateIdentity,
    /// Negative values in a numeric column.
    NegativeValues,
}

/// A single non-blocking quality observation.
#[derive(Debug, Clone, serde::Serialize)]
pub struct Finding {
    pub severity: Severity,
    pub kind: FindingKind,
    pub column: Option<String>,
    pub count: usize,
    pub message: String,
}

/// All findings for one table.
#[derive(Debug, Clone, Default, serde::Serialize)]
pub struct QualityReport {
    pub findings: Vec<Finding>,
}

impl QualityReport {
    pub fn is_clean(&self) -> bool {
        self.findings.is_empty()
    }

    pub fn warning_count(&self) -> usize {
        self.findings
            .iter()
            .filter(|f| f.severity == Severity::Warning)
            .count()
    }
}

/// Run all quality rules over a table.
pub fn check_table(table: &Table) -> QualityReport {
    let mut report = QualityReport::default();
    check_missing(table, &mut report);
    check_duplicate_identity(table, &mut report);
    check_negative(table, &mut report);
    for finding in &report.findings {
        tracing::warn!(kind = ?finding.kind, count = finding.count, "{}", finding.message);
    }
    report
}

fn check_missing(table: &Table, report: &mut QualityReport) {
    let missing: usize = table
        .columns()
        .iter()
        .map(|c| c.values.iter().filter(|v| v.is_missing()).count())
        .sum();
    if missing > 0 {
        report.findings.push(Finding {
            severity: Severity::Info,
            kind: FindingKind::MissingValues,
            column: None,
            count: missing,
            message: format!("{missing} missing values present"),
        });
    }
}

fn check_duplicate_identity(table: &Table, report: &mut QualityReport) {
    let Some(hashes) = table.column(HASH_COLUMN) else {
        return;
    };
    let mut seen = BTreeSet::new();
    let duplicates = hashes
        .values
        .iter()
        .filter(|v| match v {
            CellValue::Text(h) => !seen.insert(h.as_str()),
            _ => false,
        })
        .count();
    if duplicates > 0 {
        report.findings.push(Finding {
            severity: Severity::Warning,
            kind: FindingKind::DuplicateIdentity,
            column: Some(HASH_COLUMN.to_string()),
            count: duplicates,
            message: format!("{duplicates} duplicate row identities (upstream dedup defect?)"),
        });
    }
}

fn check_negative(table: &Table, report: &mut QualityReport) {
    for column in table.columns() {
        if column.kind != ColumnKind::Numeric {
            continue;
        }
        let negatives = column
            .values
            .iter()
            .filter(|v| matches!(v, CellValue::Number(n) if *n < 0.0))
            .count();
        if negatives > 0 {
            report.findings.push(Finding {
                severity: Severity::Warning,
                kind: FindingKind::NegativeValues,
                column: Some(column.name.clone()),
                count: negatives,
                message: format!(
                    "column '{}': {negatives} values out of domain (negative)",
                    column.name
                ),
            });
        }
    }
}
