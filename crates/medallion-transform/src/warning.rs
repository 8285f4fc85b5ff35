use medallion_model::ColumnKind;
use thiserror::Error;

/// A single non-fatal coercion failure.
///
/// The offending value is kept verbatim so the caller can inspect what
/// was coerced to missing (or left textual) and why.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("column '{column}' row {row}: value '{value}' does not parse as {target:?}")]
pub struct CoercionWarning {
    pub column: String,
    pub row: usize,
    pub value: String,
    pub target: ColumnKind,
}
