use thiserror::Error;

/// Errors raised by table construction and access.
#[derive(Debug, Error)]
pub enum ModelError {
    /// Column name already present after case normalization.
    #[error("duplicate column name: {name}")]
    DuplicateColumn { name: String },

    /// Column not found in the table.
    #[error("column '{name}' not found")]
    ColumnNotFound { name: String },

    /// Column length does not match the table's row count.
    #[error("column '{name}' has {actual} values, table has {expected} rows")]
    LengthMismatch {
        name: String,
        expected: usize,
        actual: usize,
    },
}

pub type Result<T> = std::result::Result<T, ModelError>;
