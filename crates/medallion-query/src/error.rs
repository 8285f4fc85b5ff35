use thiserror::Error;

/// Errors scoped to a single query; the caller may retry with different
/// parameters.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum QueryError {
    /// Selected column does not exist.
    #[error("column '{name}' not found")]
    UnknownColumn { name: String },

    /// A temporal rollup needs a timestamp base column.
    #[error("column '{name}' is not a timestamp column")]
    NotTimestamp { name: String },

    /// No column coercible to numeric is available as a measure.
    #[error("no numeric measure column available")]
    NoNumericMeasure,

    /// Selected column has no numeric reading.
    #[error("column '{name}' is not numeric")]
    NonNumericColumn { name: String },

    /// Rolling window must cover at least one row.
    #[error("window size must be at least 1")]
    InvalidWindow,
}

pub type Result<T> = std::result::Result<T, QueryError>;
