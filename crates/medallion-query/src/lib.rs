#![deny(unsafe_code)]

//! Ad-hoc aggregate queries over the Gold table.
//!
//! All query errors are recoverable and scoped to one query; the caller
//! may retry with different parameters.

mod error;
mod rolling;
mod rollup;
mod topk;

pub use error::{QueryError, Result};
pub use rolling::rolling_mean;
pub use rollup::{
    MISSING_LEVEL, ROLLUP_TOTAL, RollupMode, RollupResult, RollupRow, RollupSpec,
    numeric_measures, rollup, temporal_hierarchy,
};
pub use topk::{RankedValue, top_k};
