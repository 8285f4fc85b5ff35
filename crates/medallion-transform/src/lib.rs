#![deny(unsafe_code)]

//! Silver and Gold transformations.
//!
//! Silver normalizes the raw Bronze table: canonical column names,
//! explicit missing markers, timestamp reparsing, a content hash per row
//! and exact-duplicate removal. Gold runs an explicit numeric inference
//! pass over the Silver table so downstream queries see typed columns.
//! Every coercion failure is collected as a [`CoercionWarning`] rather
//! than silently swallowed.

mod datetime;
mod gold;
mod hash;
mod numeric;
mod schema;
mod silver;
mod warning;

pub use datetime::{DETECT_SAMPLE, DETECT_THRESHOLD, DateFormat, detect_format};
pub use gold::{GoldBuild, build_gold};
pub use hash::{DedupOutcome, canonical_row, dedupe_by_hash, hash_rows};
pub use numeric::{NumericInference, infer_numeric};
pub use schema::{is_null_sentinel, normalize_name, normalize_table};
pub use silver::{SilverBuild, build_silver};
pub use warning::CoercionWarning;
