#![deny(unsafe_code)]

//! Core data model for the medallion pipeline.
//!
//! A [`Table`] is an ordered sequence of named, typed [`Column`]s with
//! aligned row positions. Tables are the unit of exchange between the
//! ingest, transform, validate and query crates, and the unit of
//! persistence in the stage store.

mod error;
mod metrics;
mod stage;
mod table;

pub use error::{ModelError, Result};
pub use metrics::PipelineMetrics;
pub use stage::Stage;
pub use table::{CellValue, Column, ColumnKind, Table};

/// Column name carrying the per-row content hash added by the Silver build.
pub const HASH_COLUMN: &str = "hash_id";
