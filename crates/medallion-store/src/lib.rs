#![deny(unsafe_code)]

//! Persistent stage store for the medallion pipeline.
//!
//! Holds the bronze, silver and gold tables as JSON files under one
//! directory and gates entry into the Silver/Gold transformation paths
//! with an explicit reuse-or-rebuild decision.

mod cache;
mod error;
mod store;

pub use cache::{CacheDecision, CachePreference, decide};
pub use error::{Result, StoreError};
pub use store::StageStore;
