#![deny(unsafe_code)]

//! Raw data ingestion for the medallion pipeline.
//!
//! Resolves the text encoding of a source file, reads it as a delimited
//! all-text table, and hands the result to the store as the Bronze layer.

mod encoding;
mod error;
mod reader;

pub use encoding::{SNIFF_LEN, candidate_encodings, decode_file, detect_encoding};
pub use error::{IngestError, Result};
pub use reader::{CHUNK_ROWS, DEFAULT_DELIMITER, RawTable, ReadOptions, read_table};
