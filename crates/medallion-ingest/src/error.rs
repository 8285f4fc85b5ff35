//! Error types for raw data ingestion.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while reading a source file into Bronze.
#[derive(Debug, Error)]
pub enum IngestError {
    /// Source file not found.
    #[error("source file not found: {path}")]
    FileNotFound { path: PathBuf },

    /// Failed to read the source file.
    #[error("failed to read file {path}: {source}")]
    FileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// No candidate encoding decoded the file without errors.
    #[error("could not decode {path} with any candidate encoding (tried: {tried})")]
    Undecodable { path: PathBuf, tried: String },

    /// File has no header row at all.
    #[error("source file is empty: {path}")]
    EmptyFile { path: PathBuf },

    /// Failed to parse a delimited record.
    #[error("failed to parse {path}: {message}")]
    Parse { path: PathBuf, message: String },

    /// Table construction rejected the parsed data.
    #[error("table construction failed for {path}: {source}")]
    Table {
        path: PathBuf,
        #[source]
        source: medallion_model::ModelError,
    },
}

/// Result type for ingestion operations.
pub type Result<T> = std::result::Result<T, IngestError>;
