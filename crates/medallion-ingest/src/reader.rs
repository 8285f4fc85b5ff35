//! Delimited-file reading into a raw Bronze table.
//!
//! Every value is read as text; typed inference happens downstream in the
//! Silver build. Records are consumed in fixed-size chunks purely so the
//! caller can report progress; chunk order is preserved and concatenation
//! is lossless.

use std::path::Path;

use csv::ReaderBuilder;

use medallion_model::{CellValue, Column, ColumnKind, Table};

use crate::encoding::decode_file;
use crate::error::{IngestError, Result};

/// Default field delimiter of the source files.
pub const DEFAULT_DELIMITER: u8 = b';';

/// Rows per progress chunk.
pub const CHUNK_ROWS: usize = 50_000;

#[derive(Debug, Clone)]
pub struct ReadOptions {
    pub delimiter: u8,
}

impl Default for ReadOptions {
    fn default() -> Self {
        Self {
            delimiter: DEFAULT_DELIMITER,
        }
    }
}

/// A raw table read from a source file, with the encoding that decoded it.
#[derive(Debug)]
pub struct RawTable {
    pub table: Table,
    pub encoding: &'static str,
}

/// Read a delimited text file into a raw all-text [`Table`].
///
/// `on_progress` is invoked once per chunk and once at the end with
/// `(rows_read, total_rows_estimate)`.
pub fn read_table(
    path: &Path,
    options: &ReadOptions,
    mut on_progress: impl FnMut(u64, u64),
) -> Result<RawTable> {
    let (text, encoding) = decode_file(path)?;
    if text.trim().is_empty() {
        return Err(IngestError::EmptyFile {
            path: path.to_path_buf(),
        });
    }
    // Line count approximates the row total for progress reporting only.
    let total_rows = text.lines().count().saturating_sub(1) as u64;

    let mut reader = ReaderBuilder::new()
        .delimiter(options.delimiter)
        .has_headers(true)
        .flexible(true)
        .from_reader(text.as_bytes());

    let headers: Vec<String> = reader
        .headers()
        .map_err(|e| IngestError::Parse {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?
        .iter()
        .map(|h| h.trim_matches('\u{feff}').to_string())
        .collect();
    let headers = uniquify_headers(headers);

    let mut values: Vec<Vec<CellValue>> = vec![Vec::new(); headers.len()];
    let mut rows_read = 0u64;
    for record in reader.records() {
        let record = record.map_err(|e| IngestError::Parse {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        for (idx, column) in values.iter_mut().enumerate() {
            // Short records pad with empty text; surplus fields are dropped.
            let field = record.get(idx).unwrap_or("");
            column.push(CellValue::Text(field.to_string()));
        }
        rows_read += 1;
        if rows_read % CHUNK_ROWS as u64 == 0 {
            on_progress(rows_read, total_rows);
        }
    }
    on_progress(rows_read, total_rows);

    let mut table = Table::new();
    for (name, column_values) in headers.into_iter().zip(values) {
        table
            .push_column(Column::new(name, ColumnKind::Text, column_values))
            .map_err(|e| IngestError::Table {
                path: path.to_path_buf(),
                source: e,
            })?;
    }
    tracing::info!(
        path = %path.display(),
        rows = table.height(),
        columns = table.width(),
        "read raw table"
    );
    Ok(RawTable {
        table,
        encoding: encoding.name(),
    })
}

/// Disambiguate repeated header names with a numeric suffix.
fn uniquify_headers(headers: Vec<String>) -> Vec<String> {
    let mut seen: Vec<String> = Vec::with_capacity(headers.len());
    for header in headers {
        let mut candidate = header.clone();
        let mut suffix = 2usize;
        while seen.iter().any(|h| h.eq_ignore_ascii_case(&candidate)) {
            candidate = format!("{header}_{suffix}");
            suffix += 1;
        }
        if candidate != header {
            tracing::warn!(original = %header, renamed = %candidate, "duplicate header renamed");
        }
        seen.push(candidate);
    }
    seen
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn uniquify_appends_numeric_suffix() {
        let headers = vec!["a".to_string(), "A".to_string(), "a".to_string()];
        assert_eq!(
            uniquify_headers(headers),
            vec!["a".to_string(), "A_2".to_string(), "a_3".to_string()]
        );
    }
}
