//! Error types for each pipeline stage.
//!
//! Stages return these typed errors from their inherent methods. Through the
//! [`crate::etl`] traits they travel as [`eyre::Report`], and callers can
//! recover the stage with `report.downcast_ref::<ReadError>()` and friends.

use std::path::PathBuf;
use thiserror::Error;

/// The source file could not be read or parsed as delimited text.
#[derive(Debug, Error)]
pub enum ReadError {
    #[error("Source file not found: {}", .0.display())]
    NotFound(PathBuf),

    #[error("Failed to open {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse {}: {source}", path.display())]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    #[error("No columns to parse from file: {}", .0.display())]
    Empty(PathBuf),

    #[error("{}: line {line} has {found} fields, expected {expected}", path.display())]
    TooManyFields {
        path: PathBuf,
        line: u64,
        expected: usize,
        found: usize,
    },
}

/// Column normalization produced an invalid dataset.
#[derive(Debug, Error)]
pub enum TransformError {
    #[error("Column {index} has an empty name")]
    EmptyColumnName { index: usize },

    #[error("Columns {original:?} and {other:?} both normalize to {normalized:?}")]
    DuplicateColumn {
        original: String,
        other: String,
        normalized: String,
    },
}

/// The destination could not be reached or rejected the write.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("Unsupported destination URL: {0}")]
    UnsupportedUrl(String),

    #[error("Failed to connect to {url}: {source}")]
    Connect {
        url: String,
        #[source]
        source: rusqlite::Error,
    },

    #[error("Failed to write table '{table}': {source}")]
    Write {
        table: String,
        #[source]
        source: rusqlite::Error,
    },

    #[error("Failed to query destination: {0}")]
    Query(#[from] rusqlite::Error),

    #[error("Refusing to write table '{0}' with no columns")]
    EmptySchema(String),
}
