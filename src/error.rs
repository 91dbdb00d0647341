use std::path::PathBuf;

use thiserror::Error;

/// The input could not be read or parsed.
#[derive(Debug, Error)]
pub enum DataSourceError {
    #[error("cannot read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid CSV in {path}: {source}")]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    #[error("invalid JSON in {path}: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid Parquet in {path}: {source}")]
    Parquet {
        path: PathBuf,
        #[source]
        source: parquet::errors::ParquetError,
    },

    #[error("invalid Arrow data in {path}: {source}")]
    Arrow {
        path: PathBuf,
        #[source]
        source: arrow::error::ArrowError,
    },

    #[error("{path}, row {row}: {message}")]
    Malformed {
        path: PathBuf,
        row: usize,
        message: String,
    },

    #[error("unsupported file extension .{extension} ({path})")]
    UnsupportedFormat { path: PathBuf, extension: String },
}

/// The input was readable but lacks a column the dashboard needs.
#[derive(Debug, Error)]
#[error("{path} is missing required column '{column}'")]
pub struct SchemaMismatchError {
    pub path: PathBuf,
    pub column: String,
}

/// Any failure while loading a table. Fatal at startup.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error(transparent)]
    Source(#[from] DataSourceError),

    #[error(transparent)]
    Schema(#[from] SchemaMismatchError),
}

impl LoadError {
    pub fn is_schema_mismatch(&self) -> bool {
        matches!(self, LoadError::Schema(_))
    }
}

pub type LoadResult<T> = std::result::Result<T, LoadError>;
