//! Panel loading types

use arrow::error::ArrowError;
use parquet::errors::ParquetError;
use std::path::PathBuf;
use thiserror::Error;

use crate::panel::PanelError;

/// Panel loading errors
#[derive(Debug, Error)]
pub enum LoadError {
    /// File could not be opened or read
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    /// CSV decoding or column conversion failed
    #[error("Arrow error: {0}")]
    Arrow(#[from] ArrowError),
    /// Parquet decoding failed
    #[error("Parquet error: {0}")]
    Parquet(#[from] ParquetError),
    /// File extension is neither .csv nor .parquet
    #[error("Unsupported input format: {0}")]
    UnsupportedFormat(PathBuf),
    /// Timestamp column is absent
    #[error("Missing timestamp column: {0}")]
    MissingTimestamp(String),
    /// Timestamp cell is empty or out of range
    #[error("Invalid timestamp at row {row}")]
    InvalidTimestamp { row: usize },
    /// Loaded tables do not form a panel
    #[error(transparent)]
    Panel(#[from] PanelError),
}

/// Supported export formats
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputFormat {
    /// Comma-separated with a header row
    Csv,
    /// Apache Parquet
    Parquet,
}

impl InputFormat {
    /// Detect the format from a file extension
    pub fn from_path(path: &std::path::Path) -> Result<Self, LoadError> {
        let extension = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase());

        match extension.as_deref() {
            Some("csv") => Ok(InputFormat::Csv),
            Some("parquet") | Some("pq") => Ok(InputFormat::Parquet),
            _ => Err(LoadError::UnsupportedFormat(path.to_path_buf())),
        }
    }
}
