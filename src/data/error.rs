//! Error types for data operations
//!
//! Provides unified error handling for all data loading and parsing operations.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur during data operations
#[derive(Error, Debug)]
pub enum DataError {
    /// Source file does not exist (also checked under the data directory)
    #[error("Data file not found: {}", .path.display())]
    FileNotFound { path: PathBuf },

    /// No dataset is loaded under this name
    #[error("Dataset '{name}' not found. Available: {available:?}")]
    DatasetNotFound { name: String, available: Vec<String> },

    /// File exceeds the configured size limit
    #[error("File too large: {:.1}MB (max {:.1}MB)", mb(.size_bytes), mb(.max_bytes))]
    TooLarge { size_bytes: u64, max_bytes: u64 },

    /// Content could not be parsed by any attempted strategy
    #[error("Invalid data format: {0}")]
    Format(String),

    /// IO error from std::io
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

fn mb(bytes: &u64) -> f64 {
    *bytes as f64 / (1024.0 * 1024.0)
}

impl DataError {
    /// True for missing files and missing datasets
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            DataError::FileNotFound { .. } | DataError::DatasetNotFound { .. }
        )
    }
}

/// Result type alias for data operations
pub type DataResult<T> = Result<T, DataError>;

impl From<serde_json::Error> for DataError {
    fn from(e: serde_json::Error) -> Self {
        DataError::Format(format!("JSON parse error: {}", e))
    }
}

impl From<csv::Error> for DataError {
    fn from(e: csv::Error) -> Self {
        DataError::Format(format!("CSV parse error: {}", e))
    }
}

impl From<polars::error::PolarsError> for DataError {
    fn from(e: polars::error::PolarsError) -> Self {
        DataError::Format(format!("Polars error: {}", e))
    }
}

impl From<calamine::Error> for DataError {
    fn from(e: calamine::Error) -> Self {
        DataError::Format(format!("Spreadsheet error: {}", e))
    }
}
