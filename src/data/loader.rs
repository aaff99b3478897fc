//! File format detection and dispatch.
//!
//! ## Memory Limits
//!
//! The configured maximum file size is checked against `stat` before any
//! bytes are read. It is the only built-in guard: callers that need time
//! limits must enforce them before calling [`FormatLoader::load`].

use crate::config::VizoraConfig;
use crate::data::csv_parser::{parse_csv_bytes, parse_flexible_bytes};
use crate::data::error::{DataError, DataResult};
use crate::data::json_parser::parse_json_content;
use crate::data::tabular::{PolarsEngine, TabularEngine};
use crate::types::Row;
use chrono::{DateTime, Utc};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;
use tracing::Span;

/// Source format, decided by file extension
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SourceFormat {
    Csv,
    Json,
    /// xlsx, xls, parquet
    Tabular,
    /// Unknown extension: delimiter probing, then one value per line
    Flexible,
}

impl SourceFormat {
    pub fn from_path(path: &Path) -> Self {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_lowercase())
            .unwrap_or_default();

        match ext.as_str() {
            "csv" => SourceFormat::Csv,
            "json" => SourceFormat::Json,
            "xlsx" | "xls" | "parquet" => SourceFormat::Tabular,
            _ => SourceFormat::Flexible,
        }
    }
}

/// Rows parsed from one file plus the file stats they came from
#[derive(Clone, Debug)]
pub struct LoadedFile {
    /// Resolved path (may differ from the requested one)
    pub path: PathBuf,
    pub format: SourceFormat,
    pub size_bytes: u64,
    pub modified: DateTime<Utc>,
    pub rows: Vec<Row>,
}

/// Detects a file's format and turns it into rows of coerced values
#[derive(Clone)]
pub struct FormatLoader {
    max_size_bytes: u64,
    sniff_sample_bytes: usize,
    data_directory: Option<PathBuf>,
    engine: Arc<dyn TabularEngine>,
    span: Span,
}

impl FormatLoader {
    pub fn new(config: &VizoraConfig) -> Self {
        Self {
            max_size_bytes: config.max_size_bytes(),
            sniff_sample_bytes: config.sniff_sample_bytes,
            data_directory: Some(config.data_directory.clone()),
            engine: Arc::new(PolarsEngine),
            span: tracing::info_span!("format_loader"),
        }
    }

    /// Replace the collaborator used for xlsx/xls/parquet
    pub fn with_engine(mut self, engine: Arc<dyn TabularEngine>) -> Self {
        self.engine = engine;
        self
    }

    pub fn with_span(mut self, span: Span) -> Self {
        self.span = span;
        self
    }

    pub fn max_size_bytes(&self) -> u64 {
        self.max_size_bytes
    }

    /// Find the file: the path as given, else its file name under the data
    /// directory.
    pub fn resolve(&self, path: &Path) -> DataResult<PathBuf> {
        if path.exists() {
            return Ok(path.to_path_buf());
        }

        if let (Some(dir), Some(file_name)) = (&self.data_directory, path.file_name()) {
            let candidate = dir.join(file_name);
            if candidate.exists() {
                return Ok(candidate);
            }
        }

        Err(DataError::FileNotFound {
            path: path.to_path_buf(),
        })
    }

    /// Load a file into rows.
    ///
    /// # Errors
    /// - [`DataError::FileNotFound`] when neither location exists
    /// - [`DataError::TooLarge`] when the file exceeds the size limit
    /// - [`DataError::Format`] when no strategy can parse the content
    pub fn load(&self, path: &Path) -> DataResult<LoadedFile> {
        let _enter = self.span.enter();
        let start = Instant::now();

        let path = self.resolve(path)?;
        let metadata = std::fs::metadata(&path)?;
        let size_bytes = metadata.len();
        if size_bytes > self.max_size_bytes {
            return Err(DataError::TooLarge {
                size_bytes,
                max_bytes: self.max_size_bytes,
            });
        }
        let modified = metadata
            .modified()
            .map(DateTime::<Utc>::from)
            .unwrap_or_else(|_| Utc::now());

        let format = SourceFormat::from_path(&path);
        tracing::info!(
            "Loading {} as {:?} ({:.1}KB)",
            path.display(),
            format,
            size_bytes as f64 / 1024.0
        );

        let rows = match format {
            SourceFormat::Csv => parse_csv_bytes(&std::fs::read(&path)?, self.sniff_sample_bytes)?,
            SourceFormat::Json => {
                let bytes = std::fs::read(&path)?;
                let content = std::str::from_utf8(&bytes).map_err(|e| {
                    DataError::Format(format!("JSON file is not valid UTF-8: {}", e))
                })?;
                parse_json_content(content)?
            }
            SourceFormat::Tabular => self.engine.read(&path)?,
            SourceFormat::Flexible => parse_flexible_bytes(&std::fs::read(&path)?)?,
        };

        tracing::debug!(
            "Parsed {} rows from {} in {:?}",
            rows.len(),
            path.display(),
            start.elapsed()
        );

        Ok(LoadedFile {
            path,
            format,
            size_bytes,
            modified,
            rows,
        })
    }
}

impl std::fmt::Debug for FormatLoader {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FormatLoader")
            .field("max_size_bytes", &self.max_size_bytes)
            .field("sniff_sample_bytes", &self.sniff_sample_bytes)
            .field("data_directory", &self.data_directory)
            .finish_non_exhaustive()
    }
}
