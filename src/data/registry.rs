//! Named dataset storage.
//!
//! A dataset is replaced as a whole: rows and metadata are built outside
//! the lock and swapped in together, so readers always see a complete,
//! self-consistent dataset. Concurrent loads of the same name are not
//! serialized here; the last one to finish wins.
//!
//! ## Snapshot Cache
//!
//! `get` keeps up to `cache_capacity` row snapshots in an LRU cache keyed by
//! name. A load, reload or evict drops the cached entry for that name while
//! holding the dataset write lock, so a cached snapshot is never older than
//! the stored dataset.

use crate::config::VizoraConfig;
use crate::constants::FALLBACK_DATASET_NAME;
use crate::data::error::{DataError, DataResult};
use crate::data::loader::FormatLoader;
use crate::data::stats::{column_stats, infer_column_types, ColumnStats};
use crate::types::{DatasetInfo, Row};
use chrono::{DateTime, Utc};
use indexmap::IndexMap;
use lru::LruCache;
use parking_lot::{Mutex, RwLock};
use std::num::NonZeroUsize;
use std::path::Path;
use std::sync::Arc;
use tracing::Span;

/// Shared, immutable view of a dataset's rows
pub type Rows = Arc<Vec<Row>>;

/// One loaded dataset: rows plus the metadata derived from them
#[derive(Clone, Debug)]
struct Dataset {
    rows: Rows,
    info: Arc<DatasetInfo>,
}

/// Loads, stores and serves named datasets
pub struct DatasetRegistry {
    loader: FormatLoader,
    type_sample_size: usize,
    datasets: RwLock<IndexMap<String, Dataset>>,
    cache: Mutex<LruCache<String, Rows>>,
    span: Span,
}

impl DatasetRegistry {
    pub fn new(config: &VizoraConfig) -> Self {
        Self::with_loader(FormatLoader::new(config), config)
    }

    pub fn with_loader(loader: FormatLoader, config: &VizoraConfig) -> Self {
        let capacity = NonZeroUsize::new(config.cache_capacity).unwrap_or(NonZeroUsize::MIN);
        let registry = Self {
            loader,
            type_sample_size: config.type_sample_size,
            datasets: RwLock::new(IndexMap::new()),
            cache: Mutex::new(LruCache::new(capacity)),
            span: tracing::info_span!("dataset_registry"),
        };
        registry.span.in_scope(|| {
            tracing::info!(
                "DatasetRegistry initialized (max size: {}MB, cache: {})",
                config.max_size_mb,
                capacity
            )
        });
        registry
    }

    pub fn with_span(mut self, span: Span) -> Self {
        self.span = span;
        self
    }

    /// Load a file under `name`, or under the file stem when no name is
    /// given. Any dataset already stored under that name is replaced.
    ///
    /// Returns the effective dataset name.
    pub fn load(&self, path: impl AsRef<Path>, name: Option<&str>) -> DataResult<String> {
        let path = path.as_ref();
        let name = match name.filter(|n| !n.is_empty()) {
            Some(n) => n.to_string(),
            None => path
                .file_stem()
                .and_then(|s| s.to_str())
                .filter(|s| !s.is_empty())
                .unwrap_or(FALLBACK_DATASET_NAME)
                .to_string(),
        };

        let _enter = self.span.enter();
        let loaded = self.loader.load(path).inspect_err(|e| {
            tracing::error!("Failed to load {}: {}", path.display(), e);
        })?;

        let columns: Vec<String> = loaded
            .rows
            .first()
            .map(|r| r.keys().cloned().collect())
            .unwrap_or_default();
        let info = DatasetInfo {
            name: name.clone(),
            file_path: loaded.path,
            size_bytes: loaded.size_bytes,
            last_modified: loaded.modified,
            row_count: loaded.rows.len(),
            column_count: columns.len(),
            data_types: infer_column_types(&loaded.rows, self.type_sample_size),
            columns,
        };
        tracing::info!(
            "Loaded dataset '{}': {} rows, {} columns",
            name,
            info.row_count,
            info.column_count
        );

        let dataset = Dataset {
            rows: Arc::new(loaded.rows),
            info: Arc::new(info),
        };

        let mut datasets = self.datasets.write();
        datasets.insert(name.clone(), dataset);
        self.cache.lock().pop(&name);

        Ok(name)
    }

    /// Rows of a dataset.
    ///
    /// Repeated calls return the same snapshot until the name is loaded,
    /// reloaded or evicted again.
    pub fn get(&self, name: &str) -> DataResult<Rows> {
        if let Some(rows) = self.cache.lock().get(name) {
            return Ok(Arc::clone(rows));
        }

        let datasets = self.datasets.read();
        let dataset = datasets.get(name).ok_or_else(|| not_found(name, &datasets))?;
        let rows = Arc::clone(&dataset.rows);
        self.cache.lock().put(name.to_string(), Arc::clone(&rows));
        Ok(rows)
    }

    /// Metadata of a dataset
    pub fn info(&self, name: &str) -> DataResult<Arc<DatasetInfo>> {
        let datasets = self.datasets.read();
        datasets
            .get(name)
            .map(|d| Arc::clone(&d.info))
            .ok_or_else(|| not_found(name, &datasets))
    }

    /// Rows and metadata of a dataset, taken together so a concurrent
    /// reload cannot pair the rows of one load with the info of another
    pub fn snapshot(&self, name: &str) -> DataResult<(Rows, Arc<DatasetInfo>)> {
        let datasets = self.datasets.read();
        datasets
            .get(name)
            .map(|d| (Arc::clone(&d.rows), Arc::clone(&d.info)))
            .ok_or_else(|| not_found(name, &datasets))
    }

    /// Re-read a dataset from the path it was loaded from
    pub fn reload(&self, name: &str) -> DataResult<()> {
        let path = self.info(name)?.file_path.clone();
        self.load(&path, Some(name))?;
        let _enter = self.span.enter();
        tracing::info!("Reloaded dataset: {}", name);
        Ok(())
    }

    /// Remove a dataset. Returns whether it was loaded.
    pub fn evict(&self, name: &str) -> bool {
        let mut datasets = self.datasets.write();
        self.cache.lock().pop(name);
        datasets.shift_remove(name).is_some()
    }

    /// Statistics for one column of a dataset
    pub fn column_stats(&self, dataset: &str, column: &str) -> DataResult<ColumnStats> {
        let rows = self.get(dataset)?;
        Ok(column_stats(&rows, column))
    }

    /// Loaded dataset names in first-load order
    pub fn list_datasets(&self) -> Vec<String> {
        self.datasets.read().keys().cloned().collect()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.datasets.read().contains_key(name)
    }

    /// Modification time of a dataset's source file
    pub fn last_modified(&self, name: &str) -> DataResult<DateTime<Utc>> {
        Ok(self.info(name)?.last_modified)
    }
}

fn not_found(name: &str, datasets: &IndexMap<String, Dataset>) -> DataError {
    DataError::DatasetNotFound {
        name: name.to_string(),
        available: datasets.keys().cloned().collect(),
    }
}
