//! Dashboard facade.
//!
//! Ties a [`DatasetRegistry`] to a [`VisualizationEngine`] and keeps the
//! visualizations added so far, in insertion order, under generated ids
//! (`viz_0`, `viz_1`, ...). Serving the results is left to the caller.

use crate::config::VizoraConfig;
use crate::data::{DataResult, DatasetRegistry};
use crate::types::rows_to_json;
use crate::viz::{
    RenderSpec, VisualizationConfig, VisualizationEngine, VisualizationHandler,
    VisualizationKind, VizError, VizResult,
};
use chrono::{DateTime, Utc};
use indexmap::IndexMap;
use parking_lot::RwLock;
use serde::Serialize;
use std::path::Path;
use std::sync::Arc;
use tracing::Span;

/// Dataset rows in the shape served to dashboard front ends
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct DatasetPayload {
    pub data: serde_json::Value,
    pub count: usize,
    pub dataset: String,
    /// Source file modification time
    pub timestamp: DateTime<Utc>,
}

pub struct Dashboard {
    name: String,
    datasets: DatasetRegistry,
    engine: VisualizationEngine,
    visualizations: RwLock<IndexMap<String, VisualizationConfig>>,
    span: Span,
}

impl Dashboard {
    pub fn new(name: impl Into<String>, config: &VizoraConfig) -> Self {
        let name = name.into();
        let span = tracing::info_span!("dashboard", name = %name);
        let datasets = DatasetRegistry::new(config)
            .with_span(tracing::info_span!(parent: &span, "dataset_registry"));
        let engine = VisualizationEngine::new()
            .with_span(tracing::info_span!(parent: &span, "visualization_engine"));

        span.in_scope(|| tracing::info!("{} initialized", name));
        Self {
            name,
            datasets,
            engine,
            visualizations: RwLock::new(IndexMap::new()),
            span,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn datasets(&self) -> &DatasetRegistry {
        &self.datasets
    }

    pub fn engine(&self) -> &VisualizationEngine {
        &self.engine
    }

    /// Load a data file. Returns the dataset name it was stored under.
    pub fn add_data_source(&self, path: impl AsRef<Path>, name: Option<&str>) -> DataResult<String> {
        self.datasets.load(path, name)
    }

    /// Add a visualization and return its id.
    ///
    /// Nothing is validated until the visualization is rendered.
    pub fn add_visualization(&self, config: VisualizationConfig) -> String {
        let _enter = self.span.enter();
        let mut visualizations = self.visualizations.write();
        let id = format!("viz_{}", visualizations.len());
        tracing::info!("Added {} visualization as {}", config.kind, id);
        visualizations.insert(id.clone(), config);
        id
    }

    /// Register a handler for a (usually custom) visualization kind
    pub fn register_visualization(
        &self,
        kind: VisualizationKind,
        handler: Arc<dyn VisualizationHandler>,
    ) {
        self.engine.register(kind, handler);
    }

    pub fn visualization(&self, id: &str) -> Option<VisualizationConfig> {
        self.visualizations.read().get(id).cloned()
    }

    /// Ids of added visualizations in insertion order
    pub fn visualization_ids(&self) -> Vec<String> {
        self.visualizations.read().keys().cloned().collect()
    }

    /// Render one visualization against the current rows of its dataset
    pub fn render(&self, id: &str) -> VizResult<RenderSpec> {
        let config = self
            .visualization(id)
            .ok_or_else(|| VizError::UnknownVisualization(id.to_string()))?;
        let rows = self.datasets.get(&config.data_source)?;
        self.engine.create_visualization(&config, &rows)
    }

    /// Render every visualization; one failure does not stop the others
    pub fn render_all(&self) -> IndexMap<String, VizResult<RenderSpec>> {
        self.visualization_ids()
            .into_iter()
            .map(|id| {
                let spec = self.render(&id);
                (id, spec)
            })
            .collect()
    }

    pub fn dataset_payload(&self, name: &str) -> DataResult<DatasetPayload> {
        let (rows, info) = self.datasets.snapshot(name)?;
        Ok(DatasetPayload {
            data: rows_to_json(&rows),
            count: rows.len(),
            dataset: name.to_string(),
            timestamp: info.last_modified,
        })
    }
}

impl std::fmt::Debug for Dashboard {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Dashboard")
            .field("name", &self.name)
            .field("datasets", &self.datasets.list_datasets())
            .field("visualizations", &self.visualization_ids())
            .finish()
    }
}
