//! Visualization engine: kind to handler registry.
//!
//! Handlers are looked up by [`VisualizationKind`]. Each request validates
//! the rows first and only renders when validation passes. Rows are only
//! ever borrowed, never modified.

use crate::types::Row;
use crate::viz::bar::BarChartHandler;
use crate::viz::config::{VisualizationConfig, VisualizationKind};
use crate::viz::deckgl::DeckGlHandler;
use crate::viz::error::{VizError, VizResult};
use crate::viz::map::MapHandler;
use indexmap::IndexMap;
use parking_lot::RwLock;
use serde::Serialize;
use std::sync::Arc;
use tracing::Span;

/// Renderer-agnostic output of one visualization request
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct RenderSpec {
    pub kind: VisualizationKind,
    pub payload: serde_json::Value,
}

/// Validate/render capability pair for one or more kinds
pub trait VisualizationHandler: Send + Sync {
    /// Check that `rows` meet the structural requirements of `config.kind`
    fn validate(&self, rows: &[Row], config: &VisualizationConfig) -> VizResult<()>;

    /// Build the renderer payload. Only called after `validate` passed.
    fn render(&self, rows: &[Row], config: &VisualizationConfig) -> VizResult<serde_json::Value>;

    /// Human-readable summary shown in type listings
    fn describe(&self) -> &str;

    /// Fields every row must carry for `kind`, beyond the bound columns
    fn required_fields(&self, _kind: &VisualizationKind) -> Vec<String> {
        Vec::new()
    }
}

type ValidateFn = dyn Fn(&[Row], &VisualizationConfig) -> VizResult<()> + Send + Sync;
type RenderFn = dyn Fn(&[Row], &VisualizationConfig) -> VizResult<serde_json::Value> + Send + Sync;

/// Handler built from a plain function pair
pub struct FnHandler {
    description: String,
    validate: Box<ValidateFn>,
    render: Box<RenderFn>,
}

impl FnHandler {
    pub fn new<V, R>(description: impl Into<String>, validate: V, render: R) -> Self
    where
        V: Fn(&[Row], &VisualizationConfig) -> VizResult<()> + Send + Sync + 'static,
        R: Fn(&[Row], &VisualizationConfig) -> VizResult<serde_json::Value> + Send + Sync + 'static,
    {
        Self {
            description: description.into(),
            validate: Box::new(validate),
            render: Box::new(render),
        }
    }
}

impl VisualizationHandler for FnHandler {
    fn validate(&self, rows: &[Row], config: &VisualizationConfig) -> VizResult<()> {
        (self.validate)(rows, config)
    }

    fn render(&self, rows: &[Row], config: &VisualizationConfig) -> VizResult<serde_json::Value> {
        (self.render)(rows, config)
    }

    fn describe(&self) -> &str {
        &self.description
    }
}

/// Listing entry for one registered kind
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct TypeInfo {
    #[serde(rename = "type")]
    pub kind: VisualizationKind,
    pub description: String,
    pub required_columns: Vec<String>,
    pub supports_3d: bool,
    pub category: &'static str,
}

pub struct VisualizationEngine {
    handlers: RwLock<IndexMap<VisualizationKind, Arc<dyn VisualizationHandler>>>,
    span: Span,
}

impl VisualizationEngine {
    /// Engine with the built-in bar, map and deck.gl handlers
    pub fn new() -> Self {
        let deckgl: Arc<dyn VisualizationHandler> = Arc::new(DeckGlHandler);
        let mut handlers: IndexMap<VisualizationKind, Arc<dyn VisualizationHandler>> =
            IndexMap::new();
        handlers.insert(VisualizationKind::Bar, Arc::new(BarChartHandler));
        handlers.insert(VisualizationKind::Map, Arc::new(MapHandler));
        handlers.insert(VisualizationKind::DeckglOverlay, Arc::clone(&deckgl));
        handlers.insert(VisualizationKind::ArcLayer, Arc::clone(&deckgl));
        handlers.insert(VisualizationKind::ScatterplotLayer, deckgl);

        tracing::info!(
            "VisualizationEngine initialized with {} visualization types",
            handlers.len()
        );
        Self {
            handlers: RwLock::new(handlers),
            span: tracing::info_span!("visualization_engine"),
        }
    }

    pub fn with_span(mut self, span: Span) -> Self {
        self.span = span;
        self
    }

    /// Validate `rows` for `config.kind` and render them
    pub fn create_visualization(
        &self,
        config: &VisualizationConfig,
        rows: &[Row],
    ) -> VizResult<RenderSpec> {
        let _enter = self.span.enter();
        tracing::info!("Creating {} visualization: {}", config.kind, config.title);

        let handler = self.handler(&config.kind)?;
        handler.validate(rows, config).inspect_err(|e| {
            tracing::warn!("Rejected {} visualization: {}", config.kind, e);
        })?;
        let payload = handler.render(rows, config)?;

        tracing::info!("Generated configuration for {} data points", rows.len());
        Ok(RenderSpec {
            kind: config.kind.clone(),
            payload,
        })
    }

    /// Register a handler for `kind`, replacing any previous one
    pub fn register(&self, kind: VisualizationKind, handler: Arc<dyn VisualizationHandler>) {
        let _enter = self.span.enter();
        let replaced = self.handlers.write().insert(kind.clone(), handler).is_some();
        if replaced {
            tracing::info!("Replaced visualization handler: {}", kind);
        } else {
            tracing::info!("Registered custom visualization type: {}", kind);
        }
    }

    /// Register a plain validate/render function pair for `kind`
    pub fn register_fn<V, R>(
        &self,
        kind: VisualizationKind,
        description: impl Into<String>,
        validate: V,
        render: R,
    ) where
        V: Fn(&[Row], &VisualizationConfig) -> VizResult<()> + Send + Sync + 'static,
        R: Fn(&[Row], &VisualizationConfig) -> VizResult<serde_json::Value> + Send + Sync + 'static,
    {
        self.register(kind, Arc::new(FnHandler::new(description, validate, render)));
    }

    pub fn is_supported(&self, kind: &VisualizationKind) -> bool {
        self.handlers.read().contains_key(kind)
    }

    /// Registered kind names in registration order
    pub fn supported_types(&self) -> Vec<String> {
        self.handlers
            .read()
            .keys()
            .map(|k| k.as_str().to_string())
            .collect()
    }

    pub fn type_info(&self, kind: &VisualizationKind) -> VizResult<TypeInfo> {
        let handler = self.handler(kind)?;
        Ok(TypeInfo {
            kind: kind.clone(),
            description: handler.describe().to_string(),
            required_columns: handler.required_fields(kind),
            supports_3d: kind.supports_3d(),
            category: kind.category(),
        })
    }

    fn handler(&self, kind: &VisualizationKind) -> VizResult<Arc<dyn VisualizationHandler>> {
        self.handlers
            .read()
            .get(kind)
            .cloned()
            .ok_or_else(|| VizError::UnsupportedType(kind.to_string()))
    }
}

impl Default for VisualizationEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for VisualizationEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("VisualizationEngine")
            .field("kinds", &self.supported_types())
            .finish()
    }
}

/// Fail on empty input, naming the visualization in the message
pub(crate) fn require_rows(rows: &[Row], what: &str) -> VizResult<()> {
    if rows.is_empty() {
        return Err(VizError::Validation(format!(
            "Data cannot be empty for {}",
            what
        )));
    }
    Ok(())
}
