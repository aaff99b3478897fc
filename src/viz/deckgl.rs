//! Deck.gl overlay handler, shared by the overlay, arc and scatterplot kinds.
//!
//! The layer list depends on the requested kind. Entries in the config's
//! `custom_config` are merged into the top-level payload last and win over
//! every computed key.

use crate::constants::{
    DECKGL_DEFAULT_BEARING, DECKGL_DEFAULT_CENTER, DECKGL_DEFAULT_PITCH, DECKGL_MAP_STYLE,
};
use crate::types::{rows_to_json, Row};
use crate::viz::config::{VisualizationConfig, VisualizationKind};
use crate::viz::engine::{require_rows, VisualizationHandler};
use crate::viz::error::{VizError, VizResult};
use serde_json::{json, Map};

const ARC_FIELDS: [&str; 2] = ["source", "target"];

pub struct DeckGlHandler;

impl VisualizationHandler for DeckGlHandler {
    fn validate(&self, rows: &[Row], config: &VisualizationConfig) -> VizResult<()> {
        require_rows(rows, "DeckGL visualization")?;

        if config.kind == VisualizationKind::ArcLayer {
            let first = &rows[0];
            if let Some(field) = ARC_FIELDS.iter().find(|f| !first.contains_key(**f)) {
                return Err(VizError::Validation(format!(
                    "ArcLayer requires '{}' field",
                    field
                )));
            }
        }
        Ok(())
    }

    fn render(&self, rows: &[Row], config: &VisualizationConfig) -> VizResult<serde_json::Value> {
        let data = rows_to_json(rows);
        let (default_lng, default_lat) = DECKGL_DEFAULT_CENTER;
        // Zero pitch/bearing means "not set"
        let pitch = if config.pitch == 0.0 { DECKGL_DEFAULT_PITCH } else { config.pitch };
        let bearing = if config.bearing == 0.0 { DECKGL_DEFAULT_BEARING } else { config.bearing };

        let layers = match config.kind {
            VisualizationKind::ArcLayer => vec![json!({
                "type": "ArcLayer",
                "id": "arc-layer",
                "data": data,
                "getSourcePosition": "source",
                "getTargetPosition": "target",
                "getSourceColor": [0, 255, 100],
                "getTargetColor": [0, 190, 255],
                "getWidth": 5
            })],
            VisualizationKind::ScatterplotLayer => vec![json!({
                "type": "ScatterplotLayer",
                "id": "scatter-layer",
                "data": data,
                "getPosition": "position",
                "getRadius": 100,
                "getFillColor": [255, 140, 0]
            })],
            _ => Vec::new(),
        };

        let mut payload = Map::new();
        payload.insert("type".into(), json!("deckgl_overlay"));
        payload.insert("data".into(), data);
        payload.insert("mapStyle".into(), json!(DECKGL_MAP_STYLE));
        payload.insert(
            "initialViewState".into(),
            json!({
                "longitude": config.center_lng.unwrap_or(default_lng),
                "latitude": config.center_lat.unwrap_or(default_lat),
                "zoom": config.zoom_level,
                "pitch": pitch,
                "bearing": bearing
            }),
        );
        payload.insert("title".into(), json!(config.title));
        payload.insert("layers".into(), json!(layers));

        for (key, value) in &config.custom_config {
            payload.insert(key.clone(), value.clone());
        }

        Ok(serde_json::Value::Object(payload))
    }

    fn describe(&self) -> &str {
        "WebGL-accelerated 3D overlay for large geospatial datasets"
    }

    fn required_fields(&self, kind: &VisualizationKind) -> Vec<String> {
        match kind {
            VisualizationKind::ArcLayer => ARC_FIELDS.iter().map(|f| f.to_string()).collect(),
            _ => Vec::new(),
        }
    }
}
