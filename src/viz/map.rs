//! Point map handler

use crate::constants::{
    LATITUDE_ALIASES, LONGITUDE_ALIASES, MAP_POINT_COLOR, MAP_POINT_RADIUS,
    MAP_POINT_STROKE_COLOR, MAP_POINT_STROKE_WIDTH,
};
use crate::types::{rows_to_json, Row};
use crate::viz::config::VisualizationConfig;
use crate::viz::engine::{require_rows, VisualizationHandler};
use crate::viz::error::{VizError, VizResult};
use serde_json::json;

/// Location data drawn as a circle layer on a base map
pub struct MapHandler;

/// True when the row has a latitude alias and a longitude alias
fn has_coordinates(row: &Row) -> bool {
    LATITUDE_ALIASES.iter().any(|c| row.contains_key(*c))
        && LONGITUDE_ALIASES.iter().any(|c| row.contains_key(*c))
}

impl VisualizationHandler for MapHandler {
    fn validate(&self, rows: &[Row], _config: &VisualizationConfig) -> VizResult<()> {
        require_rows(rows, "map")?;

        if !rows.iter().any(has_coordinates) {
            return Err(VizError::Validation(
                "Map visualization requires latitude and longitude columns".to_string(),
            ));
        }
        Ok(())
    }

    fn render(&self, rows: &[Row], config: &VisualizationConfig) -> VizResult<serde_json::Value> {
        let data = rows_to_json(rows);
        let center = [
            config.center_lng.unwrap_or(0.0),
            config.center_lat.unwrap_or(0.0),
        ];

        Ok(json!({
            "type": "map",
            "data": data,
            "center": center,
            "zoom": config.zoom_level,
            "pitch": config.pitch,
            "bearing": config.bearing,
            "title": config.title,
            "interactive": config.interactive,
            "layers": [{
                "type": "circle",
                "data": data,
                "paint": {
                    "circle-radius": MAP_POINT_RADIUS,
                    "circle-color": MAP_POINT_COLOR,
                    "circle-stroke-color": MAP_POINT_STROKE_COLOR,
                    "circle-stroke-width": MAP_POINT_STROKE_WIDTH
                }
            }]
        }))
    }

    fn describe(&self) -> &str {
        "Interactive map for location-based data and regional comparisons"
    }
}
