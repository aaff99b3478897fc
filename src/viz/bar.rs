//! Bar chart handler

use crate::types::{rows_to_json, Row};
use crate::viz::config::VisualizationConfig;
use crate::viz::engine::{require_rows, VisualizationHandler};
use crate::viz::error::{VizError, VizResult};
use serde_json::json;

/// Category comparison chart with an ordinal x axis and a quantitative y axis
pub struct BarChartHandler;

impl VisualizationHandler for BarChartHandler {
    fn validate(&self, rows: &[Row], config: &VisualizationConfig) -> VizResult<()> {
        require_rows(rows, "bar chart")?;

        let first = &rows[0];
        for column in config.required_columns() {
            if !first.contains_key(column) {
                return Err(VizError::Validation(format!(
                    "Required column '{}' not found in data",
                    column
                )));
            }
        }
        Ok(())
    }

    fn render(&self, rows: &[Row], config: &VisualizationConfig) -> VizResult<serde_json::Value> {
        let color = config
            .color_column
            .as_ref()
            .map(|field| json!({ "field": field }));

        Ok(json!({
            "type": "bar",
            "data": rows_to_json(rows),
            "encoding": {
                "x": { "field": config.x_column, "type": "ordinal" },
                "y": { "field": config.y_column, "type": "quantitative" },
                "color": color
            },
            "title": config.title,
            "width": config.width,
            "height": config.height,
            "theme": config.theme,
            "interactive": config.interactive
        }))
    }

    fn describe(&self) -> &str {
        "Bar chart for comparing categories, rankings and distributions"
    }
}
