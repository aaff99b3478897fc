//! Visualization kinds and request configuration.

use crate::constants::{DEFAULT_HEIGHT, DEFAULT_WIDTH, DEFAULT_ZOOM_LEVEL};
use serde::{Deserialize, Serialize};
use serde_json::Map;
use std::fmt;
use std::str::FromStr;

// ============================================================================
// Visualization Kinds
// ============================================================================

/// Visualization kind tag.
///
/// Known kinds have their own variant; anything else is `Custom` and only
/// renders once a handler is registered for it.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub enum VisualizationKind {
    // Basic charts
    Bar,
    Line,
    Scatter,
    Pie,
    Histogram,
    // Geospatial
    Map,
    Choropleth,
    Heatmap,
    // Deck.gl
    DeckglOverlay,
    ArcLayer,
    ScatterplotLayer,
    HexagonLayer,
    // Financial
    Candlestick,
    Volume,
    Ohlc,
    /// Runtime-registered kind
    Custom(String),
}

impl VisualizationKind {
    pub fn as_str(&self) -> &str {
        match self {
            VisualizationKind::Bar => "bar",
            VisualizationKind::Line => "line",
            VisualizationKind::Scatter => "scatter",
            VisualizationKind::Pie => "pie",
            VisualizationKind::Histogram => "histogram",
            VisualizationKind::Map => "map",
            VisualizationKind::Choropleth => "choropleth",
            VisualizationKind::Heatmap => "heatmap",
            VisualizationKind::DeckglOverlay => "deckgl_overlay",
            VisualizationKind::ArcLayer => "arc_layer",
            VisualizationKind::ScatterplotLayer => "scatterplot_layer",
            VisualizationKind::HexagonLayer => "hexagon_layer",
            VisualizationKind::Candlestick => "candlestick",
            VisualizationKind::Volume => "volume",
            VisualizationKind::Ohlc => "ohlc",
            VisualizationKind::Custom(name) => name,
        }
    }

    /// Grouping used in type listings
    pub fn category(&self) -> &'static str {
        use VisualizationKind::*;
        match self {
            Bar | Line | Scatter | Pie => "Basic Charts",
            Map | Choropleth | Heatmap => "Geospatial",
            DeckglOverlay | ArcLayer | ScatterplotLayer => "3D Visualizations",
            Candlestick | Volume => "Financial",
            _ => "Other",
        }
    }

    pub fn supports_3d(&self) -> bool {
        matches!(
            self,
            VisualizationKind::DeckglOverlay | VisualizationKind::ArcLayer
        )
    }
}

impl fmt::Display for VisualizationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for VisualizationKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let kind = match s.trim().to_lowercase().as_str() {
            "" => return Err("visualization kind cannot be empty".to_string()),
            "bar" => VisualizationKind::Bar,
            "line" => VisualizationKind::Line,
            "scatter" => VisualizationKind::Scatter,
            "pie" => VisualizationKind::Pie,
            "histogram" => VisualizationKind::Histogram,
            "map" => VisualizationKind::Map,
            "choropleth" => VisualizationKind::Choropleth,
            "heatmap" => VisualizationKind::Heatmap,
            "deckgl_overlay" => VisualizationKind::DeckglOverlay,
            "arc_layer" => VisualizationKind::ArcLayer,
            "scatterplot_layer" => VisualizationKind::ScatterplotLayer,
            "hexagon_layer" => VisualizationKind::HexagonLayer,
            "candlestick" => VisualizationKind::Candlestick,
            "volume" => VisualizationKind::Volume,
            "ohlc" => VisualizationKind::Ohlc,
            _ => VisualizationKind::Custom(s.trim().to_string()),
        };
        Ok(kind)
    }
}

impl From<VisualizationKind> for String {
    fn from(kind: VisualizationKind) -> Self {
        kind.as_str().to_string()
    }
}

impl TryFrom<String> for VisualizationKind {
    type Error = String;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

// ============================================================================
// Visualization Config
// ============================================================================

/// One visualization request: what to draw, from which dataset, and how
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct VisualizationConfig {
    #[serde(rename = "type")]
    pub kind: VisualizationKind,
    /// Dataset name the rows come from
    pub data_source: String,
    #[serde(default = "default_title")]
    pub title: String,
    #[serde(default)]
    pub description: String,

    // Column bindings
    #[serde(default)]
    pub x_column: Option<String>,
    #[serde(default)]
    pub y_column: Option<String>,
    #[serde(default)]
    pub color_column: Option<String>,
    #[serde(default)]
    pub size_column: Option<String>,

    // Styling
    #[serde(default = "default_width")]
    pub width: u32,
    #[serde(default = "default_height")]
    pub height: u32,
    #[serde(default = "default_color_scheme")]
    pub color_scheme: String,
    #[serde(default = "default_theme")]
    pub theme: String,

    // Interactivity
    #[serde(default = "default_true")]
    pub interactive: bool,
    #[serde(default = "default_true")]
    pub zoom_enabled: bool,
    #[serde(default = "default_true")]
    pub pan_enabled: bool,

    // Geospatial
    #[serde(default)]
    pub center_lat: Option<f64>,
    #[serde(default)]
    pub center_lng: Option<f64>,
    #[serde(default = "default_zoom_level")]
    pub zoom_level: u32,
    #[serde(default)]
    pub pitch: f64,
    #[serde(default)]
    pub bearing: f64,

    /// Kind-specific overrides merged into the render output
    #[serde(default)]
    pub custom_config: Map<String, serde_json::Value>,
}

fn default_title() -> String {
    "Untitled Visualization".to_string()
}
fn default_width() -> u32 {
    DEFAULT_WIDTH
}
fn default_height() -> u32 {
    DEFAULT_HEIGHT
}
fn default_color_scheme() -> String {
    "viridis".to_string()
}
fn default_theme() -> String {
    "modern".to_string()
}
fn default_true() -> bool {
    true
}
fn default_zoom_level() -> u32 {
    DEFAULT_ZOOM_LEVEL
}

impl VisualizationConfig {
    pub fn new(kind: VisualizationKind, data_source: impl Into<String>) -> Self {
        Self {
            kind,
            data_source: data_source.into(),
            title: default_title(),
            description: String::new(),
            x_column: None,
            y_column: None,
            color_column: None,
            size_column: None,
            width: DEFAULT_WIDTH,
            height: DEFAULT_HEIGHT,
            color_scheme: default_color_scheme(),
            theme: default_theme(),
            interactive: true,
            zoom_enabled: true,
            pan_enabled: true,
            center_lat: None,
            center_lng: None,
            zoom_level: DEFAULT_ZOOM_LEVEL,
            pitch: 0.0,
            bearing: 0.0,
            custom_config: Map::new(),
        }
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_x(mut self, column: impl Into<String>) -> Self {
        self.x_column = Some(column.into());
        self
    }

    pub fn with_y(mut self, column: impl Into<String>) -> Self {
        self.y_column = Some(column.into());
        self
    }

    pub fn with_color(mut self, column: impl Into<String>) -> Self {
        self.color_column = Some(column.into());
        self
    }

    pub fn with_size_column(mut self, column: impl Into<String>) -> Self {
        self.size_column = Some(column.into());
        self
    }

    pub fn with_dimensions(mut self, width: u32, height: u32) -> Self {
        self.width = width;
        self.height = height;
        self
    }

    pub fn with_theme(mut self, theme: impl Into<String>) -> Self {
        self.theme = theme.into();
        self
    }

    pub fn with_color_scheme(mut self, scheme: impl Into<String>) -> Self {
        self.color_scheme = scheme.into();
        self
    }

    pub fn with_center(mut self, lat: f64, lng: f64) -> Self {
        self.center_lat = Some(lat);
        self.center_lng = Some(lng);
        self
    }

    pub fn with_view(mut self, zoom_level: u32, pitch: f64, bearing: f64) -> Self {
        self.zoom_level = zoom_level;
        self.pitch = pitch;
        self.bearing = bearing;
        self
    }

    /// Add one kind-specific override
    pub fn with_override(mut self, key: impl Into<String>, value: serde_json::Value) -> Self {
        self.custom_config.insert(key.into(), value);
        self
    }

    /// Bound x/y columns, in that order
    pub fn required_columns(&self) -> Vec<&str> {
        [&self.x_column, &self.y_column]
            .into_iter()
            .flatten()
            .map(String::as_str)
            .collect()
    }
}
