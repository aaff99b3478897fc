//! Crate-wide constants.
//!
//! Centralizes limits, heuristic knobs and renderer defaults so the
//! loaders and handlers stay free of magic numbers.

// ============================================================================
// Data Loading
// ============================================================================

/// Default maximum source file size in MB
pub const DEFAULT_MAX_SIZE_MB: u64 = 100;

/// Number of leading characters inspected when sniffing a CSV delimiter
pub const SNIFF_SAMPLE_BYTES: usize = 1024;

/// Delimiters considered by the sniffer, in preference order for ties
pub const SNIFF_DELIMITERS: [u8; 5] = [b',', b'\t', b';', b'|', b':'];

/// Delimiters tried in order for files with an unrecognized extension
pub const FLEXIBLE_DELIMITERS: [u8; 4] = [b',', b';', b'\t', b'|'];

/// Column name used for single-value rows
pub const VALUE_COLUMN: &str = "value";

/// Dataset name used when a path has no usable file stem
pub const FALLBACK_DATASET_NAME: &str = "data";

// ============================================================================
// Dataset Registry
// ============================================================================

/// Default number of cached dataset snapshots
pub const DEFAULT_CACHE_CAPACITY: usize = 32;

/// Default number of leading rows sampled for dominant column types
pub const DEFAULT_TYPE_SAMPLE_SIZE: usize = 10;

// ============================================================================
// Visualization Defaults
// ============================================================================

/// Default chart width in pixels
pub const DEFAULT_WIDTH: u32 = 800;

/// Default chart height in pixels
pub const DEFAULT_HEIGHT: u32 = 400;

/// Default zoom level for geospatial views
pub const DEFAULT_ZOOM_LEVEL: u32 = 10;

/// Latitude column aliases recognized by the map handler
pub const LATITUDE_ALIASES: [&str; 3] = ["lat", "latitude", "y"];

/// Longitude column aliases recognized by the map handler
pub const LONGITUDE_ALIASES: [&str; 4] = ["lng", "longitude", "lon", "x"];

/// Map point layer styling
pub const MAP_POINT_RADIUS: u32 = 8;
pub const MAP_POINT_COLOR: &str = "#667eea";
pub const MAP_POINT_STROKE_COLOR: &str = "#ffffff";
pub const MAP_POINT_STROKE_WIDTH: u32 = 2;

/// Deck.gl view center when none is configured (longitude, latitude)
pub const DECKGL_DEFAULT_CENTER: (f64, f64) = (139.7672, 35.6812);

/// Deck.gl pitch/bearing substituted for a zero setting
pub const DECKGL_DEFAULT_PITCH: f64 = 60.0;
pub const DECKGL_DEFAULT_BEARING: f64 = -45.0;

/// Deck.gl basemap style
pub const DECKGL_MAP_STYLE: &str =
    "https://basemaps.cartocdn.com/gl/voyager-gl-style/style.json";
