//! Visualization engine tests: validation rules, registration and payloads

use serde_json::json;
use std::sync::Arc;
use vizora::types::{row, Row, Value};
use vizora::viz::{
    VisualizationConfig, VisualizationEngine, VisualizationHandler, VisualizationKind, VizError,
    VizResult,
};

fn config(kind: VisualizationKind) -> VisualizationConfig {
    VisualizationConfig::new(kind, "test")
}

// ============================================================================
// Built-in validation
// ============================================================================

#[test]
fn test_map_requires_lat_and_lng_aliases() {
    let engine = VisualizationEngine::new();
    let map = config(VisualizationKind::Map);

    let err = engine
        .create_visualization(&map, &[row([("foo", 1i64)])])
        .unwrap_err();
    assert!(matches!(err, VizError::Validation(_)), "got {:?}", err);

    let spec = engine
        .create_visualization(&map, &[row([("lat", 1i64), ("lng", 2i64)])])
        .unwrap();
    assert_eq!(spec.kind, VisualizationKind::Map);
    assert_eq!(spec.payload["type"], json!("map"));
}

#[test]
fn test_map_accepts_every_alias_pair() {
    let engine = VisualizationEngine::new();
    let map = config(VisualizationKind::Map);

    for lat in ["lat", "latitude", "y"] {
        for lng in ["lng", "longitude", "lon", "x"] {
            let rows = [row([(lat, 35.0), (lng, 139.0)])];
            assert!(
                engine.create_visualization(&map, &rows).is_ok(),
                "{} / {}",
                lat,
                lng
            );
        }
    }
}

#[test]
fn test_empty_rows_fail_for_every_builtin() {
    let engine = VisualizationEngine::new();
    for kind in [
        VisualizationKind::Bar,
        VisualizationKind::Map,
        VisualizationKind::DeckglOverlay,
        VisualizationKind::ArcLayer,
        VisualizationKind::ScatterplotLayer,
    ] {
        let err = engine.create_visualization(&config(kind.clone()), &[]).unwrap_err();
        assert!(matches!(err, VizError::Validation(_)), "{}: {:?}", kind, err);
    }
}

#[test]
fn test_bar_checks_bound_columns_on_first_row() {
    let engine = VisualizationEngine::new();
    let bar = config(VisualizationKind::Bar).with_x("month").with_y("revenue");

    let ok = [row([("month", Value::from("Jan")), ("revenue", Value::Int(5))])];
    assert!(engine.create_visualization(&bar, &ok).is_ok());

    let missing = [row([("month", "Jan")])];
    let err = engine.create_visualization(&bar, &missing).unwrap_err();
    assert!(err.to_string().contains("'revenue'"));
}

#[test]
fn test_arc_layer_needs_source_and_target_but_overlay_does_not() {
    let engine = VisualizationEngine::new();
    let rows = [row([("from", "HND"), ("to", "KIX")])];

    assert!(engine
        .create_visualization(&config(VisualizationKind::ArcLayer), &rows)
        .is_err());
    assert!(engine
        .create_visualization(&config(VisualizationKind::DeckglOverlay), &rows)
        .is_ok());
    assert!(engine
        .create_visualization(&config(VisualizationKind::ScatterplotLayer), &rows)
        .is_ok());
}

// ============================================================================
// Render payloads
// ============================================================================

#[test]
fn test_bar_color_encoding_is_optional() {
    let engine = VisualizationEngine::new();
    let rows = [row([("k", "a"), ("v", "b")])];
    let bar = config(VisualizationKind::Bar).with_x("k").with_y("v");

    let spec = engine.create_visualization(&bar, &rows).unwrap();
    assert_eq!(spec.payload["encoding"]["color"], json!(null));

    let spec = engine
        .create_visualization(&bar.clone().with_color("v"), &rows)
        .unwrap();
    assert_eq!(spec.payload["encoding"]["color"], json!({ "field": "v" }));
}

#[test]
fn test_deckgl_defaults_differ_from_map_defaults() {
    let engine = VisualizationEngine::new();
    let rows = [row([("lat", 1i64), ("lng", 2i64)])];

    let map = engine
        .create_visualization(&config(VisualizationKind::Map), &rows)
        .unwrap();
    assert_eq!(map.payload["center"], json!([0.0, 0.0]));
    assert_eq!(map.payload["pitch"], json!(0.0));

    let deck = engine
        .create_visualization(&config(VisualizationKind::DeckglOverlay), &rows)
        .unwrap();
    let view = &deck.payload["initialViewState"];
    assert_eq!(view["longitude"], json!(139.7672));
    assert_eq!(view["latitude"], json!(35.6812));
    assert_eq!(view["pitch"], json!(60.0));
    assert_eq!(view["bearing"], json!(-45.0));
    assert_eq!(deck.payload["layers"], json!([]));
}

#[test]
fn test_deckgl_explicit_view_is_kept() {
    let engine = VisualizationEngine::new();
    let viz = config(VisualizationKind::ScatterplotLayer)
        .with_center(51.5, -0.12)
        .with_view(12, 30.0, 15.0);

    let spec = engine
        .create_visualization(&viz, &[row([("position", "[-0.12,51.5]")])])
        .unwrap();
    let view = &spec.payload["initialViewState"];
    assert_eq!(view["longitude"], json!(-0.12));
    assert_eq!(view["latitude"], json!(51.5));
    assert_eq!(view["zoom"], json!(12));
    assert_eq!(view["pitch"], json!(30.0));
    assert_eq!(view["bearing"], json!(15.0));
    assert_eq!(spec.payload["layers"][0]["type"], json!("ScatterplotLayer"));
}

#[test]
fn test_override_bag_is_merged_last() {
    let engine = VisualizationEngine::new();
    let viz = config(VisualizationKind::ArcLayer)
        .with_override("title", json!("Overridden"))
        .with_override("extruded", json!(true));

    let spec = engine
        .create_visualization(&viz, &[row([("source", "A"), ("target", "B")])])
        .unwrap();
    assert_eq!(spec.payload["title"], json!("Overridden"));
    assert_eq!(spec.payload["extruded"], json!(true));
    assert_eq!(spec.payload["layers"][0]["id"], json!("arc-layer"));
}

#[test]
fn test_render_does_not_touch_rows() {
    let engine = VisualizationEngine::new();
    let rows = vec![row([("lat", Value::Float(1.5)), ("lng", Value::Null)])];
    let before = rows.clone();

    engine
        .create_visualization(&config(VisualizationKind::Map), &rows)
        .unwrap();
    assert_eq!(rows, before);
}

// ============================================================================
// Registration
// ============================================================================

#[test]
fn test_unsupported_kind_names_the_kind() {
    let engine = VisualizationEngine::new();
    let err = engine
        .create_visualization(&config(VisualizationKind::Candlestick), &[row([("a", 1i64)])])
        .unwrap_err();

    assert!(matches!(err, VizError::UnsupportedType(ref k) if k == "candlestick"));
    assert!(err.to_string().contains("candlestick"));
}

struct Sankey;

impl VisualizationHandler for Sankey {
    fn validate(&self, rows: &[Row], _config: &VisualizationConfig) -> VizResult<()> {
        if rows.iter().all(|r| r.contains_key("flow")) {
            Ok(())
        } else {
            Err(VizError::Validation("every row needs a flow".into()))
        }
    }

    fn render(&self, rows: &[Row], config: &VisualizationConfig) -> VizResult<serde_json::Value> {
        Ok(json!({ "type": config.kind, "links": rows.len() }))
    }

    fn describe(&self) -> &str {
        "Flow diagram"
    }
}

#[test]
fn test_custom_kind_registration() {
    let engine = VisualizationEngine::new();
    let kind: VisualizationKind = "sankey".parse().unwrap();
    assert!(!engine.is_supported(&kind));

    engine.register(kind.clone(), Arc::new(Sankey));
    assert!(engine.supported_types().ends_with(&["sankey".to_string()]));

    let viz = VisualizationConfig::new(kind.clone(), "flows");
    let spec = engine
        .create_visualization(&viz, &[row([("flow", 3i64)]), row([("flow", 4i64)])])
        .unwrap();
    assert_eq!(spec.payload, json!({ "type": "sankey", "links": 2 }));

    let err = engine
        .create_visualization(&viz, &[row([("other", 1i64)])])
        .unwrap_err();
    assert!(matches!(err, VizError::Validation(_)));

    let info = engine.type_info(&kind).unwrap();
    assert_eq!(info.description, "Flow diagram");
    assert_eq!(info.category, "Other");
    assert!(!info.supports_3d);
}

#[test]
fn test_duplicate_registration_last_wins() {
    let engine = VisualizationEngine::new();
    engine.register_fn(
        VisualizationKind::Bar,
        "Replacement bar",
        |_, _| Ok(()),
        |rows, _| Ok(json!({ "replaced": rows.len() })),
    );

    let spec = engine
        .create_visualization(&config(VisualizationKind::Bar), &[])
        .unwrap();
    assert_eq!(spec.payload, json!({ "replaced": 0 }));
    // Replacing keeps the first registration slot
    assert_eq!(engine.supported_types()[0], "bar");
    assert_eq!(engine.supported_types().len(), 5);
}

#[test]
fn test_type_info_for_builtins() {
    let engine = VisualizationEngine::new();

    let bar = engine.type_info(&VisualizationKind::Bar).unwrap();
    assert_eq!(bar.category, "Basic Charts");
    assert!(bar.required_columns.is_empty());
    assert!(!bar.supports_3d);

    let overlay = engine.type_info(&VisualizationKind::DeckglOverlay).unwrap();
    assert!(overlay.supports_3d);
    assert_eq!(overlay.category, "3D Visualizations");

    let scatter = engine.type_info(&VisualizationKind::ScatterplotLayer).unwrap();
    assert!(!scatter.supports_3d);

    let map = engine.type_info(&VisualizationKind::Map).unwrap();
    assert_eq!(map.category, "Geospatial");
    assert_eq!(VisualizationKind::Volume.category(), "Financial");
    assert_eq!(VisualizationKind::Ohlc.category(), "Other");
}

#[test]
fn test_config_serializes_kind_as_type() {
    let viz = config(VisualizationKind::ArcLayer).with_title("Routes");
    let value = serde_json::to_value(&viz).unwrap();

    assert_eq!(value["type"], json!("arc_layer"));
    assert_eq!(value["title"], json!("Routes"));
    assert_eq!(value["zoom_level"], json!(10));

    let back: VisualizationConfig = serde_json::from_value(value).unwrap();
    assert_eq!(back, viz);
}
