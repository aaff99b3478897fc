//! Dashboard Workflow Integration Tests

use crate::helpers::DataDir;
use serde_json::json;
use std::sync::Arc;
use vizora::types::Row;
use vizora::viz::{FnHandler, VisualizationConfig, VisualizationKind, VizError};

#[test]
fn test_csv_to_bar_chart_workflow() {
    let dir = DataDir::new();
    let dashboard = dir.dashboard();
    let path = dir.write("sales.csv", "month,revenue\nJan,1200\nFeb,1350\nMar,990\n");

    let name = dashboard.add_data_source(&path, None).unwrap();
    let id = dashboard.add_visualization(
        VisualizationConfig::new(VisualizationKind::Bar, &name)
            .with_x("month")
            .with_y("revenue"),
    );
    assert_eq!(id, "viz_0");

    let spec = dashboard.render(&id).unwrap();
    assert_eq!(spec.payload["data"].as_array().map(Vec::len), Some(3));
    assert_eq!(spec.payload["data"][2], json!({ "month": "Mar", "revenue": 990 }));
}

#[test]
fn test_json_to_map_workflow() {
    let dir = DataDir::new();
    let dashboard = dir.dashboard();
    dir.write(
        "stations.json",
        r#"[{"name": "Shibuya", "latitude": "35.658", "longitude": "139.7016"}]"#,
    );

    // Resolved through the data directory
    let name = dashboard
        .add_data_source("stations.json", Some("stations"))
        .unwrap();
    let id = dashboard.add_visualization(
        VisualizationConfig::new(VisualizationKind::Map, name).with_center(35.658, 139.7016),
    );

    let spec = dashboard.render(&id).unwrap();
    assert_eq!(spec.payload["center"], json!([139.7016, 35.658]));
    assert_eq!(spec.payload["data"][0]["latitude"], json!(35.658));
}

#[test]
fn test_render_all_reports_each_visualization() {
    let dir = DataDir::new();
    let dashboard = dir.dashboard();
    dashboard
        .add_data_source(dir.write("flights.csv", "source,target\nHND,KIX\n"), None)
        .unwrap();

    let arc = dashboard.add_visualization(VisualizationConfig::new(
        VisualizationKind::ArcLayer,
        "flights",
    ));
    let map = dashboard.add_visualization(VisualizationConfig::new(
        VisualizationKind::Map,
        "flights",
    ));
    let missing = dashboard.add_visualization(VisualizationConfig::new(
        VisualizationKind::Bar,
        "nowhere",
    ));

    let results = dashboard.render_all();
    assert_eq!(
        results.keys().collect::<Vec<_>>(),
        vec!["viz_0", "viz_1", "viz_2"]
    );
    assert!(results[&arc].is_ok());
    assert!(matches!(results[&map], Err(VizError::Validation(_))));
    match &results[&missing] {
        Err(VizError::Data(e)) => assert!(e.is_not_found()),
        other => panic!("expected missing dataset, got {:?}", other),
    }
}

#[test]
fn test_unknown_visualization_id() {
    let dir = DataDir::new();
    let err = dir.dashboard().render("viz_9").unwrap_err();
    assert!(matches!(err, VizError::UnknownVisualization(ref id) if id == "viz_9"));
}

#[test]
fn test_plugin_kind_through_dashboard() {
    let dir = DataDir::new();
    let dashboard = dir.dashboard();
    dashboard
        .add_data_source(dir.write("steps.csv", "step,count\nvisit,100\nsignup,20\n"), None)
        .unwrap();

    let funnel: VisualizationKind = "funnel".parse().unwrap();
    let id = dashboard.add_visualization(VisualizationConfig::new(funnel.clone(), "steps"));
    assert!(matches!(
        dashboard.render(&id),
        Err(VizError::UnsupportedType(ref k)) if k == "funnel"
    ));

    dashboard.register_visualization(
        funnel,
        Arc::new(FnHandler::new(
            "Conversion funnel",
            |_: &[Row], _: &VisualizationConfig| Ok(()),
            |rows: &[Row], _: &VisualizationConfig| Ok(json!({ "stages": rows.len() })),
        )),
    );
    assert_eq!(dashboard.render(&id).unwrap().payload, json!({ "stages": 2 }));
}

#[test]
fn test_dataset_payload_shape() {
    let dir = DataDir::new();
    let dashboard = dir.dashboard();
    let path = dir.write("metrics.csv", "day,value\n2024-01-03,5\n2024-01-04,7\n");
    dashboard.add_data_source(&path, None).unwrap();

    let payload = dashboard.dataset_payload("metrics").unwrap();
    assert_eq!(payload.count, 2);
    assert_eq!(payload.dataset, "metrics");
    assert_eq!(payload.data[0]["day"], json!("2024-01-03T00:00:00"));
    assert_eq!(
        payload.timestamp,
        dashboard.datasets().last_modified("metrics").unwrap()
    );

    let value = serde_json::to_value(&payload).unwrap();
    let keys: Vec<&String> = value.as_object().unwrap().keys().collect();
    assert_eq!(keys, vec!["data", "count", "dataset", "timestamp"]);

    assert!(dashboard.dataset_payload("other").unwrap_err().is_not_found());
}
