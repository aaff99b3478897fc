//! Format loader tests: dispatch, encodings, fallbacks and limits

use crate::helpers::{cell, DataDir};
use std::path::Path;
use std::sync::Arc;
use vizora::config::VizoraConfig;
use vizora::data::{DataError, DataResult, FormatLoader, SourceFormat, TabularEngine};
use vizora::types::{row, Row, Value};

fn loader(dir: &DataDir) -> FormatLoader {
    FormatLoader::new(&dir.config())
}

// ============================================================================
// CSV
// ============================================================================

#[test]
fn test_csv_rows_are_coerced() {
    let dir = DataDir::new();
    let path = dir.write("pairs.csv", "a,b\n10,20\n30,40\n");

    let loaded = loader(&dir).load(&path).unwrap();
    assert_eq!(loaded.format, SourceFormat::Csv);
    assert_eq!(
        loaded.rows,
        vec![
            row([("a", 10i64), ("b", 20i64)]),
            row([("a", 30i64), ("b", 40i64)]),
        ]
    );
}

#[test]
fn test_csv_digits_one_and_zero_are_booleans() {
    let dir = DataDir::new();
    let path = dir.write("pairs.csv", "a,b\n1,2\n3,4\n");

    let rows = loader(&dir).load(&path).unwrap().rows;
    assert_eq!(rows[0], row([("a", Value::Bool(true)), ("b", Value::Int(2))]));
    assert_eq!(rows[1], row([("a", 3i64), ("b", 4i64)]));
}

#[test]
fn test_csv_semicolon_delimiter_is_sniffed() {
    let dir = DataDir::new();
    let path = dir.write("eu.csv", "city;share\nLyon;12,5%\nNice;40%\n");

    let rows = loader(&dir).load(&path).unwrap().rows;
    assert_eq!(rows.len(), 2);
    assert_eq!(cell(&rows[0], "city"), &Value::Text("Lyon".into()));
    assert_eq!(cell(&rows[1], "share"), &Value::Float(0.4));
}

#[test]
fn test_csv_with_bom_has_clean_header() {
    let dir = DataDir::new();
    let path = dir.write("bom.csv", b"\xEF\xBB\xBFname,score\nAda,97\n");

    let rows = loader(&dir).load(&path).unwrap().rows;
    assert_eq!(rows[0].keys().next().map(String::as_str), Some("name"));
    assert_eq!(cell(&rows[0], "score"), &Value::Int(97));
}

#[test]
fn test_csv_latin1_fallback() {
    let dir = DataDir::new();
    // "Zürich" in Latin-1 is not valid UTF-8
    let path = dir.write("cities.csv", b"city,pop\nZ\xFCrich,421878\n");

    let rows = loader(&dir).load(&path).unwrap().rows;
    assert_eq!(cell(&rows[0], "city"), &Value::Text("Zürich".into()));
    assert_eq!(cell(&rows[0], "pop"), &Value::Int(421_878));
}

#[test]
fn test_csv_short_records_fill_nulls() {
    let dir = DataDir::new();
    let path = dir.write("ragged.csv", "a,b,c\n5,6\n7,8,9\n");

    let rows = loader(&dir).load(&path).unwrap().rows;
    assert_eq!(cell(&rows[0], "c"), &Value::Null);
    assert_eq!(cell(&rows[1], "c"), &Value::Int(9));
}

#[test]
fn test_csv_without_records_is_format_error() {
    let dir = DataDir::new();
    let path = dir.write("empty.csv", "a,b\n");

    let err = loader(&dir).load(&path).unwrap_err();
    assert!(matches!(err, DataError::Format(_)), "got {:?}", err);
}

// ============================================================================
// JSON
// ============================================================================

#[test]
fn test_json_array_matches_csv_shape() {
    let dir = DataDir::new();
    let json = dir.write("points.json", r#"[{"x": 10}, {"x": 20}]"#);
    let csv = dir.write("points.csv", "x\n10\n20\n");

    let from_json = loader(&dir).load(&json).unwrap().rows;
    let from_csv = loader(&dir).load(&csv).unwrap().rows;
    assert_eq!(from_json, from_csv);
    assert_eq!(from_json, vec![row([("x", 10i64)]), row([("x", 20i64)])]);
}

#[test]
fn test_json_string_fields_are_coerced() {
    let dir = DataDir::new();
    let path = dir.write("mixed.json", r#"[{"pct": "25%", "when": "2024-01-03", "ok": "yes"}]"#);

    let rows = loader(&dir).load(&path).unwrap().rows;
    assert_eq!(cell(&rows[0], "pct"), &Value::Float(0.25));
    assert!(matches!(cell(&rows[0], "when"), Value::DateTime(_)));
    assert_eq!(cell(&rows[0], "ok"), &Value::Bool(true));
}

#[test]
fn test_json_single_object_and_scalars() {
    let dir = DataDir::new();
    let object = dir.write("one.json", r#"{"name": "solo", "n": 3}"#);
    let scalar = dir.write("scalar.json", "42");
    let array = dir.write("values.json", r#"[1.5, "x"]"#);

    let rows = loader(&dir).load(&object).unwrap().rows;
    assert_eq!(rows, vec![row([("name", Value::from("solo")), ("n", Value::Int(3))])]);

    let rows = loader(&dir).load(&scalar).unwrap().rows;
    assert_eq!(rows, vec![row([("value", 42i64)])]);

    let rows = loader(&dir).load(&array).unwrap().rows;
    assert_eq!(rows, vec![row([("value", 1.5)]), row([("value", "x")])]);
}

#[test]
fn test_invalid_json_is_format_error() {
    let dir = DataDir::new();
    let path = dir.write("broken.json", "[{\"a\": 1,");

    assert!(matches!(loader(&dir).load(&path), Err(DataError::Format(_))));
}

// ============================================================================
// Flexible fallback
// ============================================================================

#[test]
fn test_flexible_uses_first_multi_column_delimiter() {
    let dir = DataDir::new();
    let path = dir.write("export.dat", "id|label\n7|seven\n8|eight\n");

    let loaded = loader(&dir).load(&path).unwrap();
    assert_eq!(loaded.format, SourceFormat::Flexible);
    assert_eq!(loaded.rows[1], row([("id", Value::Int(8)), ("label", Value::from("eight"))]));
}

#[test]
fn test_flexible_falls_back_to_value_lines() {
    let dir = DataDir::new();
    let path = dir.write("notes.txt", "first line\n\n  second line  \n");

    let rows = loader(&dir).load(&path).unwrap().rows;
    assert_eq!(
        rows,
        vec![
            row([("value", "first line")]),
            row([("value", "second line")]),
        ]
    );
}

// ============================================================================
// Resolution and limits
// ============================================================================

#[test]
fn test_missing_file_is_not_found() {
    let dir = DataDir::new();
    let err = loader(&dir).load(&dir.path().join("nope.csv")).unwrap_err();

    assert!(err.is_not_found());
    assert!(err.to_string().contains("nope.csv"));
}

#[test]
fn test_relative_path_falls_back_to_data_directory() {
    let dir = DataDir::new();
    dir.write("fallback.csv", "k\n5\n");

    let loaded = loader(&dir).load("elsewhere/fallback.csv".as_ref()).unwrap();
    assert_eq!(loaded.path, dir.path().join("fallback.csv"));
    assert_eq!(loaded.rows, vec![row([("k", 5i64)])]);
}

#[test]
fn test_size_limit_checked_before_parsing() {
    let dir = DataDir::new();
    // Invalid content: the size check must fire first
    let path = dir.write("big.json", vec![b'{'; 2 * 1024 * 1024]);
    let config = VizoraConfig {
        max_size_mb: 1,
        ..dir.config()
    };

    let err = FormatLoader::new(&config).load(&path).unwrap_err();
    match err {
        DataError::TooLarge { size_bytes, max_bytes } => {
            assert_eq!(size_bytes, 2 * 1024 * 1024);
            assert_eq!(max_bytes, 1024 * 1024);
        }
        other => panic!("expected TooLarge, got {:?}", other),
    }
}

#[test]
fn test_loaded_file_carries_stat() {
    let dir = DataDir::new();
    let path = dir.write("stat.csv", "a\n5\n");

    let loaded = loader(&dir).load(&path).unwrap();
    assert_eq!(loaded.size_bytes, 4);
    assert!(loaded.modified <= chrono::Utc::now());
}

// ============================================================================
// Tabular collaborator
// ============================================================================

struct FixedEngine;

impl TabularEngine for FixedEngine {
    fn read(&self, _path: &Path) -> DataResult<Vec<Row>> {
        // Typed values pass through untouched, even text that looks numeric
        Ok(vec![row([("code", "007"), ("flag", "yes")])])
    }
}

#[test]
fn test_tabular_rows_are_not_recoerced() {
    let dir = DataDir::new();
    let path = dir.write("book.xlsx", b"not really a workbook");

    let loaded = loader(&dir)
        .with_engine(Arc::new(FixedEngine))
        .load(&path)
        .unwrap();
    assert_eq!(loaded.format, SourceFormat::Tabular);
    assert_eq!(cell(&loaded.rows[0], "code"), &Value::Text("007".into()));
    assert_eq!(cell(&loaded.rows[0], "flag"), &Value::Text("yes".into()));
}

#[test]
fn test_corrupt_workbook_is_format_error() {
    let dir = DataDir::new();
    let path = dir.write("book.xlsx", b"not really a workbook");

    assert!(matches!(loader(&dir).load(&path), Err(DataError::Format(_))));
}
