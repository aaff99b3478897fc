//! JSON data parsing
//!
//! Accepts an array of records, a single record, or any other JSON value.
//! String fields inside records are coerced like CSV fields; everything
//! else keeps its JSON type.

use crate::constants::VALUE_COLUMN;
use crate::data::coerce::coerce;
use crate::data::error::DataResult;
use crate::types::{Row, Value};
use serde_json::Map;

/// Parse JSON content from a string
///
/// - array: each object element becomes a coerced row, any other element
///   becomes `{value: element}`
/// - object: exactly one row
/// - anything else: one `{value: <raw>}` row
pub fn parse_json_content(json: &str) -> DataResult<Vec<Row>> {
    let value: serde_json::Value = serde_json::from_str(json)?;

    let rows = match &value {
        serde_json::Value::Array(items) => items
            .iter()
            .map(|item| match item {
                serde_json::Value::Object(obj) => object_to_row(obj),
                other => value_row(Value::from_json(other)),
            })
            .collect(),
        serde_json::Value::Object(obj) => vec![object_to_row(obj)],
        other => vec![value_row(Value::from_json(other))],
    };

    Ok(rows)
}

/// Convert one JSON object into a row, coercing string fields
fn object_to_row(obj: &Map<String, serde_json::Value>) -> Row {
    obj.iter()
        .map(|(key, value)| {
            let cell = match value {
                serde_json::Value::String(s) => coerce(s),
                other => Value::from_json(other),
            };
            (key.clone(), cell)
        })
        .collect()
}

fn value_row(value: Value) -> Row {
    Row::from([(VALUE_COLUMN.to_string(), value)])
}
