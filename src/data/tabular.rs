//! Typed tabular formats (parquet, xlsx, xls).
//!
//! These formats already carry typed values, so rows produced here are
//! never re-coerced.

use crate::data::error::{DataError, DataResult};
use crate::types::{Row, Value};
use calamine::{open_workbook_auto, Data, Reader};
use polars::prelude::*;
use std::path::Path;

/// Reads a typed tabular file into row records
pub trait TabularEngine: Send + Sync {
    fn read(&self, path: &Path) -> DataResult<Vec<Row>>;
}

/// Default engine: parquet through polars, spreadsheets through calamine
#[derive(Clone, Copy, Debug, Default)]
pub struct PolarsEngine;

impl TabularEngine for PolarsEngine {
    fn read(&self, path: &Path) -> DataResult<Vec<Row>> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_lowercase())
            .unwrap_or_default();

        match ext.as_str() {
            "parquet" => read_parquet(path),
            "xlsx" | "xls" => read_workbook(path),
            other => Err(DataError::Format(format!(
                "No tabular reader for extension '{}'",
                other
            ))),
        }
    }
}

fn read_parquet(path: &Path) -> DataResult<Vec<Row>> {
    let file = std::fs::File::open(path)?;
    let df = ParquetReader::new(file).finish()?;
    Ok(frame_to_rows(&df))
}

/// Convert every row of a polars DataFrame
fn frame_to_rows(df: &DataFrame) -> Vec<Row> {
    let columns = df.get_columns();
    (0..df.height())
        .map(|row_idx| {
            columns
                .iter()
                .map(|column| (column.name().to_string(), polars_value(column, row_idx)))
                .collect()
        })
        .collect()
}

/// Convert a polars cell value to a Value
fn polars_value(column: &Column, row_idx: usize) -> Value {
    let Ok(val) = column.get(row_idx) else {
        return Value::Null;
    };
    match val {
        AnyValue::Null => Value::Null,
        AnyValue::Boolean(v) => Value::Bool(v),
        AnyValue::Int8(v) => Value::Int(v as i64),
        AnyValue::Int16(v) => Value::Int(v as i64),
        AnyValue::Int32(v) => Value::Int(v as i64),
        AnyValue::Int64(v) => Value::Int(v),
        AnyValue::UInt8(v) => Value::Int(v as i64),
        AnyValue::UInt16(v) => Value::Int(v as i64),
        AnyValue::UInt32(v) => Value::Int(v as i64),
        AnyValue::UInt64(v) => i64::try_from(v)
            .map(Value::Int)
            .unwrap_or(Value::Float(v as f64)),
        AnyValue::Float32(v) => Value::Float(v as f64),
        AnyValue::Float64(v) => Value::Float(v),
        AnyValue::String(s) => Value::Text(s.to_string()),
        AnyValue::StringOwned(s) => Value::Text(s.to_string()),
        other => Value::Text(other.to_string()),
    }
}

/// Read the first worksheet; its first row holds the column names
fn read_workbook(path: &Path) -> DataResult<Vec<Row>> {
    let mut workbook = open_workbook_auto(path)?;
    let sheet = workbook
        .sheet_names()
        .first()
        .cloned()
        .ok_or_else(|| DataError::Format("Workbook has no sheets".to_string()))?;
    let range = workbook.worksheet_range(&sheet)?;

    let mut rows_iter = range.rows();
    let Some(header) = rows_iter.next() else {
        return Ok(Vec::new());
    };
    let headers: Vec<String> = header.iter().map(|c| c.to_string()).collect();

    Ok(rows_iter
        .map(|cells| {
            headers
                .iter()
                .enumerate()
                .map(|(i, name)| {
                    let value = cells.get(i).map(sheet_value).unwrap_or(Value::Null);
                    (name.clone(), value)
                })
                .collect()
        })
        .collect())
}

fn sheet_value(cell: &Data) -> Value {
    match cell {
        Data::Empty => Value::Null,
        Data::Bool(b) => Value::Bool(*b),
        Data::Int(i) => Value::Int(*i),
        Data::Float(f) => Value::Float(*f),
        Data::String(s) => Value::Text(s.clone()),
        Data::DateTime(dt) => dt
            .as_datetime()
            .map(Value::DateTime)
            .unwrap_or(Value::Float(dt.as_f64())),
        other => Value::Text(other.to_string()),
    }
}
