//! Column statistics and dominant-type inference.

use crate::types::{Row, Value};
use indexmap::IndexMap;
use serde::Serialize;
use std::collections::HashSet;

static NULL_VALUE: Value = Value::Null;

/// Statistics for one column of a dataset.
///
/// Mixed-type columns only get the common counts.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ColumnStats {
    /// The column has no non-null values
    NoData,
    Numeric {
        count: usize,
        null_count: usize,
        data_type: String,
        min: f64,
        max: f64,
        mean: f64,
        unique_count: usize,
    },
    Text {
        count: usize,
        null_count: usize,
        data_type: String,
        unique_count: usize,
        avg_length: f64,
        most_common: String,
    },
    Mixed {
        count: usize,
        null_count: usize,
        data_type: String,
    },
}

impl ColumnStats {
    /// Non-null value count (zero for `NoData`)
    pub fn count(&self) -> usize {
        match self {
            ColumnStats::NoData => 0,
            ColumnStats::Numeric { count, .. }
            | ColumnStats::Text { count, .. }
            | ColumnStats::Mixed { count, .. } => *count,
        }
    }
}

/// Compute statistics for `column` over `rows`.
///
/// Rows without the column count as nulls. Booleans count as numbers
/// (true = 1, false = 0), since `"1"` and `"0"` coerce to booleans.
pub fn column_stats(rows: &[Row], column: &str) -> ColumnStats {
    let values: Vec<&Value> = rows
        .iter()
        .filter_map(|r| r.get(column))
        .filter(|v| !v.is_null())
        .collect();

    if values.is_empty() {
        return ColumnStats::NoData;
    }

    let count = values.len();
    let null_count = rows.len() - count;
    let data_type = dominant_type(values.iter().copied()).to_string();

    let numbers: Option<Vec<f64>> = values.iter().copied().map(numeric_value).collect();
    if let Some(numbers) = numbers {
        let min = numbers.iter().copied().fold(f64::INFINITY, f64::min);
        let max = numbers.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        let mean = numbers.iter().sum::<f64>() / count as f64;
        let unique_count = numbers
            .iter()
            // 0.0 and -0.0 are the same value
            .map(|n| if *n == 0.0 { 0u64 } else { n.to_bits() })
            .collect::<HashSet<_>>()
            .len();

        return ColumnStats::Numeric {
            count,
            null_count,
            data_type,
            min,
            max,
            mean,
            unique_count,
        };
    }

    let texts: Option<Vec<&str>> = values.iter().map(|v| v.as_str()).collect();
    if let Some(texts) = texts {
        let mut frequencies: IndexMap<&str, usize> = IndexMap::new();
        for &t in &texts {
            *frequencies.entry(t).or_default() += 1;
        }
        let avg_length =
            texts.iter().map(|t| t.chars().count()).sum::<usize>() as f64 / count as f64;

        return ColumnStats::Text {
            count,
            null_count,
            data_type,
            unique_count: frequencies.len(),
            avg_length,
            most_common: most_frequent(&frequencies).unwrap_or_default().to_string(),
        };
    }

    ColumnStats::Mixed {
        count,
        null_count,
        data_type,
    }
}

fn numeric_value(value: &Value) -> Option<f64> {
    match value {
        Value::Bool(b) => Some(if *b { 1.0 } else { 0.0 }),
        other => other.as_f64(),
    }
}

/// Most frequent type name; ties go to the type seen first
pub fn dominant_type<'a, I>(values: I) -> &'static str
where
    I: IntoIterator<Item = &'a Value>,
{
    let mut frequencies: IndexMap<&'static str, usize> = IndexMap::new();
    for v in values {
        *frequencies.entry(v.type_name()).or_default() += 1;
    }
    most_frequent(&frequencies).unwrap_or(Value::Null.type_name())
}

/// Dominant type per column over the first `sample_size` rows.
///
/// Columns come from the first row. A row missing a column contributes a
/// null observation.
pub fn infer_column_types(rows: &[Row], sample_size: usize) -> IndexMap<String, String> {
    let Some(first) = rows.first() else {
        return IndexMap::new();
    };
    let sample = &rows[..sample_size.min(rows.len())];

    first
        .keys()
        .map(|col| {
            let observed = sample
                .iter()
                .map(|row| row.get(col).unwrap_or(&NULL_VALUE));
            (col.clone(), dominant_type(observed).to_string())
        })
        .collect()
}

/// Key with the highest count, first inserted on ties
fn most_frequent<K: Copy>(frequencies: &IndexMap<K, usize>) -> Option<K> {
    let mut best: Option<(K, usize)> = None;
    for (&key, &n) in frequencies {
        if best.is_none_or(|(_, top)| n > top) {
            best = Some((key, n));
        }
    }
    best.map(|(k, _)| k)
}
