//! Best-effort conversion of raw text fields into typed values.
//!
//! Priority is fixed: boolean, percentage, number, date, then string.
//! Ambiguous dates resolve by the first matching entry in [`DATE_FORMATS`],
//! never by locale.

use crate::types::Value;
use chrono::{NaiveDate, NaiveDateTime, NaiveTime};

const TRUE_WORDS: [&str; 5] = ["true", "yes", "y", "1", "on"];
const FALSE_WORDS: [&str; 5] = ["false", "no", "n", "0", "off"];

/// Date layouts tried in order; the first successful parse wins
pub const DATE_FORMATS: [&str; 4] = ["%Y-%m-%d", "%m/%d/%Y", "%d/%m/%Y", "%Y-%m-%d %H:%M:%S"];

/// Coerce a raw field into the most plausible primitive value.
///
/// Never fails: anything unrecognized comes back as the trimmed string.
///
/// # Examples
/// - `"yes"` -> `Bool(true)`
/// - `"45.6%"` -> `Float(0.456)`
/// - `"1,234"` -> `Int(1234)`
/// - `"2024-01-03"` -> `DateTime(2024-01-03T00:00:00)`
/// - `"  "` -> `Null`
pub fn coerce(raw: &str) -> Value {
    let value = raw.trim();
    if value.is_empty() {
        return Value::Null;
    }

    if let Some(b) = parse_bool(value) {
        return Value::Bool(b);
    }

    if let Some(pct) = parse_percentage(value) {
        return Value::Float(pct);
    }

    if let Some(number) = parse_number(value) {
        return number;
    }

    if let Some(dt) = parse_date(value) {
        return Value::DateTime(dt);
    }

    Value::Text(value.to_string())
}

fn parse_bool(value: &str) -> Option<bool> {
    let lower = value.to_lowercase();
    if TRUE_WORDS.contains(&lower.as_str()) {
        Some(true)
    } else if FALSE_WORDS.contains(&lower.as_str()) {
        Some(false)
    } else {
        None
    }
}

/// `"45.6%"` -> `0.456`
fn parse_percentage(value: &str) -> Option<f64> {
    let number = value.strip_suffix('%')?;
    number.trim().parse::<f64>().ok().map(|n| n / 100.0)
}

/// Integers have no decimal point; anything with one is parsed as a float.
/// Thousands separators are stripped first.
fn parse_number(value: &str) -> Option<Value> {
    let cleaned = value.replace(',', "");
    if cleaned.contains('.') {
        return cleaned.parse::<f64>().ok().map(Value::Float);
    }

    if !looks_integral(&cleaned) {
        return None;
    }
    match cleaned.parse::<i64>() {
        Ok(i) => Some(Value::Int(i)),
        // Out of i64 range
        Err(_) => cleaned.parse::<f64>().ok().map(Value::Float),
    }
}

/// Optional sign followed by ASCII digits only
fn looks_integral(s: &str) -> bool {
    let digits = s.strip_prefix(['+', '-']).unwrap_or(s);
    !digits.is_empty() && digits.chars().all(|c| c.is_ascii_digit())
}

fn parse_date(value: &str) -> Option<NaiveDateTime> {
    if value.len() < 8 || !(value.contains('-') || value.contains('/')) {
        return None;
    }

    DATE_FORMATS.iter().find_map(|fmt| {
        if fmt.contains("%H") {
            NaiveDateTime::parse_from_str(value, fmt).ok()
        } else {
            NaiveDate::parse_from_str(value, fmt)
                .ok()
                .map(|d| d.and_time(NaiveTime::MIN))
        }
    })
}
