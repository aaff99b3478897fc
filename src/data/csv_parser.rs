//! CSV and delimited-text parsing
//!
//! Decodes raw bytes through a fixed list of encodings, sniffs the delimiter
//! from a leading sample and coerces every field.
//!
//! ## Encodings
//!
//! Tried in order: UTF-8, UTF-8 with BOM, Latin-1, CP1252. A file that
//! starts with a byte-order mark is left to the BOM-aware attempt so the
//! mark never leaks into the first header.

use crate::constants::{FLEXIBLE_DELIMITERS, SNIFF_DELIMITERS, VALUE_COLUMN};
use crate::data::coerce::coerce;
use crate::data::error::{DataError, DataResult};
use crate::types::{Row, Value};
use encoding_rs::WINDOWS_1252;

const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

/// Text encodings attempted for `.csv` files
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TextEncoding {
    Utf8,
    Utf8Bom,
    Latin1,
    Cp1252,
}

impl TextEncoding {
    /// Attempt order for CSV decoding
    pub const ORDER: [TextEncoding; 4] = [
        TextEncoding::Utf8,
        TextEncoding::Utf8Bom,
        TextEncoding::Latin1,
        TextEncoding::Cp1252,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            TextEncoding::Utf8 => "utf-8",
            TextEncoding::Utf8Bom => "utf-8-sig",
            TextEncoding::Latin1 => "latin-1",
            TextEncoding::Cp1252 => "cp1252",
        }
    }

    /// Decode bytes, or `None` when they are not valid in this encoding
    pub fn decode(&self, bytes: &[u8]) -> Option<String> {
        match self {
            TextEncoding::Utf8 => {
                if bytes.starts_with(UTF8_BOM) {
                    return None;
                }
                std::str::from_utf8(bytes).ok().map(str::to_string)
            }
            TextEncoding::Utf8Bom => {
                let body = bytes.strip_prefix(UTF8_BOM).unwrap_or(bytes);
                std::str::from_utf8(body).ok().map(str::to_string)
            }
            // Every byte maps to the code point of the same value
            TextEncoding::Latin1 => Some(bytes.iter().map(|&b| b as char).collect()),
            TextEncoding::Cp1252 => WINDOWS_1252
                .decode_without_bom_handling_and_without_replacement(bytes)
                .map(|s| s.into_owned()),
        }
    }
}

/// Parse a `.csv` file's bytes into coerced rows.
///
/// The first encoding that decodes wins. Decode failures move on to the
/// next encoding; other parse failures do too, except on the last attempt
/// where they propagate. A file with no data rows is a format error.
pub fn parse_csv_bytes(bytes: &[u8], sniff_bytes: usize) -> DataResult<Vec<Row>> {
    let last = TextEncoding::ORDER.len() - 1;

    for (i, encoding) in TextEncoding::ORDER.iter().enumerate() {
        let Some(content) = encoding.decode(bytes) else {
            tracing::debug!("CSV does not decode as {}", encoding.name());
            continue;
        };

        let delimiter = sniff_delimiter(&content, sniff_bytes);
        match parse_csv_content(&content, delimiter) {
            Ok(rows) if rows.is_empty() => break,
            Ok(rows) => {
                tracing::debug!(
                    "Parsed CSV as {} with delimiter {:?}: {} rows",
                    encoding.name(),
                    delimiter as char,
                    rows.len()
                );
                return Ok(rows);
            }
            Err(e) if i == last => return Err(e),
            Err(e) => {
                tracing::debug!("CSV parse failed as {}: {}", encoding.name(), e);
                continue;
            }
        }
    }

    Err(DataError::Format(
        "Could not load CSV file with any supported encoding".to_string(),
    ))
}

/// Parse CSV content with a known delimiter.
///
/// The first record is the header. Short records leave missing columns
/// null; surplus fields are dropped.
pub fn parse_csv_content(content: &str, delimiter: u8) -> DataResult<Vec<Row>> {
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(delimiter)
        .flexible(true)
        .from_reader(content.as_bytes());

    let headers: Vec<String> = reader
        .headers()?
        .iter()
        .map(|h| h.trim().to_string())
        .collect();

    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record?;
        let row: Row = headers
            .iter()
            .enumerate()
            .map(|(i, name)| {
                let value = record.get(i).map(coerce).unwrap_or(Value::Null);
                (name.clone(), value)
            })
            .collect();
        rows.push(row);
    }

    Ok(rows)
}

/// Parse text whose format is unknown.
///
/// Tries each of [`FLEXIBLE_DELIMITERS`] and keeps the first that yields rows
/// with more than one column. Otherwise every non-blank line becomes a
/// single `value` row holding the trimmed line.
pub fn parse_flexible_bytes(bytes: &[u8]) -> DataResult<Vec<Row>> {
    let content = std::str::from_utf8(bytes)
        .map_err(|e| DataError::Format(format!("File is not valid UTF-8: {}", e)))?;

    for delimiter in FLEXIBLE_DELIMITERS {
        match parse_csv_content(content, delimiter) {
            Ok(rows) if rows.first().is_some_and(|r| r.len() > 1) => {
                tracing::debug!("Flexible parse accepted delimiter {:?}", delimiter as char);
                return Ok(rows);
            }
            Ok(_) => continue,
            Err(e) => {
                tracing::debug!("Flexible parse with {:?} failed: {}", delimiter as char, e);
                continue;
            }
        }
    }

    Ok(content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(|line| Row::from([(VALUE_COLUMN.to_string(), Value::Text(line.to_string()))]))
        .collect())
}

/// Detect the delimiter from the first `sample_bytes` characters.
///
/// A candidate must appear on the first sample line; among those, the one
/// whose per-line count is most consistent wins, ties going to the earlier
/// entry of [`SNIFF_DELIMITERS`]. Falls back to a comma.
pub fn sniff_delimiter(content: &str, sample_bytes: usize) -> u8 {
    let sample: String = content.chars().take(sample_bytes).collect();
    let truncated = content.chars().nth(sample_bytes).is_some();

    let mut lines: Vec<&str> = sample.lines().filter(|l| !l.trim().is_empty()).collect();
    // A cut-off trailing line would skew the counts
    if truncated && lines.len() > 1 {
        lines.pop();
    }
    if lines.is_empty() {
        return b',';
    }

    let mut best: Option<(u8, f64)> = None;
    for &candidate in &SNIFF_DELIMITERS {
        let counts: Vec<usize> = lines
            .iter()
            .map(|line| count_unquoted(line, candidate as char))
            .collect();

        if counts[0] == 0 {
            continue;
        }

        let consistency =
            counts.iter().filter(|&&c| c == counts[0]).count() as f64 / counts.len() as f64;

        if best.is_none_or(|(_, score)| consistency > score) {
            best = Some((candidate, consistency));
        }
    }

    best.map(|(d, _)| d).unwrap_or(b',')
}

/// Count delimiter occurrences outside double-quoted sections
fn count_unquoted(line: &str, delimiter: char) -> usize {
    let mut in_quotes = false;
    let mut count = 0;
    for c in line.chars() {
        if c == '"' {
            in_quotes = !in_quotes;
        } else if c == delimiter && !in_quotes {
            count += 1;
        }
    }
    count
}
