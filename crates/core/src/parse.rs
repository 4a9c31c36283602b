//! CSV and JSON decoding into loosely typed rows.
//!
//! Rows come out as [`RawRecord`]s (JSON objects keyed by column name). They are
//! validated by [`crate::validation::validate_delivery_data`] and then turned
//! into typed [`DeliveryPoint`]s by [`into_delivery_points`]; nothing past that
//! boundary looks at raw rows.

use crate::error::{Error, ErrorCode, Result};
use crate::model::{DeliveryPoint, TEXT_FIELDS};
use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::{Map, Number, Value};
use tracing::debug;

/// One uploaded row before validation.
pub type RawRecord = Map<String, Value>;

static NUMERIC: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^-?(\d+\.?|\.\d+|\d+\.\d+)([eE][-+]?\d+)?$").expect("valid regex"));

static INTEGER: Lazy<Regex> = Lazy::new(|| Regex::new(r"^-?\d+$").expect("valid regex"));

/// Parse CSV text whose first row is the header.
///
/// Text columns ([`TEXT_FIELDS`]) keep the cell exactly as written, so ids like
/// `007` survive; other cells are typed opportunistically (see [`infer_value`]).
/// Blank and whitespace-only lines are skipped. The first other row whose width
/// differs from the header aborts parsing.
pub fn parse_csv(text: &str) -> Result<Vec<RawRecord>> {
    let text = text.trim_start_matches('\u{feff}');
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(text.as_bytes());

    let headers = reader.headers()?.clone();
    if headers.iter().all(str::is_empty) {
        return Err(Error::parse(ErrorCode::MalformedCsv, "CSV file has no header row"));
    }

    let mut records = Vec::new();
    for row in reader.records() {
        let row = row?;
        if row.iter().all(str::is_empty) {
            continue;
        }
        if row.len() != headers.len() {
            let line = row.position().map_or(0, csv::Position::line);
            return Err(Error::parse(
                ErrorCode::MalformedCsv,
                format!(
                    "CSV parse error: line {} has {} fields, but the header has {}",
                    line,
                    row.len(),
                    headers.len()
                ),
            ));
        }

        let record: RawRecord = headers
            .iter()
            .zip(row.iter())
            .filter(|(name, _)| !name.is_empty())
            .map(|(name, cell)| (name.to_string(), typed_cell(name, cell)))
            .collect();
        records.push(record);
    }

    debug!(rows = records.len(), columns = headers.len(), "Parsed CSV");
    Ok(records)
}

fn typed_cell(column: &str, cell: &str) -> Value {
    if !TEXT_FIELDS.contains(&column) {
        return infer_value(cell);
    }
    let cell = cell.trim();
    if cell.is_empty() {
        Value::Null
    } else {
        Value::String(cell.to_string())
    }
}

/// Parse a JSON payload: an array of objects, or a single object.
pub fn parse_json(text: &str) -> Result<Vec<RawRecord>> {
    let value: Value = serde_json::from_str(text.trim_start_matches('\u{feff}'))?;

    let records = match value {
        Value::Array(items) => items
            .into_iter()
            .enumerate()
            .map(|(i, item)| match item {
                Value::Object(map) => Ok(map),
                other => Err(Error::parse(
                    ErrorCode::UnexpectedShape,
                    format!("Element {} is {}, expected an object", i + 1, kind(&other)),
                )),
            })
            .collect::<Result<Vec<_>>>()?,
        Value::Object(map) => vec![map],
        other => {
            return Err(Error::parse(
                ErrorCode::UnexpectedShape,
                format!("JSON must be an array or an object, found {}", kind(&other)),
            ));
        }
    };

    debug!(rows = records.len(), "Parsed JSON");
    Ok(records)
}

/// Type a single CSV cell.
///
/// Empty cells become null, `true`/`false` become booleans, numeric-looking
/// text becomes a number, everything else stays a string.
pub fn infer_value(cell: &str) -> Value {
    let cell = cell.trim();
    if cell.is_empty() {
        return Value::Null;
    }
    if cell.eq_ignore_ascii_case("true") {
        return Value::Bool(true);
    }
    if cell.eq_ignore_ascii_case("false") {
        return Value::Bool(false);
    }
    if INTEGER.is_match(cell) {
        if let Ok(n) = cell.parse::<i64>() {
            return Value::Number(n.into());
        }
    }
    if NUMERIC.is_match(cell) {
        if let Some(n) = cell.parse::<f64>().ok().and_then(Number::from_f64) {
            return Value::Number(n);
        }
    }
    Value::String(cell.to_string())
}

/// Convert validated rows into typed delivery points.
pub fn into_delivery_points(records: Vec<RawRecord>) -> Result<Vec<DeliveryPoint>> {
    records
        .into_iter()
        .enumerate()
        .map(|(i, record)| {
            serde_json::from_value(Value::Object(record)).map_err(|e| {
                Error::parse(ErrorCode::UnexpectedShape, format!("Row {}: {}", i + 1, e))
            })
        })
        .collect()
}

fn kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
