//! Helper functions for navigating portal payloads and converting values.
//!
//! This module provides utility functions for:
//! - Looking up keys in decoded JSON with structured errors
//! - Coercing numeric strings and numbers into `f64`/`i64`
//! - Parsing the date formats the portals use
//! - Date range normalization

use crate::error::ParseError;
use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use serde_json::Value;

/// Returns the value stored under `key`.
///
/// # Returns
///
/// * `Ok(&Value)` - The value, which may be `null`
/// * `Err(ParseError::MissingKey)` - If `data` is not an object or has no such key
pub fn get_key<'a>(data: &'a Value, key: &str) -> Result<&'a Value, ParseError> {
    data.get(key).ok_or_else(|| ParseError::missing_key(key))
}

/// Returns the array stored under `key`.
pub fn get_array<'a>(data: &'a Value, key: &str) -> Result<&'a Vec<Value>, ParseError> {
    get_key(data, key)?
        .as_array()
        .ok_or_else(|| ParseError::unexpected_type(key, "array"))
}

/// Returns the string stored under `key`.
pub fn get_str<'a>(data: &'a Value, key: &str) -> Result<&'a str, ParseError> {
    get_key(data, key)?
        .as_str()
        .ok_or_else(|| ParseError::unexpected_type(key, "string"))
}

/// Coerces a JSON number or numeric string into `f64`.
///
/// The portals send the same field as `"158.64"` on some endpoints and as
/// `158.64` on others, so both are accepted. Surrounding whitespace in
/// strings is ignored.
///
/// # Arguments
///
/// * `key` - Name used in error messages
/// * `value` - The JSON value to coerce
///
/// # Returns
///
/// * `Ok(f64)` - The numeric value
/// * `Err(ParseError::NumberParse)` - If the string is not a number
/// * `Err(ParseError::UnexpectedType)` - For `null`, booleans, arrays and objects
pub fn coerce_f64(key: &str, value: &Value) -> Result<f64, ParseError> {
    match value {
        Value::Number(n) => n
            .as_f64()
            .ok_or_else(|| ParseError::number_parse(n.to_string(), "not representable as f64")),
        Value::String(s) => s
            .trim()
            .parse::<f64>()
            .map_err(|e| ParseError::number_parse(s.as_str(), e)),
        _ => Err(ParseError::unexpected_type(key, "number or numeric string")),
    }
}

/// Coerces a JSON integer or integer string into `i64`.
///
/// Fractional values such as `"43167.5"` are rejected rather than truncated.
pub fn coerce_i64(key: &str, value: &Value) -> Result<i64, ParseError> {
    match value {
        Value::Number(n) => n
            .as_i64()
            .ok_or_else(|| ParseError::number_parse(n.to_string(), "not an integer")),
        Value::String(s) => s
            .trim()
            .parse::<i64>()
            .map_err(|e| ParseError::number_parse(s.as_str(), e)),
        _ => Err(ParseError::unexpected_type(key, "integer or integer string")),
    }
}

/// Reads `key` from `data` and coerces it into `f64`.
pub fn parse_f64_field(data: &Value, key: &str) -> Result<f64, ParseError> {
    coerce_f64(key, get_key(data, key)?)
}

/// Reads `key` from `data` and coerces it into `i64`.
pub fn parse_i64_field(data: &Value, key: &str) -> Result<i64, ParseError> {
    coerce_i64(key, get_key(data, key)?)
}

/// Parses a number written with a decimal comma, e.g. `"160,684"`.
///
/// When a comma is present, dots are thousands separators and dropped.
/// Text without a comma is parsed as a plain dot-decimal number.
pub fn parse_decimal_comma(text: &str) -> Result<f64, ParseError> {
    let trimmed = text.trim();
    let normalized = if trimmed.contains(',') {
        trimmed.replace('.', "").replace(',', ".")
    } else {
        trimmed.to_string()
    };
    normalized
        .parse::<f64>()
        .map_err(|e| ParseError::number_parse(text, e))
}

/// Parses a date and returns the midnight that starts it.
///
/// # Example
///
/// ```
/// # use utility_portals::helper::parse_date_at_midnight;
/// let start = parse_date_at_midnight("19-08-2022", "%d-%m-%Y").unwrap();
/// assert_eq!(start.to_string(), "2022-08-19 00:00:00");
/// ```
pub fn parse_date_at_midnight(text: &str, format: &str) -> Result<NaiveDateTime, ParseError> {
    NaiveDate::parse_from_str(text.trim(), format)
        .map(|date| date.and_time(NaiveTime::MIN))
        .map_err(|e| ParseError::datetime_parse(text, e))
}

/// Parses a date with a time component.
pub fn parse_datetime(text: &str, format: &str) -> Result<NaiveDateTime, ParseError> {
    NaiveDateTime::parse_from_str(text.trim(), format)
        .map_err(|e| ParseError::datetime_parse(text, e))
}

/// Normalizes a timestamp to the beginning of its day (00:00:00).
pub fn day_of_beginning(dt: NaiveDateTime) -> NaiveDateTime {
    dt.date().and_time(NaiveTime::MIN)
}

/// Orders two timestamps so the earlier one comes first.
pub fn normalize_range(a: NaiveDateTime, b: NaiveDateTime) -> (NaiveDateTime, NaiveDateTime) {
    if a <= b {
        (a, b)
    } else {
        (b, a)
    }
}

/// Collapses runs of whitespace and capitalizes each word.
///
/// Portal addresses come padded and upper-cased, e.g.
/// `"C/ MAYOR  , 12        VALENCIA   "` becomes `"C/ Mayor , 12 Valencia"`.
pub fn sanitize_address(address: &str) -> String {
    address
        .split_whitespace()
        .map(capitalize)
        .collect::<Vec<_>>()
        .join(" ")
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first
            .to_uppercase()
            .chain(chars.flat_map(char::to_lowercase))
            .collect(),
        None => String::new(),
    }
}
