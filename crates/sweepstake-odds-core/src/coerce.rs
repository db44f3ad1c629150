//! Parse-or-zero coercion for upstream and query values
//!
//! Upstream numeric fields arrive as numbers, numeric strings, `null` or
//! garbage. None of these are errors: anything that is not a usable
//! non-negative finite number becomes zero. The serde adapters at the bottom
//! are meant for `#[serde(default, deserialize_with = "...")]` on wire types
//! so the coercion happens once, while decoding.

use serde::{Deserialize, Deserializer};
use serde_json::Value;

/// Non-negative finite number, or 0.0
pub fn number_or_zero(value: &Value) -> f64 {
    let number = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => parse_decimal(s),
        _ => None,
    };
    number
        .filter(|n| n.is_finite() && *n >= 0.0)
        .unwrap_or(0.0)
}

/// Whole count, or 0. Fractional counts are floored.
pub fn count_or_zero(value: &Value) -> u64 {
    match value {
        Value::Number(n) => n.as_u64().unwrap_or_else(|| number_or_zero(value) as u64),
        Value::String(s) => parse_count_or_zero(s),
        _ => 0,
    }
}

/// Same rules as [`count_or_zero`] for a raw string such as a query parameter
pub fn parse_count_or_zero(raw: &str) -> u64 {
    let raw = raw.trim();
    if let Ok(count) = raw.parse::<u64>() {
        return count;
    }
    parse_decimal(raw)
        .filter(|n| n.is_finite() && *n >= 0.0)
        .map(|n| n.floor() as u64)
        .unwrap_or(0)
}

fn parse_decimal(raw: &str) -> Option<f64> {
    let raw = raw.trim();
    // `str::parse::<f64>` also accepts "inf" and "NaN"
    if raw.is_empty() || raw.chars().any(|c| c.is_alphabetic() && c != 'e' && c != 'E') {
        return None;
    }
    raw.parse::<f64>().ok()
}

/// Identifier that upstream may send as a string or a number
pub fn id_to_string(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        _ => String::new(),
    }
}

pub fn deserialize_count<'de, D: Deserializer<'de>>(deserializer: D) -> Result<u64, D::Error> {
    Value::deserialize(deserializer).map(|v| count_or_zero(&v))
}

pub fn deserialize_price<'de, D: Deserializer<'de>>(deserializer: D) -> Result<f64, D::Error> {
    Value::deserialize(deserializer).map(|v| number_or_zero(&v))
}

pub fn deserialize_id<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    Value::deserialize(deserializer).map(|v| id_to_string(&v))
}

/// Reads `null` as the type's default, for lists upstream sometimes nulls out
pub fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Option::<T>::deserialize(deserializer).map(Option::unwrap_or_default)
}
