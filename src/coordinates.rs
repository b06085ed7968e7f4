//! Coordinate sanitization
//!
//! Accepts a coordinate list either as serialized text or as already-parsed
//! pairs, and drops pairs whose longitude or latitude is a literal `null`.
//! - Order is preserved; no sorting or deduplication
//! - Ranges are not validated
//! - Only literal `null` is filtered. Short pairs and non-numeric axes pass
//!   through untouched; widening this to NaN or missing axes would be a
//!   behavior change for downstream consumers.

use serde_json::Value;

use crate::types::Position;

/// Scale of fixed-point (E7) coordinates
pub const E7_SCALE: f64 = 1e7;

/// A coordinate list as it may arrive from a producer
#[derive(Debug, Clone, PartialEq)]
pub enum CoordinatePayload {
    /// Serialized array of `[lng, lat]` pairs
    Text(String),
    /// Already-structured pairs
    Pairs(Vec<Position>),
}

impl CoordinatePayload {
    /// Interpret a raw JSON value as a coordinate payload.
    ///
    /// Array elements that are not themselves arrays cannot be pairs and are
    /// dropped. Scalars other than strings are not a payload at all.
    pub fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::String(text) => Some(CoordinatePayload::Text(text.clone())),
            Value::Array(items) => Some(CoordinatePayload::Pairs(pairs_from_values(items))),
            _ => None,
        }
    }
}

impl From<Vec<Position>> for CoordinatePayload {
    fn from(pairs: Vec<Position>) -> Self {
        CoordinatePayload::Pairs(pairs)
    }
}

/// Decode (if needed) and filter a coordinate payload.
///
/// Never fails: undecodable text yields an empty list and a warning.
pub fn sanitize(payload: CoordinatePayload) -> Vec<Position> {
    let pairs = match payload {
        CoordinatePayload::Pairs(pairs) => pairs,
        CoordinatePayload::Text(text) => match decode(&text) {
            Some(pairs) => pairs,
            None => return Vec::new(),
        },
    };

    pairs.into_iter().filter(|pos| !pos.has_null_axis()).collect()
}

fn decode(text: &str) -> Option<Vec<Position>> {
    match serde_json::from_str::<Value>(text) {
        Ok(Value::Array(items)) => Some(pairs_from_values(&items)),
        Ok(other) => {
            log::warn!(
                "Coordinate payload is not a list (found {}), ignoring",
                json_kind(&other)
            );
            None
        }
        Err(e) => {
            log::warn!("Error parsing coordinates: {}", e);
            None
        }
    }
}

fn pairs_from_values(items: &[Value]) -> Vec<Position> {
    items
        .iter()
        .filter_map(|item| match item {
            Value::Array(axes) => Some(Position::from_raw(axes.clone())),
            other => {
                log::debug!("Dropping non-pair coordinate element ({})", json_kind(other));
                None
            }
        })
        .collect()
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// Convert a fixed-point value to decimal degrees (plain division, no rounding)
pub fn e7_to_degrees(value: f64) -> f64 {
    value / E7_SCALE
}

/// Build a `[lng, lat]` position from fixed-point latitude/longitude.
///
/// An absent axis becomes `null`.
pub fn position_from_e7(lat_e7: Option<f64>, lng_e7: Option<f64>) -> Position {
    Position::from_axes(lng_e7.map(e7_to_degrees), lat_e7.map(e7_to_degrees))
}
