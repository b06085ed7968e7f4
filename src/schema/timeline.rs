//! Timeline export record definitions
//!
//! Every field is optional at this layer. Whether a missing field makes an
//! entry unusable is decided by the adapters, not by deserialization.
//!
//! Scalar fields are read leniently: numbers written as strings and tags
//! written as numbers still convert, and anything unconvertible reads as
//! absent instead of rejecting the whole entry.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::error::EntryError;

/// A location given as fixed-point (E7) latitude/longitude
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct E7Location {
    #[serde(default, deserialize_with = "lenient_f64")]
    pub latitude_e7: Option<f64>,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub longitude_e7: Option<f64>,
}

/// One point of a recorded waypoint path
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Waypoint {
    #[serde(default, deserialize_with = "lenient_f64")]
    pub lat_e7: Option<f64>,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub lng_e7: Option<f64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WaypointPath {
    pub waypoints: Option<Vec<Waypoint>>,
}

/// Start/end timestamps of a segment or visit, kept as the export wrote them
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimelineDuration {
    #[serde(default, deserialize_with = "lenient_string")]
    pub start_timestamp: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub end_timestamp: Option<String>,
}

/// `activitySegment` payload: a recorded interval of travel
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawMovementSegment {
    pub start_location: Option<E7Location>,
    pub end_location: Option<E7Location>,
    pub waypoint_path: Option<WaypointPath>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub activity_type: Option<String>,
    pub duration: Option<TimelineDuration>,
}

impl RawMovementSegment {
    pub fn from_value(value: &Value) -> Result<Self, EntryError> {
        Ok(Self::deserialize(value)?)
    }

    /// Waypoints, only when the path carries at least one
    pub fn waypoints(&self) -> Option<&[Waypoint]> {
        self.waypoint_path
            .as_ref()
            .and_then(|path| path.waypoints.as_deref())
            .filter(|points| !points.is_empty())
    }
}

/// Semantic details of a visited place
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlaceLocation {
    #[serde(default, deserialize_with = "lenient_string")]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub address: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub semantic_type: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub place_id: Option<String>,
}

/// `placeVisit` payload: a stay at a single location
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawPlaceVisit {
    pub location: Option<PlaceLocation>,
    pub duration: Option<TimelineDuration>,
    /// Number or numeric string; anything else is dropped on conversion
    pub place_confidence: Option<Value>,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub center_lat_e7: Option<f64>,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub center_lng_e7: Option<f64>,
}

impl RawPlaceVisit {
    pub fn from_value(value: &Value) -> Result<Self, EntryError> {
        Ok(Self::deserialize(value)?)
    }
}

/// Item of the pre-flattened array shape produced by upstream storage
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FlattenedItem {
    /// Either a serialized coordinate list or an array of pairs
    pub coordinates: Option<Value>,
    pub activity_type: Option<Value>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub start_time: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub end_time: Option<String>,
}

impl FlattenedItem {
    pub fn from_value(value: &Value) -> Result<Self, EntryError> {
        Ok(Self::deserialize(value)?)
    }
}

/// Numeric value of a number or a numeric string
pub fn value_as_f64(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

/// Text of a string, number or bool; `None` for null and containers
pub fn scalar_as_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

fn lenient_f64<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.as_ref().and_then(value_as_f64))
}

fn lenient_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.as_ref().and_then(scalar_as_string))
}
