//! Canonical output schema
//!
//! The flat `{ routes, placeVisits }` shape produced by normalization. This is
//! the wire contract consumed by rendering, so field names and ordering of the
//! serialized form are stable.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A `[longitude, latitude]` position.
///
/// Axes are kept as raw JSON values so that a position read from an external
/// payload round-trips untouched: the sanitizer only removes pairs carrying a
/// literal `null`, and anything else (short pairs, non-numeric axes) is passed
/// through as it arrived.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Position(Vec<Value>);

impl Position {
    /// Build a position from decimal degrees, longitude first
    pub fn from_degrees(lng: f64, lat: f64) -> Self {
        Self(vec![Value::from(lng), Value::from(lat)])
    }

    /// Build a position where an absent axis becomes `null`
    pub fn from_axes(lng: Option<f64>, lat: Option<f64>) -> Self {
        Self(vec![axis_value(lng), axis_value(lat)])
    }

    /// Wrap raw axis values without inspecting them
    pub fn from_raw(axes: Vec<Value>) -> Self {
        Self(axes)
    }

    pub fn axes(&self) -> &[Value] {
        &self.0
    }

    /// Longitude in decimal degrees, if the first axis is numeric
    pub fn lng(&self) -> Option<f64> {
        self.0.first().and_then(Value::as_f64)
    }

    /// Latitude in decimal degrees, if the second axis is numeric
    pub fn lat(&self) -> Option<f64> {
        self.0.get(1).and_then(Value::as_f64)
    }

    /// True when the longitude or latitude slot holds a literal `null`.
    ///
    /// A missing slot is not `null`.
    pub fn has_null_axis(&self) -> bool {
        matches!(self.0.first(), Some(Value::Null)) || matches!(self.0.get(1), Some(Value::Null))
    }
}

fn axis_value(axis: Option<f64>) -> Value {
    axis.map(Value::from).unwrap_or(Value::Null)
}

/// A movement segment rendered as a line
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CanonicalRoute {
    /// Ordered `[lng, lat]` positions
    pub coordinates: Vec<Position>,
    /// Free-form activity tag (e.g. "WALKING")
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub activity_type: Option<String>,
    /// Start timestamp, passed through unchanged
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_time: Option<String>,
    /// End timestamp, passed through unchanged
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_time: Option<String>,
}

/// A stay at one location rendered as a point
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CanonicalPlaceVisit {
    /// Center of the visit, `[lng, lat]`
    pub coordinates: Position,
    /// Place name, or the address when the export carries no name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub semantic_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_time: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_time: Option<String>,
    /// Export-provided place confidence
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub confidence: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub place_id: Option<String>,
}

/// Accumulator and final output of a normalization run.
///
/// Insertion order is preserved across documents and within each document.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NormalizedBatch {
    #[serde(default)]
    pub routes: Vec<CanonicalRoute>,
    #[serde(default)]
    pub place_visits: Vec<CanonicalPlaceVisit>,
}

impl NormalizedBatch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.routes.is_empty() && self.place_visits.is_empty()
    }

    pub fn push_route(&mut self, route: CanonicalRoute) {
        self.routes.push(route);
    }

    pub fn push_place_visit(&mut self, visit: CanonicalPlaceVisit) {
        self.place_visits.push(visit);
    }

    /// Append another batch after this one, keeping both orders.
    ///
    /// This is the reduce step when documents are normalized independently.
    pub fn append(&mut self, mut other: NormalizedBatch) {
        self.routes.append(&mut other.routes);
        self.place_visits.append(&mut other.place_visits);
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    pub fn to_json_pretty(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}
