//! Place visit adapter
//!
//! Maps a `placeVisit` onto a single point. The center is not sanitized.

use serde_json::Value;

use super::RecordAdapter;
use crate::coordinates::position_from_e7;
use crate::error::EntryError;
use crate::schema::{value_as_f64, RawPlaceVisit};
use crate::types::CanonicalPlaceVisit;

/// `placeVisit` → `CanonicalPlaceVisit`
pub struct PlaceVisitAdapter;

impl RecordAdapter for PlaceVisitAdapter {
    type Output = CanonicalPlaceVisit;

    fn adapt(&self, raw: &Value) -> Result<CanonicalPlaceVisit, EntryError> {
        let visit = RawPlaceVisit::from_value(raw)?;
        let location = visit
            .location
            .ok_or(EntryError::MissingField("location"))?;
        let duration = visit
            .duration
            .ok_or(EntryError::MissingField("duration"))?;

        // Empty names fall back to the address too.
        let name = location
            .name
            .clone()
            .filter(|n| !n.is_empty())
            .or_else(|| location.address.clone());

        Ok(CanonicalPlaceVisit {
            coordinates: position_from_e7(visit.center_lat_e7, visit.center_lng_e7),
            name,
            semantic_type: location.semantic_type,
            start_time: duration.start_timestamp,
            end_time: duration.end_timestamp,
            confidence: visit.place_confidence.as_ref().and_then(value_as_f64),
            address: location.address,
            place_id: location.place_id,
        })
    }
}
