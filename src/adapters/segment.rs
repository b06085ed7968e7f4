//! Movement segment adapter
//!
//! Maps an `activitySegment` onto a route. The path comes from the waypoint
//! list when it has points, otherwise from the start/end locations.

use serde_json::Value;

use super::RecordAdapter;
use crate::coordinates::{position_from_e7, sanitize};
use crate::error::EntryError;
use crate::schema::RawMovementSegment;
use crate::types::{CanonicalRoute, Position};

/// `activitySegment` → `CanonicalRoute`
pub struct SegmentAdapter;

impl RecordAdapter for SegmentAdapter {
    type Output = Option<CanonicalRoute>;

    fn adapt(&self, raw: &Value) -> Result<Option<CanonicalRoute>, EntryError> {
        let segment = RawMovementSegment::from_value(raw)?;

        // No waypoints and no endpoint pair: nothing to draw.
        let Some(path) = segment_path(&segment) else {
            return Ok(None);
        };

        let coordinates = sanitize(path.into());
        if coordinates.is_empty() {
            log::warn!(
                "Skipping {} segment: no valid coordinates after sanitization",
                segment.activity_type.as_deref().unwrap_or("untyped")
            );
            return Ok(None);
        }

        let duration = segment
            .duration
            .ok_or(EntryError::MissingField("duration"))?;

        Ok(Some(CanonicalRoute {
            coordinates,
            activity_type: segment.activity_type,
            start_time: duration.start_timestamp,
            end_time: duration.end_timestamp,
        }))
    }
}

/// Unsanitized `[lng, lat]` path of a segment
fn segment_path(segment: &RawMovementSegment) -> Option<Vec<Position>> {
    if let Some(waypoints) = segment.waypoints() {
        return Some(
            waypoints
                .iter()
                .map(|wp| position_from_e7(wp.lat_e7, wp.lng_e7))
                .collect(),
        );
    }

    match (&segment.start_location, &segment.end_location) {
        (Some(start), Some(end)) => Some(vec![
            position_from_e7(start.latitude_e7, start.longitude_e7),
            position_from_e7(end.latitude_e7, end.longitude_e7),
        ]),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn test_endpoint_pair() {
        let raw = json!({
            "startLocation": { "latitudeE7": 407128000, "longitudeE7": -740060000 },
            "endLocation": { "latitudeE7": 407200000, "longitudeE7": -740100000 },
            "activityType": "WALKING",
            "duration": { "startTimestamp": "t0", "endTimestamp": "t1" }
        });

        let route = SegmentAdapter.adapt(&raw).unwrap().unwrap();
        assert_eq!(
            route,
            CanonicalRoute {
                coordinates: vec![
                    Position::from_degrees(-74.006, 40.7128),
                    Position::from_degrees(-74.01, 40.72),
                ],
                activity_type: Some("WALKING".to_string()),
                start_time: Some("t0".to_string()),
                end_time: Some("t1".to_string()),
            }
        );
    }

    #[test]
    fn test_waypoints_take_precedence() {
        let raw = json!({
            "startLocation": { "latitudeE7": 1, "longitudeE7": 1 },
            "endLocation": { "latitudeE7": 2, "longitudeE7": 2 },
            "waypointPath": { "waypoints": [
                { "latE7": 100000000, "lngE7": 200000000 },
                { "latE7": 110000000, "lngE7": 210000000 },
                { "latE7": 120000000, "lngE7": 220000000 }
            ]},
            "activityType": "CYCLING",
            "duration": { "startTimestamp": "t0", "endTimestamp": "t1" }
        });

        let route = SegmentAdapter.adapt(&raw).unwrap().unwrap();
        assert_eq!(
            route.coordinates,
            vec![
                Position::from_degrees(20.0, 10.0),
                Position::from_degrees(21.0, 11.0),
                Position::from_degrees(22.0, 12.0),
            ]
        );
    }

    #[test]
    fn test_empty_waypoints_fall_back_to_endpoints() {
        let raw = json!({
            "startLocation": { "latitudeE7": 10000000, "longitudeE7": 20000000 },
            "endLocation": { "latitudeE7": 30000000, "longitudeE7": 40000000 },
            "waypointPath": { "waypoints": [] },
            "duration": {}
        });

        let route = SegmentAdapter.adapt(&raw).unwrap().unwrap();
        assert_eq!(route.coordinates.len(), 2);
        assert_eq!(route.coordinates[0].lng(), Some(2.0));
        assert!(route.activity_type.is_none());
        assert!(route.start_time.is_none());
    }

    #[test]
    fn test_no_path_yields_nothing() {
        let raw = json!({ "activityType": "WALKING" });
        assert_eq!(SegmentAdapter.adapt(&raw).unwrap(), None);

        let only_start = json!({
            "startLocation": { "latitudeE7": 1, "longitudeE7": 1 },
            "duration": {}
        });
        assert_eq!(SegmentAdapter.adapt(&only_start).unwrap(), None);
    }

    #[test]
    fn test_all_points_invalid_yields_nothing() {
        let raw = json!({
            "waypointPath": { "waypoints": [{ "latE7": 1 }, { "lngE7": 2 }] },
            "activityType": "WALKING",
            "duration": { "startTimestamp": "t0", "endTimestamp": "t1" }
        });
        assert_eq!(SegmentAdapter.adapt(&raw).unwrap(), None);
    }

    #[test]
    fn test_invalid_waypoints_do_not_fall_back_to_endpoints() {
        let raw = json!({
            "startLocation": { "latitudeE7": 407128000, "longitudeE7": -740060000 },
            "endLocation": { "latitudeE7": 407200000, "longitudeE7": -740100000 },
            "waypointPath": { "waypoints": [{ "latE7": 1 }, { "lngE7": 2 }] },
            "activityType": "WALKING",
            "duration": { "startTimestamp": "t0", "endTimestamp": "t1" }
        });
        assert_eq!(SegmentAdapter.adapt(&raw).unwrap(), None);
    }

    #[test]
    fn test_partial_waypoints_are_filtered() {
        let raw = json!({
            "waypointPath": { "waypoints": [
                { "latE7": 10000000, "lngE7": 20000000 },
                { "latE7": 10000000 }
            ]},
            "duration": {}
        });
        let route = SegmentAdapter.adapt(&raw).unwrap().unwrap();
        assert_eq!(route.coordinates, vec![Position::from_degrees(2.0, 1.0)]);
    }

    #[test]
    fn test_missing_duration_is_malformed() {
        let raw = json!({
            "startLocation": { "latitudeE7": 1, "longitudeE7": 1 },
            "endLocation": { "latitudeE7": 2, "longitudeE7": 2 },
            "activityType": "WALKING"
        });
        assert!(matches!(
            SegmentAdapter.adapt(&raw),
            Err(EntryError::MissingField("duration"))
        ));
    }
}
