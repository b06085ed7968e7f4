//! Pre-flattened item adapter
//!
//! Items written by upstream storage already carry `coordinates` and
//! `activityType`; they only need sanitizing.

use serde_json::Value;

use super::RecordAdapter;
use crate::coordinates::{sanitize, CoordinatePayload};
use crate::error::EntryError;
use crate::schema::{is_truthy, scalar_as_string, FlattenedItem};
use crate::types::CanonicalRoute;

/// Flattened `{ coordinates, activityType, startTime?, endTime? }` → `CanonicalRoute`
pub struct FlattenedAdapter;

impl RecordAdapter for FlattenedAdapter {
    type Output = Option<CanonicalRoute>;

    fn adapt(&self, raw: &Value) -> Result<Option<CanonicalRoute>, EntryError> {
        let item = FlattenedItem::from_value(raw)?;

        // Items without both fields are not route items.
        let (Some(coordinates), Some(activity_type)) = (
            item.coordinates.as_ref().filter(|v| is_truthy(v)),
            item.activity_type.as_ref().filter(|v| is_truthy(v)),
        ) else {
            return Ok(None);
        };

        let Some(activity_type) = scalar_as_string(activity_type) else {
            return Err(EntryError::InvalidField("activityType"));
        };

        let coordinates = CoordinatePayload::from_value(coordinates)
            .map(sanitize)
            .unwrap_or_default();
        if coordinates.is_empty() {
            log::warn!(
                "Skipping {} route due to invalid coordinates",
                activity_type
            );
            return Ok(None);
        }

        Ok(Some(CanonicalRoute {
            coordinates,
            activity_type: Some(activity_type),
            start_time: item.start_time,
            end_time: item.end_time,
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Position;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn test_structured_item() {
        let raw = json!({
            "coordinates": [[1.0, 2.0], [null, 3.0], [4.0, 5.0]],
            "activityType": "IN_BUS",
            "startTime": "t0",
            "endTime": "t1"
        });

        let route = FlattenedAdapter.adapt(&raw).unwrap().unwrap();
        assert_eq!(
            route,
            CanonicalRoute {
                coordinates: vec![
                    Position::from_degrees(1.0, 2.0),
                    Position::from_degrees(4.0, 5.0)
                ],
                activity_type: Some("IN_BUS".to_string()),
                start_time: Some("t0".to_string()),
                end_time: Some("t1".to_string()),
            }
        );
    }

    #[test]
    fn test_serialized_item() {
        let raw = json!({ "coordinates": "[[1.5, 2.5]]", "activityType": "WALKING" });
        let route = FlattenedAdapter.adapt(&raw).unwrap().unwrap();
        assert_eq!(route.coordinates, vec![Position::from_degrees(1.5, 2.5)]);
        assert!(route.start_time.is_none());
    }

    #[test]
    fn test_item_without_activity_is_ignored() {
        let raw = json!({ "coordinates": [[1.0, 2.0]] });
        assert_eq!(FlattenedAdapter.adapt(&raw).unwrap(), None);

        let empty = json!({ "coordinates": [[1.0, 2.0]], "activityType": "" });
        assert_eq!(FlattenedAdapter.adapt(&empty).unwrap(), None);
    }

    #[test]
    fn test_numeric_activity_is_coerced() {
        let raw = json!({ "coordinates": [[1.0, 2.0]], "activityType": 3 });
        let route = FlattenedAdapter.adapt(&raw).unwrap().unwrap();
        assert_eq!(route.activity_type.as_deref(), Some("3"));
    }

    #[test]
    fn test_structured_activity_is_malformed() {
        let raw = json!({ "coordinates": [[1.0, 2.0]], "activityType": { "type": "WALKING" } });
        assert!(matches!(
            FlattenedAdapter.adapt(&raw),
            Err(EntryError::InvalidField("activityType"))
        ));
    }

    #[test]
    fn test_item_with_no_valid_points_is_skipped() {
        let raw = json!({ "coordinates": "garbage", "activityType": "WALKING" });
        assert_eq!(FlattenedAdapter.adapt(&raw).unwrap(), None);

        let nulls = json!({ "coordinates": [[null, null]], "activityType": "WALKING" });
        assert_eq!(FlattenedAdapter.adapt(&nulls).unwrap(), None);
    }
}
