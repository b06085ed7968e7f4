//! Batch summary
//!
//! Counts and time span of a normalized batch. Timestamps stay strings in the
//! canonical schema; they are only parsed here, and ones that do not parse as
//! RFC 3339 are counted rather than rejected.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::types::NormalizedBatch;

/// Route count for one activity type
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ActivityCount {
    pub activity_type: String,
    pub routes: usize,
}

/// Summary of a normalized batch
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchStats {
    pub routes: usize,
    pub place_visits: usize,
    /// Total positions across all routes
    pub route_points: usize,
    /// Per-activity route counts, in first-seen order
    pub activities: Vec<ActivityCount>,
    pub earliest_start: Option<DateTime<Utc>>,
    pub latest_end: Option<DateTime<Utc>>,
    pub unparsed_timestamps: usize,
}

impl BatchStats {
    pub fn from_batch(batch: &NormalizedBatch) -> Self {
        let mut span = TimeSpan::default();

        for route in &batch.routes {
            span.observe_start(route.start_time.as_deref());
            span.observe_end(route.end_time.as_deref());
        }
        for visit in &batch.place_visits {
            span.observe_start(visit.start_time.as_deref());
            span.observe_end(visit.end_time.as_deref());
        }

        let activities = batch
            .activity_types()
            .into_iter()
            .map(|activity_type| {
                let routes = batch
                    .routes
                    .iter()
                    .filter(|r| r.activity_type.as_deref() == Some(activity_type.as_str()))
                    .count();
                ActivityCount {
                    activity_type,
                    routes,
                }
            })
            .collect();

        Self {
            routes: batch.routes.len(),
            place_visits: batch.place_visits.len(),
            route_points: batch.routes.iter().map(|r| r.coordinates.len()).sum(),
            activities,
            earliest_start: span.earliest,
            latest_end: span.latest,
            unparsed_timestamps: span.unparsed,
        }
    }
}

#[derive(Default)]
struct TimeSpan {
    earliest: Option<DateTime<Utc>>,
    latest: Option<DateTime<Utc>>,
    unparsed: usize,
}

impl TimeSpan {
    fn observe_start(&mut self, raw: Option<&str>) {
        if let Some(ts) = self.parse(raw) {
            self.earliest = Some(self.earliest.map_or(ts, |e| e.min(ts)));
        }
    }

    fn observe_end(&mut self, raw: Option<&str>) {
        if let Some(ts) = self.parse(raw) {
            self.latest = Some(self.latest.map_or(ts, |l| l.max(ts)));
        }
    }

    fn parse(&mut self, raw: Option<&str>) -> Option<DateTime<Utc>> {
        let raw = raw?;
        match parse_timestamp(raw) {
            Some(ts) => Some(ts),
            None => {
                self.unparsed += 1;
                None
            }
        }
    }
}

/// Parse an export timestamp (RFC 3339, e.g. `2024-01-15T08:30:00.000Z`)
pub fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(raw)
        .ok()
        .map(|dt| dt.with_timezone(&Utc))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{CanonicalPlaceVisit, CanonicalRoute, Position};
    use chrono::TimeZone;
    use pretty_assertions::assert_eq;

    fn route(activity: &str, points: usize, start: &str, end: &str) -> CanonicalRoute {
        CanonicalRoute {
            coordinates: vec![Position::from_degrees(0.0, 0.0); points],
            activity_type: Some(activity.to_string()),
            start_time: Some(start.to_string()),
            end_time: Some(end.to_string()),
        }
    }

    #[test]
    fn test_stats() {
        let batch = NormalizedBatch {
            routes: vec![
                route("WALKING", 2, "2024-01-15T08:30:00.000Z", "2024-01-15T09:00:00Z"),
                route("IN_BUS", 5, "2024-01-14T10:00:00+02:00", "t-end"),
                route("WALKING", 3, "2024-01-16T07:00:00Z", "2024-01-16T07:30:00Z"),
            ],
            place_visits: vec![CanonicalPlaceVisit {
                coordinates: Position::from_degrees(1.0, 1.0),
                name: None,
                semantic_type: None,
                start_time: None,
                end_time: Some("2024-01-17T00:00:00Z".to_string()),
                confidence: None,
                address: None,
                place_id: None,
            }],
        };

        let stats = BatchStats::from_batch(&batch);
        assert_eq!(stats.routes, 3);
        assert_eq!(stats.place_visits, 1);
        assert_eq!(stats.route_points, 10);
        assert_eq!(
            stats.activities,
            vec![
                ActivityCount {
                    activity_type: "WALKING".to_string(),
                    routes: 2
                },
                ActivityCount {
                    activity_type: "IN_BUS".to_string(),
                    routes: 1
                },
            ]
        );
        assert_eq!(
            stats.earliest_start,
            Some(Utc.with_ymd_and_hms(2024, 1, 14, 8, 0, 0).unwrap())
        );
        assert_eq!(
            stats.latest_end,
            Some(Utc.with_ymd_and_hms(2024, 1, 17, 0, 0, 0).unwrap())
        );
        assert_eq!(stats.unparsed_timestamps, 1);
    }

    #[test]
    fn test_stats_serialize_camel_case() {
        let batch = NormalizedBatch {
            routes: vec![route("WALKING", 1, "2024-01-15T08:30:00Z", "x")],
            place_visits: Vec::new(),
        };

        let value = serde_json::to_value(BatchStats::from_batch(&batch)).unwrap();
        assert_eq!(value["placeVisits"], 0);
        assert_eq!(value["routePoints"], 1);
        assert_eq!(value["unparsedTimestamps"], 1);
        assert_eq!(value["activities"][0]["activityType"], "WALKING");
        assert!(value.get("place_visits").is_none());
        assert_eq!(
            value["earliestStart"].as_str().and_then(parse_timestamp),
            Some(Utc.with_ymd_and_hms(2024, 1, 15, 8, 30, 0).unwrap())
        );
    }

    #[test]
    fn test_empty_batch() {
        let stats = BatchStats::from_batch(&NormalizedBatch::new());
        assert_eq!(stats.routes, 0);
        assert!(stats.activities.is_empty());
        assert!(stats.earliest_start.is_none());
    }
}
