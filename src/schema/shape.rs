//! Input shape and entry classification
//!
//! Top-level values and timeline entries are classified once, up front, so the
//! normalizer branches on a tag instead of probing fields as it goes.

use serde_json::{Map, Value};

/// Key holding the ordered entries of an export document
pub const TIMELINE_OBJECTS: &str = "timelineObjects";

/// Borrowed view of an export document.
///
/// Entries stay raw so one malformed entry cannot fail the document.
#[derive(Debug, Clone, Copy)]
pub struct RawTimelineDocument<'a> {
    pub timeline_objects: Option<&'a Value>,
    /// Already-canonical routes written by an earlier run
    pub routes: Option<&'a Value>,
    /// Already-canonical place visits written by an earlier run
    pub place_visits: Option<&'a Value>,
}

impl<'a> RawTimelineDocument<'a> {
    pub fn from_map(map: &'a Map<String, Value>) -> Self {
        Self {
            timeline_objects: map.get(TIMELINE_OBJECTS),
            routes: map.get("routes").filter(|v| is_truthy(v)),
            place_visits: map.get("placeVisits").filter(|v| is_truthy(v)),
        }
    }

    /// Timeline entries, when `timelineObjects` is an array
    pub fn entries(&self) -> Option<&'a [Value]> {
        self.timeline_objects
            .and_then(Value::as_array)
            .map(Vec::as_slice)
    }

    pub fn has_passthrough(&self) -> bool {
        self.routes.is_some() || self.place_visits.is_some()
    }
}

/// What a top-level input value is
#[derive(Debug, Clone, Copy)]
pub enum InputShape<'a> {
    /// Array of pre-flattened route items
    Flattened(&'a [Value]),
    /// Export document, possibly carrying already-canonical `routes`/`placeVisits`
    Document(RawTimelineDocument<'a>),
    /// Scalar or null; contributes nothing
    Unsupported,
}

impl<'a> InputShape<'a> {
    pub fn classify(value: &'a Value) -> Self {
        match value {
            Value::Array(items) => InputShape::Flattened(items),
            Value::Object(map) => InputShape::Document(RawTimelineDocument::from_map(map)),
            _ => InputShape::Unsupported,
        }
    }
}

/// What a single `timelineObjects` entry is
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TimelineEntry<'a> {
    /// Inner `activitySegment` value
    MovementSegment(&'a Value),
    /// Inner `placeVisit` value
    PlaceVisit(&'a Value),
    Unrecognized,
}

impl<'a> TimelineEntry<'a> {
    /// An entry carrying both variants is treated as a movement segment.
    pub fn classify(entry: &'a Value) -> Self {
        if let Some(segment) = entry.get("activitySegment").filter(|v| is_truthy(v)) {
            TimelineEntry::MovementSegment(segment)
        } else if let Some(visit) = entry.get("placeVisit").filter(|v| is_truthy(v)) {
            TimelineEntry::PlaceVisit(visit)
        } else {
            TimelineEntry::Unrecognized
        }
    }
}

/// JSON truthiness as export producers use it: `null`, `false`, `0` and `""`
/// count as absent.
pub fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().map_or(true, |f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_classify_input_shapes() {
        assert!(matches!(
            InputShape::classify(&json!([])),
            InputShape::Flattened(_)
        ));
        assert!(matches!(
            InputShape::classify(&json!({ "timelineObjects": [] })),
            InputShape::Document(_)
        ));
        assert!(matches!(
            InputShape::classify(&json!("text")),
            InputShape::Unsupported
        ));
    }

    #[test]
    fn test_document_view() {
        let value = json!({ "timelineObjects": [{}, {}], "routes": [] });
        let InputShape::Document(doc) = InputShape::classify(&value) else {
            panic!("expected document");
        };
        assert_eq!(doc.entries().map(|e| e.len()), Some(2));
        assert!(doc.has_passthrough());

        let value = json!({ "timelineObjects": "nope" });
        let InputShape::Document(doc) = InputShape::classify(&value) else {
            panic!("expected document");
        };
        assert!(doc.entries().is_none());
        assert!(!doc.has_passthrough());
    }

    #[test]
    fn test_classify_entries() {
        let segment = json!({ "activitySegment": { "activityType": "WALKING" } });
        assert_eq!(
            TimelineEntry::classify(&segment),
            TimelineEntry::MovementSegment(&json!({ "activityType": "WALKING" }))
        );

        let visit = json!({ "placeVisit": { "location": {} } });
        assert!(matches!(
            TimelineEntry::classify(&visit),
            TimelineEntry::PlaceVisit(_)
        ));

        let other = json!({ "somethingElse": 1 });
        assert_eq!(TimelineEntry::classify(&other), TimelineEntry::Unrecognized);
    }

    #[test]
    fn test_segment_wins_over_visit() {
        let both = json!({ "activitySegment": {}, "placeVisit": {} });
        assert!(matches!(
            TimelineEntry::classify(&both),
            TimelineEntry::MovementSegment(_)
        ));
    }

    #[test]
    fn test_null_variant_falls_through() {
        let entry = json!({ "activitySegment": null, "placeVisit": { "location": {} } });
        assert!(matches!(
            TimelineEntry::classify(&entry),
            TimelineEntry::PlaceVisit(_)
        ));
    }

    #[test]
    fn test_truthiness() {
        assert!(!is_truthy(&json!(null)));
        assert!(!is_truthy(&json!("")));
        assert!(!is_truthy(&json!(0)));
        assert!(is_truthy(&json!([])));
        assert!(is_truthy(&json!("WALKING")));
    }
}
