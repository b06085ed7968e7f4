//! Record normalization
//!
//! Folds parsed location-history inputs into a `NormalizedBatch`.
//! - Export documents: each `timelineObjects` entry is classified as a movement
//!   segment, a place visit or neither, then adapted
//! - Pre-flattened arrays: each item is sanitized and appended as a route
//! - Already-canonical `routes`/`placeVisits` are appended as they are
//!
//! Malformed data never fails a batch. A bad entry is logged and skipped and
//! the rest of the input is still processed.

use serde::Deserialize;
use serde_json::Value;

use crate::adapters::{FlattenedAdapter, PlaceVisitAdapter, RecordAdapter, SegmentAdapter};
use crate::error::PathMapperError;
use crate::schema::{InputShape, RawTimelineDocument, TimelineEntry};
use crate::types::{CanonicalPlaceVisit, CanonicalRoute, NormalizedBatch};

/// Stateless normalizer; every call depends only on its arguments
pub struct Normalizer;

impl Normalizer {
    /// Normalize one parsed input and append the results to `batch`
    pub fn normalize(input: &Value, batch: &mut NormalizedBatch) {
        match InputShape::classify(input) {
            InputShape::Document(document) => normalize_document(&document, batch),
            InputShape::Flattened(items) => normalize_flattened(items, batch),
            InputShape::Unsupported => {
                log::warn!("Ignoring input that is neither a timeline document nor an array");
            }
        }
    }

    /// Normalize inputs in order into a fresh batch
    pub fn normalize_all<'a, I>(inputs: I) -> NormalizedBatch
    where
        I: IntoIterator<Item = &'a Value>,
    {
        let mut batch = NormalizedBatch::new();
        for input in inputs {
            Self::normalize(input, &mut batch);
        }
        batch
    }

    /// Normalize one input into its own batch
    pub fn normalize_value(input: &Value) -> NormalizedBatch {
        let mut batch = NormalizedBatch::new();
        Self::normalize(input, &mut batch);
        batch
    }

    /// Parse and normalize a JSON document.
    ///
    /// Only unparseable text is an error; malformed content is skipped.
    pub fn normalize_json(json: &str) -> Result<NormalizedBatch, PathMapperError> {
        let input: Value = serde_json::from_str(json)?;
        Ok(Self::normalize_value(&input))
    }
}

fn normalize_document(document: &RawTimelineDocument<'_>, batch: &mut NormalizedBatch) {
    append_passthrough(document, batch);

    let Some(entries) = document.entries() else {
        if document.has_passthrough() {
            log::debug!("Document has no timelineObjects; used canonical records only");
        } else {
            log::warn!("Document does not contain a valid timelineObjects array");
        }
        return;
    };

    log::debug!("Processing {} timeline objects", entries.len());

    for (index, entry) in entries.iter().enumerate() {
        match TimelineEntry::classify(entry) {
            TimelineEntry::MovementSegment(raw) => match SegmentAdapter.adapt(raw) {
                Ok(Some(route)) => batch.push_route(route),
                Ok(None) => {}
                Err(e) => log::warn!("Skipping activity segment at index {}: {}", index, e),
            },
            TimelineEntry::PlaceVisit(raw) => match PlaceVisitAdapter.adapt(raw) {
                Ok(visit) => batch.push_place_visit(visit),
                Err(e) => log::warn!("Skipping place visit at index {}: {}", index, e),
            },
            TimelineEntry::Unrecognized => {
                log::debug!("Ignoring unrecognized timeline object at index {}", index);
            }
        }
    }
}

fn normalize_flattened(items: &[Value], batch: &mut NormalizedBatch) {
    log::debug!("Processing {} flattened items", items.len());

    for (index, item) in items.iter().enumerate() {
        match FlattenedAdapter.adapt(item) {
            Ok(Some(route)) => batch.push_route(route),
            Ok(None) => {}
            Err(e) => log::warn!("Skipping flattened item at index {}: {}", index, e),
        }
    }
}

/// Append records that are already in canonical form, unsanitized
fn append_passthrough(document: &RawTimelineDocument<'_>, batch: &mut NormalizedBatch) {
    if let Some(routes) = document.routes {
        for route in canonical_records::<CanonicalRoute>(routes, "routes") {
            batch.push_route(route);
        }
    }
    if let Some(visits) = document.place_visits {
        for visit in canonical_records::<CanonicalPlaceVisit>(visits, "placeVisits") {
            batch.push_place_visit(visit);
        }
    }
}

fn canonical_records<T>(value: &Value, field: &str) -> Vec<T>
where
    T: for<'de> Deserialize<'de>,
{
    let Some(items) = value.as_array() else {
        log::warn!("Ignoring {}: expected an array", field);
        return Vec::new();
    };

    items
        .iter()
        .enumerate()
        .filter_map(|(index, item)| match T::deserialize(item) {
            Ok(record) => Some(record),
            Err(e) => {
                log::warn!("Skipping {} record at index {}: {}", field, index, e);
                None
            }
        })
        .collect()
}
