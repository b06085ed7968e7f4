//! Record adapters
//!
//! Each adapter takes one raw record (already classified by the normalizer)
//! and maps it onto the canonical schema. Adapters report malformed records as
//! `EntryError`; deciding to skip and log is left to the caller.

mod flattened;
mod place_visit;
mod segment;

pub use flattened::FlattenedAdapter;
pub use place_visit::PlaceVisitAdapter;
pub use segment::SegmentAdapter;

use serde_json::Value;

use crate::error::EntryError;

/// Trait for per-record adapters
pub trait RecordAdapter {
    type Output;

    /// Convert one raw record value
    fn adapt(&self, raw: &Value) -> Result<Self::Output, EntryError>;
}
