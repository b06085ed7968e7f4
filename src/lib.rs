//! PathMapper - Location-history normalization for map rendering
//!
//! PathMapper turns location-history timeline exports into a flat schema a map
//! viewer can draw directly: input classification → record adaptation →
//! coordinate sanitization → `{ routes, placeVisits }`.
//!
//! ## Modules
//!
//! - **Normalizer**: Fold export documents or pre-flattened items into a batch
//! - **Coordinates**: Decode and filter `[lng, lat]` coordinate lists
//! - **Source**: Discover and parse export files under a directory

pub mod adapters;
pub mod coordinates;
pub mod error;
pub mod filter;
pub mod normalizer;
pub mod pipeline;
pub mod schema;
pub mod source;
pub mod stats;
pub mod types;

// FFI bindings for C interop (always available for cdylib/staticlib builds)
pub mod ffi;

pub use coordinates::{sanitize, CoordinatePayload};
pub use error::{EntryError, PathMapperError, SourceError};
pub use filter::{activity_label, ActivitySelection, RouteFilter};
pub use normalizer::Normalizer;
pub use pipeline::{directory_to_batch, documents_to_batch, timeline_to_batch, LoadReport};
pub use source::SourceConfig;
pub use stats::BatchStats;
pub use types::{CanonicalPlaceVisit, CanonicalRoute, NormalizedBatch, Position};

/// PathMapper version
pub const PATHMAPPER_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Producer name reported by the CLI
pub const PRODUCER_NAME: &str = "pathmapper";
