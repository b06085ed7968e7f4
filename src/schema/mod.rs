//! Raw location-history input schema
//!
//! Typed views over the nested export format (movement segments and place
//! visits under `timelineObjects`) plus the pre-flattened item shape, and the
//! explicit classification used to dispatch each top-level value and entry.

mod shape;
mod timeline;

pub use shape::*;
pub use timeline::*;
