//! Pipeline orchestration
//!
//! This module provides the public one-call API for PathMapper: from raw JSON
//! text or an export directory to a normalized `{ routes, placeVisits }` batch.

use serde::Serialize;
use serde_json::Value;

use crate::error::PathMapperError;
use crate::normalizer::Normalizer;
use crate::source::{load_documents, FileFailure, SourceConfig};
use crate::types::NormalizedBatch;

/// Convert one raw location-history JSON document to canonical JSON.
///
/// # Arguments
/// * `raw_json` - Export document, pre-flattened array, or canonical batch
///
/// # Returns
/// Serialized `{ "routes": [...], "placeVisits": [...] }`
///
/// # Example
/// ```ignore
/// let canonical = timeline_to_batch(export_json)?;
/// ```
pub fn timeline_to_batch(raw_json: String) -> Result<String, PathMapperError> {
    let batch = Normalizer::normalize_json(&raw_json)?;
    batch
        .to_json()
        .map_err(|e| PathMapperError::Encoding(e.to_string()))
}

/// Normalize already-parsed documents, in order
pub fn documents_to_batch(documents: &[Value]) -> NormalizedBatch {
    Normalizer::normalize_all(documents)
}

/// Outcome of normalizing an export directory
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LoadReport {
    pub batch: NormalizedBatch,
    /// Matching files discovered, including ones that failed
    pub files_found: usize,
    pub files_failed: Vec<FileFailure>,
}

impl LoadReport {
    /// Files were found but produced zero records
    pub fn is_empty(&self) -> bool {
        self.batch.is_empty()
    }
}

/// Load every export file under the configured root and normalize them.
///
/// Pipeline stages:
/// 1. Discover files (missing root or no files is a `SourceError`)
/// 2. Read and parse each file; failures are recorded, not raised
/// 3. Fold all documents into one batch in path order
pub fn directory_to_batch(config: &SourceConfig) -> Result<LoadReport, PathMapperError> {
    let loaded = load_documents(config)?;
    let batch = Normalizer::normalize_all(loaded.values());

    log::info!(
        "Processed {} routes and {} place visits from {} files",
        batch.routes.len(),
        batch.place_visits.len(),
        loaded.files_found()
    );

    Ok(LoadReport {
        files_found: loaded.files_found(),
        files_failed: loaded.failures,
        batch,
    })
}
