//! Error types for PathMapper

use std::path::PathBuf;
use thiserror::Error;

/// Errors surfaced at the crate boundary (text input, files, encoding)
#[derive(Debug, Error)]
pub enum PathMapperError {
    #[error("Invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Source(#[from] SourceError),

    #[error("Encoding error: {0}")]
    Encoding(String),
}

/// Input-absent conditions raised by the directory loader.
///
/// These are kept apart from parse failures so callers can tell
/// "nothing to show" from "something broke".
#[derive(Debug, Error)]
pub enum SourceError {
    #[error("Location history directory not found: {}", .0.display())]
    DirectoryNotFound(PathBuf),

    #[error("Location history path is not a directory: {}", .0.display())]
    NotADirectory(PathBuf),

    #[error("No JSON files found in {}", .0.display())]
    NoFiles(PathBuf),
}

/// Why a single timeline entry contributed nothing.
///
/// Never escapes the normalizer; it is logged and the entry is skipped.
#[derive(Debug, Error)]
pub enum EntryError {
    #[error("missing required field: {0}")]
    MissingField(&'static str),

    #[error("field has an unexpected type: {0}")]
    InvalidField(&'static str),

    #[error("unexpected entry shape: {0}")]
    Shape(#[from] serde_json::Error),
}
