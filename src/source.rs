//! Export directory loading
//!
//! Finds location-history export files under a root directory and parses each
//! one as JSON. A file that cannot be read or parsed is recorded and skipped;
//! only a missing root or an empty file set stops the load.

use serde::Serialize;
use serde_json::Value;
use std::fs;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

use crate::error::SourceError;

/// Default location of exported timeline files
pub const DEFAULT_DATA_DIR: &str = "public/location_history";

/// Where and what to load
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceConfig {
    pub root: PathBuf,
    /// File extension to match, without the dot
    pub extension: String,
    pub follow_links: bool,
}

impl SourceConfig {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            extension: "json".to_string(),
            follow_links: false,
        }
    }

    pub fn with_extension(mut self, extension: impl Into<String>) -> Self {
        self.extension = extension.into();
        self
    }

    pub fn with_follow_links(mut self, follow: bool) -> Self {
        self.follow_links = follow;
        self
    }
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self::new(DEFAULT_DATA_DIR)
    }
}

/// A file that was found but could not be used
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FileFailure {
    pub path: PathBuf,
    pub message: String,
}

/// Parsed documents in path order, plus the files that failed
#[derive(Debug, Default)]
pub struct LoadedDocuments {
    pub documents: Vec<(PathBuf, Value)>,
    pub failures: Vec<FileFailure>,
}

impl LoadedDocuments {
    pub fn files_found(&self) -> usize {
        self.documents.len() + self.failures.len()
    }

    pub fn values(&self) -> impl Iterator<Item = &Value> {
        self.documents.iter().map(|(_, value)| value)
    }
}

/// List matching files under the root, sorted by path
pub fn discover_files(config: &SourceConfig) -> Result<Vec<PathBuf>, SourceError> {
    let root = &config.root;
    if !root.exists() {
        return Err(SourceError::DirectoryNotFound(root.clone()));
    }
    if !root.is_dir() {
        return Err(SourceError::NotADirectory(root.clone()));
    }

    let mut files: Vec<PathBuf> = WalkDir::new(root)
        .follow_links(config.follow_links)
        .into_iter()
        .filter_map(|entry| match entry {
            Ok(entry) => Some(entry),
            Err(e) => {
                log::warn!("Skipping unreadable path under {}: {}", root.display(), e);
                None
            }
        })
        .filter(|entry| entry.file_type().is_file())
        .filter(|entry| has_extension(entry.path(), &config.extension))
        .map(|entry| entry.into_path())
        .collect();

    files.sort();

    if files.is_empty() {
        return Err(SourceError::NoFiles(root.clone()));
    }

    log::info!("Found {} {} files in {}", files.len(), config.extension, root.display());
    Ok(files)
}

/// Discover and parse every matching file
pub fn load_documents(config: &SourceConfig) -> Result<LoadedDocuments, SourceError> {
    let files = discover_files(config)?;
    let mut loaded = LoadedDocuments::default();

    for path in files {
        log::debug!("Processing file: {}", path.display());
        match read_document(&path) {
            Ok(value) => loaded.documents.push((path, value)),
            Err(message) => {
                log::warn!("Error processing file {}: {}", path.display(), message);
                loaded.failures.push(FileFailure { path, message });
            }
        }
    }

    Ok(loaded)
}

fn read_document(path: &Path) -> Result<Value, String> {
    let content = fs::read_to_string(path).map_err(|e| e.to_string())?;
    serde_json::from_str(&content).map_err(|e| e.to_string())
}

fn has_extension(path: &Path, extension: &str) -> bool {
    path.extension()
        .and_then(|s| s.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case(extension))
}
