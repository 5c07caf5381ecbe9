//! Shared fixtures for integration tests.

#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use placematch::ingest::{ExtractionError, Extractor};
use placematch::StoreRegistry;
use tempfile::TempDir;

/// A registry over a fresh temporary directory.
pub fn registry() -> (TempDir, Arc<StoreRegistry>) {
    let dir = tempfile::tempdir().expect("failed to create temp dir");
    let registry = Arc::new(StoreRegistry::new(dir.path().join("stores")));
    (dir, registry)
}

/// Write `<root>/<class>/<file>` for each pair; file contents are the
/// descriptor as comma-separated floats.
pub fn image_tree(root: &Path, images: &[(&str, &str, &[f32])]) -> PathBuf {
    for (class, file, vector) in images {
        let class_dir = root.join(class);
        fs::create_dir_all(&class_dir).expect("failed to create class dir");
        let body: Vec<String> = vector.iter().map(ToString::to_string).collect();
        fs::write(class_dir.join(file), body.join(",")).expect("failed to write image");
    }
    root.to_path_buf()
}

/// Extractor that parses the comma-separated floats written by [`image_tree`].
///
/// A file containing `fail` makes extraction fail.
pub struct FileExtractor;

impl Extractor for FileExtractor {
    fn extract(&self, image: &Path) -> Result<Vec<f32>, ExtractionError> {
        let content = fs::read_to_string(image)
            .map_err(|source| ExtractionError::Unreadable { path: image.to_path_buf(), source })?;
        content
            .trim()
            .split(',')
            .map(|v| v.parse::<f32>().map_err(|e| ExtractionError::failed(image, e.to_string())))
            .collect()
    }
}

pub fn file_extractor() -> Arc<dyn Extractor> {
    Arc::new(FileExtractor)
}
