//! Dataset directory layout: one subdirectory per class, images inside.

use std::path::{Path, PathBuf};

use walkdir::{DirEntry, WalkDir};

use crate::error::{Error, Result};

/// File extensions treated as images, compared case-insensitively.
pub const IMAGE_EXTENSIONS: [&str; 5] = ["png", "jpg", "jpeg", "bmp", "gif"];

/// Whether `path` has a recognized image extension.
#[must_use]
pub fn is_recognized_image(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|ext| IMAGE_EXTENSIONS.iter().any(|known| ext.eq_ignore_ascii_case(known)))
}

/// One class of a dataset and its candidate files.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassEntry {
    /// Class label, the directory name.
    pub name: String,
    /// Files of the class in order. Not all of them need to be images.
    pub files: Vec<PathBuf>,
}

impl ClassEntry {
    /// Create a class entry.
    #[must_use]
    pub fn new(name: impl Into<String>, files: Vec<PathBuf>) -> Self {
        Self { name: name.into(), files }
    }
}

/// The ordered classes of a dataset.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClassTree {
    classes: Vec<ClassEntry>,
}

impl ClassTree {
    /// Build a tree from already listed classes.
    #[must_use]
    pub fn new(classes: Vec<ClassEntry>) -> Self {
        Self { classes }
    }

    /// Read a tree from `dir/<class>/<file>`.
    ///
    /// Classes and files are sorted by name. Hidden entries are skipped, as
    /// are files directly under `dir` and anything nested deeper than one
    /// level inside a class.
    ///
    /// # Errors
    ///
    /// Returns [`Error::StorageUnavailable`] if `dir` or a class directory
    /// can't be read.
    pub fn from_dir(dir: impl AsRef<Path>) -> Result<Self> {
        let dir = dir.as_ref();
        let mut classes = Vec::new();

        for class_dir in list_children(dir)? {
            if !class_dir.file_type().is_dir() {
                continue;
            }
            let name = class_dir.file_name().to_string_lossy().into_owned();

            let files = list_children(class_dir.path())?
                .into_iter()
                .filter(|entry| entry.file_type().is_file())
                .map(DirEntry::into_path)
                .collect();

            classes.push(ClassEntry { name, files });
        }

        Ok(Self { classes })
    }

    /// The classes in order.
    #[must_use]
    pub fn classes(&self) -> &[ClassEntry] {
        &self.classes
    }

    /// Number of recognized images across all classes.
    #[must_use]
    pub fn image_count(&self) -> usize {
        self.classes
            .iter()
            .map(|class| class.files.iter().filter(|f| is_recognized_image(f)).count())
            .sum()
    }

    /// Check if the tree has no classes.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.classes.is_empty()
    }
}

/// Immediate, non-hidden children of `dir`, sorted by file name.
fn list_children(dir: &Path) -> Result<Vec<DirEntry>> {
    WalkDir::new(dir)
        .min_depth(1)
        .max_depth(1)
        .follow_links(true)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|entry| !is_hidden(entry))
        .map(|entry| {
            entry.map_err(|e| Error::StorageUnavailable(format!("{}: {e}", dir.display())))
        })
        .collect()
}

fn is_hidden(entry: &DirEntry) -> bool {
    entry.file_name().to_str().is_some_and(|s| s.starts_with('.'))
}
