use crate::error::{CorpusError, Result};
use crate::types::Category;
use log::debug;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Recognized image filename suffixes (case-sensitive)
pub const IMAGE_EXTENSIONS: [&str; 3] = [".jpeg", ".jpg", ".png"];

/// Source images discovered for one category in one dataset
#[derive(Debug, Clone, PartialEq)]
pub struct ClassBucket {
    pub category: Category,
    pub images: Vec<PathBuf>,
}

impl ClassBucket {
    /// Creates a new bucket
    pub fn new(category: Category, images: Vec<PathBuf>) -> Self {
        Self { category, images }
    }

    /// Number of images available
    pub fn len(&self) -> usize {
        self.images.len()
    }

    /// Whether no images were found
    pub fn is_empty(&self) -> bool {
        self.images.is_empty()
    }
}

/// Checks whether a filename carries a recognized image suffix
///
/// Matching is case-sensitive: `scan.PNG` is not an image.
pub fn is_image_file_name(name: &str) -> bool {
    IMAGE_EXTENSIONS.iter().any(|ext| name.ends_with(ext))
}

/// Recursively collects image files below `directory`
///
/// Entries are visited in filename order so that a fixed tree always yields
/// the same list. A symlink counts when it points at a regular file; linked
/// directories are not descended into.
///
/// # Errors
///
/// Returns `DirectoryNotFound` if `directory` is not a directory, and
/// propagates traversal errors.
pub fn collect_image_files(directory: &Path) -> Result<Vec<PathBuf>> {
    if !directory.is_dir() {
        return Err(CorpusError::DirectoryNotFound {
            path: directory.to_path_buf(),
        });
    }

    let mut files = Vec::new();
    for entry in WalkDir::new(directory).sort_by_file_name() {
        let entry = entry?;
        let is_file = entry.file_type().is_file()
            || (entry.path_is_symlink() && entry.path().is_file());
        if !is_file {
            continue;
        }
        let is_image = entry
            .file_name()
            .to_str()
            .map(is_image_file_name)
            .unwrap_or(false);
        if is_image {
            files.push(entry.into_path());
        } else {
            debug!("Ignoring non-image file: {}", entry.path().display());
        }
    }

    Ok(files)
}

/// Scans one category subdirectory into a bucket
pub fn scan_bucket(directory: &Path, category: Category) -> Result<ClassBucket> {
    let images = collect_image_files(directory)?;
    debug!(
        "Found {} {} images in {}",
        images.len(),
        category,
        directory.display()
    );
    Ok(ClassBucket::new(category, images))
}
