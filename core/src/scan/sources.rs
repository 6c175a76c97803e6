use super::scanner::{scan_bucket, ClassBucket};
use crate::error::{CorpusError, Result};
use crate::types::{Category, SourceDataset};
use log::info;
use std::path::{Path, PathBuf};

/// One expected category subdirectory inside a source dataset
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BucketSpec {
    /// Path components below the dataset root
    pub components: &'static [&'static str],
    /// Category the images are labelled with
    pub category: Category,
    /// Whether the images feed the corpus or are scanned and dropped
    pub retained: bool,
}

impl BucketSpec {
    /// Resolves the subdirectory against a dataset root
    pub fn resolve(&self, root: &Path) -> PathBuf {
        self.components
            .iter()
            .fold(root.to_path_buf(), |path, part| path.join(part))
    }
}

/// Expected layout of the pneumonia dataset
pub const PNEUMONIA_LAYOUT: [BucketSpec; 2] = [
    BucketSpec {
        components: &["train", "PNEUMONIA"],
        category: Category::Pneumonia,
        retained: true,
    },
    BucketSpec {
        components: &["train", "NORMAL"],
        category: Category::Normal,
        retained: true,
    },
];

/// Expected layout of the tuberculosis dataset
///
/// Its normal images are scanned but not pooled; the corpus draws normal
/// images only from the pneumonia dataset.
pub const TUBERCULOSIS_LAYOUT: [BucketSpec; 2] = [
    BucketSpec {
        components: &["Tuberculosis"],
        category: Category::Tuberculosis,
        retained: true,
    },
    BucketSpec {
        components: &["Normal"],
        category: Category::Normal,
        retained: false,
    },
];

/// Returns the hardcoded layout of a source dataset
pub fn layout_for(dataset: SourceDataset) -> &'static [BucketSpec] {
    match dataset {
        SourceDataset::Pneumonia => &PNEUMONIA_LAYOUT,
        SourceDataset::Tuberculosis => &TUBERCULOSIS_LAYOUT,
    }
}

/// Buckets discovered in one source dataset
#[derive(Debug, Clone)]
pub struct ScannedSource {
    pub dataset: SourceDataset,
    /// Buckets that feed the corpus, in layout order
    pub buckets: Vec<ClassBucket>,
    /// Buckets that were scanned and dropped
    pub discarded: Vec<ClassBucket>,
}

impl ScannedSource {
    /// Total number of discarded images
    pub fn discarded_count(&self) -> usize {
        self.discarded.iter().map(ClassBucket::len).sum()
    }
}

/// Scans every expected subdirectory of a source dataset
///
/// All subdirectories are checked before any is walked, so a missing one
/// fails the dataset up front.
///
/// # Errors
///
/// Returns `DirectoryNotFound` naming the first missing subdirectory.
pub fn scan_source(dataset: SourceDataset, root: &Path) -> Result<ScannedSource> {
    let layout = layout_for(dataset);

    for expected in layout {
        let dir = expected.resolve(root);
        if !dir.is_dir() {
            return Err(CorpusError::DirectoryNotFound { path: dir });
        }
    }

    let mut buckets = Vec::new();
    let mut discarded = Vec::new();
    for expected in layout {
        let bucket = scan_bucket(&expected.resolve(root), expected.category)?;
        info!(
            "{}: found {} {} images{}",
            dataset,
            bucket.len(),
            expected.category,
            if expected.retained { "" } else { " (not pooled)" }
        );
        if expected.retained {
            buckets.push(bucket);
        } else {
            discarded.push(bucket);
        }
    }

    Ok(ScannedSource {
        dataset,
        buckets,
        discarded,
    })
}
