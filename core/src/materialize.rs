//! Canonical layout materialization
//!
//! Copies selected source images into
//! `<output_root>/<split>/<category>/<category>_<split>_<NNNN><ext>`.

use crate::error::{CorpusError, Result};
use crate::types::{metadata_path_for, CanonicalName, Category, Split, ALL_CATEGORIES, ALL_SPLITS};
use log::{debug, info, warn};
use std::fs;
use std::path::{Path, PathBuf};

/// Directory holding one category of one split
pub fn class_dir(output_root: &Path, split: Split, category: Category) -> PathBuf {
    output_root
        .join(split.simple_name())
        .join(category.simple_name())
}

/// Returns the extension of `path` with its leading dot, or an empty string
pub fn extension_of(path: &Path) -> String {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| format!(".{}", ext))
        .unwrap_or_default()
}

/// Creates every split/category directory of the canonical layout
///
/// Existing directories are left as they are.
pub fn prepare_layout(output_root: &Path) -> Result<()> {
    for split in ALL_SPLITS {
        for category in ALL_CATEGORIES {
            fs::create_dir_all(class_dir(output_root, split, category))?;
        }
    }
    debug!("Canonical layout ready under {}", output_root.display());
    Ok(())
}

/// Removes the canonical class directories and the metadata table
///
/// Only the paths the pipeline owns are touched; anything else under the
/// output root is kept.
pub fn clean_layout(output_root: &Path) -> Result<()> {
    for split in ALL_SPLITS {
        for category in ALL_CATEGORIES {
            let dir = class_dir(output_root, split, category);
            if dir.is_dir() {
                warn!("Removing {}", dir.display());
                fs::remove_dir_all(&dir)?;
            }
        }
    }

    let metadata = metadata_path_for(output_root);
    if metadata.is_file() {
        warn!("Removing {}", metadata.display());
        fs::remove_file(&metadata)?;
    }

    Ok(())
}

/// Copies `items` into the canonical layout for one category and split
///
/// Sequence numbers follow the position in `items`, starting at `0000`.
/// Existing files with the same name are overwritten without notice.
///
/// # Returns
///
/// Destination paths in the same order as `items`
///
/// # Errors
///
/// Returns `CopyFailure` naming the first file that could not be copied;
/// files copied before it stay in place.
pub fn materialize(
    output_root: &Path,
    category: Category,
    split: Split,
    items: &[PathBuf],
) -> Result<Vec<PathBuf>> {
    let dir = class_dir(output_root, split, category);
    fs::create_dir_all(&dir)?;

    let mut destinations = Vec::with_capacity(items.len());
    for (index, source_path) in items.iter().enumerate() {
        let name = CanonicalName::new(category, split, index, &extension_of(source_path));
        let destination = dir.join(name.file_name());

        fs::copy(source_path, &destination).map_err(|source| CorpusError::CopyFailure {
            source_path: source_path.clone(),
            destination: destination.clone(),
            source,
        })?;

        destinations.push(destination);
    }

    info!(
        "Copied {} {} images to {}",
        destinations.len(),
        category,
        dir.display()
    );
    Ok(destinations)
}
