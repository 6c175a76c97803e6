use super::record::{MetadataTable, ProcessedRecord};
use crate::error::Result;
use crate::materialize::class_dir;
use crate::scan::is_image_file_name;
use crate::types::{metadata_path_for, ALL_CATEGORIES, ALL_SPLITS};
use log::{debug, info};
use std::fs;
use std::path::{Path, PathBuf};

/// Lists image files directly inside one class directory, sorted by name
///
/// Symlinks to regular files are listed like the files themselves.
fn list_class_dir(dir: &Path) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for entry in fs::read_dir(dir)? {
        let entry = entry?;
        if !entry.path().is_file() {
            continue;
        }
        if entry.file_name().to_str().map(is_image_file_name).unwrap_or(false) {
            files.push(entry.path());
        }
    }
    files.sort();
    Ok(files)
}

/// Builds the metadata table from what is on disk under `output_root`
///
/// Rows follow split order (train, val, test), then category order
/// (pneumonia, tuberculosis, normal), then filename. Labels and source are
/// derived from the directory each file sits in, so leftovers from earlier
/// runs are listed like fresh output. Missing class directories contribute
/// no rows.
pub fn scan_layout(output_root: &Path) -> Result<MetadataTable> {
    let mut rows = Vec::new();

    for split in ALL_SPLITS {
        for category in ALL_CATEGORIES {
            let dir = class_dir(output_root, split, category);
            if !dir.is_dir() {
                debug!("Skipping missing directory {}", dir.display());
                continue;
            }
            for path in list_class_dir(&dir)? {
                rows.push(ProcessedRecord::new(path, category, split));
            }
        }
    }

    Ok(MetadataTable::new(rows))
}

/// Rescans the canonical layout and persists the metadata table
///
/// The table is written to `<output_root>/metadata.csv`.
pub fn record_metadata(output_root: &Path) -> Result<MetadataTable> {
    info!("Creating metadata table...");
    let table = scan_layout(output_root)?;
    table.write_csv(&metadata_path_for(output_root))?;
    Ok(table)
}
