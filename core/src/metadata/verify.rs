use super::record::{MetadataTable, ProcessedRecord};
use super::recorder::scan_layout;
use crate::error::Result;
use crate::types::CanonicalName;
use std::collections::HashSet;
use std::fmt;
use std::path::{Path, PathBuf};

/// A single inconsistency between the table and the canonical layout
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "json", derive(serde::Serialize))]
#[cfg_attr(feature = "json", serde(tag = "kind", rename_all = "snake_case"))]
pub enum Problem {
    /// Row points at a file that does not exist
    MissingFile { filepath: PathBuf },
    /// Row does not have exactly one label flag set
    NotOneHot { image_id: String },
    /// Row source disagrees with its label
    SourceMismatch { image_id: String },
    /// Filename does not encode the row's category and split
    NameMismatch { image_id: String },
    /// Image on disk with no row in the table
    Unrecorded { filepath: PathBuf },
}

impl fmt::Display for Problem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Problem::MissingFile { filepath } => {
                write!(f, "missing file: {}", filepath.display())
            }
            Problem::NotOneHot { image_id } => write!(f, "labels not one-hot: {}", image_id),
            Problem::SourceMismatch { image_id } => {
                write!(f, "source does not match label: {}", image_id)
            }
            Problem::NameMismatch { image_id } => {
                write!(f, "name does not match directory: {}", image_id)
            }
            Problem::Unrecorded { filepath } => {
                write!(f, "not in table: {}", filepath.display())
            }
        }
    }
}

/// Outcome of checking a metadata table
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "json", derive(serde::Serialize))]
pub struct VerificationReport {
    pub rows_checked: usize,
    pub problems: Vec<Problem>,
}

impl VerificationReport {
    /// Whether no problems were found
    pub fn is_ok(&self) -> bool {
        self.problems.is_empty()
    }
}

impl fmt::Display for VerificationReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Metadata Verification")?;
        writeln!(f, "=====================")?;
        writeln!(f, "Rows checked: {}", self.rows_checked)?;
        writeln!(f, "Problems:     {}", self.problems.len())?;
        for problem in &self.problems {
            writeln!(f, "  - {}", problem)?;
        }
        Ok(())
    }
}

fn check_row(row: &ProcessedRecord, problems: &mut Vec<Problem>) {
    if !row.filepath.is_file() {
        problems.push(Problem::MissingFile {
            filepath: row.filepath.clone(),
        });
    }

    let Some(category) = row.category() else {
        problems.push(Problem::NotOneHot {
            image_id: row.image_id.clone(),
        });
        return;
    };

    if category.source() != row.source {
        problems.push(Problem::SourceMismatch {
            image_id: row.image_id.clone(),
        });
    }

    // Foreign names are allowed in the layout; only a canonical name that
    // contradicts the row is a problem.
    if let Ok(name) = CanonicalName::parse(&row.image_id) {
        if name.category != category || name.split != row.split {
            problems.push(Problem::NameMismatch {
                image_id: row.image_id.clone(),
            });
        }
    }
}

impl MetadataTable {
    /// Checks every row for referential integrity and label consistency
    pub fn verify(&self) -> VerificationReport {
        let mut problems = Vec::new();
        for row in &self.rows {
            check_row(row, &mut problems);
        }
        VerificationReport {
            rows_checked: self.rows.len(),
            problems,
        }
    }

    /// Verifies rows and also reports images on disk that have no row
    pub fn reconcile(&self, output_root: &Path) -> Result<VerificationReport> {
        let mut report = self.verify();
        let recorded: HashSet<&Path> = self.rows.iter().map(|r| r.filepath.as_path()).collect();

        for row in scan_layout(output_root)?.rows {
            if !recorded.contains(row.filepath.as_path()) {
                report.problems.push(Problem::Unrecorded {
                    filepath: row.filepath,
                });
            }
        }

        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::materialize::{class_dir, prepare_layout};
    use crate::metadata::record::LabelFlags;
    use crate::metadata::recorder::record_metadata;
    use crate::types::{Category, SourceDataset, Split};
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_verify_clean_table() {
        let out = TempDir::new().unwrap();
        prepare_layout(out.path()).unwrap();
        fs::write(
            class_dir(out.path(), Split::Train, Category::Pneumonia).join("pneumonia_train_0000.png"),
            b"x",
        )
        .unwrap();

        let table = record_metadata(out.path()).unwrap();
        let report = table.reconcile(out.path()).unwrap();

        assert!(report.is_ok(), "{}", report);
        assert_eq!(report.rows_checked, 1);
    }

    #[test]
    fn test_verify_detects_row_problems() {
        let out = TempDir::new().unwrap();
        let mut broken = ProcessedRecord::new(
            out.path().join("gone.png"),
            Category::Tuberculosis,
            Split::Val,
        );
        broken.labels = LabelFlags {
            pneumonia: 1,
            tb: 1,
            normal: 0,
        };

        let path = out.path().join("pneumonia_test_0000.png");
        fs::write(&path, b"x").unwrap();
        let mut mislabelled = ProcessedRecord::new(path, Category::Pneumonia, Split::Val);
        mislabelled.source = SourceDataset::Tuberculosis;

        let report = MetadataTable::new(vec![broken, mislabelled]).verify();

        assert_eq!(
            report.problems,
            vec![
                Problem::MissingFile {
                    filepath: out.path().join("gone.png")
                },
                Problem::NotOneHot {
                    image_id: "gone.png".to_string()
                },
                Problem::SourceMismatch {
                    image_id: "pneumonia_test_0000.png".to_string()
                },
                Problem::NameMismatch {
                    image_id: "pneumonia_test_0000.png".to_string()
                },
            ]
        );
    }

    #[test]
    fn test_reconcile_reports_unrecorded_files() {
        let out = TempDir::new().unwrap();
        prepare_layout(out.path()).unwrap();
        let table = record_metadata(out.path()).unwrap();

        let extra = class_dir(out.path(), Split::Test, Category::Normal).join("normal_test_0000.jpg");
        fs::write(&extra, b"x").unwrap();

        let report = table.reconcile(out.path()).unwrap();
        assert_eq!(report.problems, vec![Problem::Unrecorded { filepath: extra }]);
    }
}
