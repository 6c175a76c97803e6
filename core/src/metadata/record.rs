use crate::error::{CorpusError, Result};
use crate::types::{Category, SourceDataset, Split};
use log::info;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Column order of the metadata table
pub const METADATA_COLUMNS: [&str; 7] = [
    "image_id", "filepath", "pneumonia", "tb", "normal", "source", "split",
];

/// One-hot disease flags of a record
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "json", derive(serde::Serialize))]
pub struct LabelFlags {
    pub pneumonia: u8,
    pub tb: u8,
    pub normal: u8,
}

impl LabelFlags {
    /// Flags with exactly the bit for `category` set
    pub fn for_category(category: Category) -> Self {
        Self {
            pneumonia: u8::from(category == Category::Pneumonia),
            tb: u8::from(category == Category::Tuberculosis),
            normal: u8::from(category == Category::Normal),
        }
    }

    /// Whether exactly one flag is 1 and the others are 0
    pub fn is_one_hot(&self) -> bool {
        let flags = [self.pneumonia, self.tb, self.normal];
        flags.iter().all(|&f| f <= 1) && flags.iter().map(|&f| f as u32).sum::<u32>() == 1
    }

    /// Category encoded by the flags, if they are one-hot
    pub fn category(&self) -> Option<Category> {
        if !self.is_one_hot() {
            return None;
        }
        Some(if self.pneumonia == 1 {
            Category::Pneumonia
        } else if self.tb == 1 {
            Category::Tuberculosis
        } else {
            Category::Normal
        })
    }
}

/// One materialized image as listed in the metadata table
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "json", derive(serde::Serialize))]
pub struct ProcessedRecord {
    /// Filename within its category directory
    pub image_id: String,
    /// Path of the file, rooted like the output root
    pub filepath: PathBuf,
    pub labels: LabelFlags,
    pub source: SourceDataset,
    pub split: Split,
}

impl ProcessedRecord {
    /// Creates a record for a file found under `<split>/<category>/`
    ///
    /// Labels and source follow from the category alone.
    pub fn new(filepath: PathBuf, category: Category, split: Split) -> Self {
        let image_id = filepath
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default();
        Self {
            image_id,
            filepath,
            labels: LabelFlags::for_category(category),
            source: category.source(),
            split,
        }
    }

    /// Category encoded by the label flags
    pub fn category(&self) -> Option<Category> {
        self.labels.category()
    }
}

/// Flat CSV shape of a [`ProcessedRecord`], one field per column
#[derive(Debug, Serialize, Deserialize)]
struct CsvRow {
    image_id: String,
    filepath: String,
    pneumonia: u8,
    tb: u8,
    normal: u8,
    source: String,
    split: String,
}

impl From<&ProcessedRecord> for CsvRow {
    fn from(record: &ProcessedRecord) -> Self {
        Self {
            image_id: record.image_id.clone(),
            filepath: record.filepath.to_string_lossy().into_owned(),
            pneumonia: record.labels.pneumonia,
            tb: record.labels.tb,
            normal: record.labels.normal,
            source: record.source.simple_name().to_string(),
            split: record.split.simple_name().to_string(),
        }
    }
}

impl CsvRow {
    fn into_record(self, line: usize) -> Result<ProcessedRecord> {
        let source = SourceDataset::from_str(&self.source).ok_or_else(|| {
            CorpusError::MetadataParse(format!("line {}: unknown source '{}'", line, self.source))
        })?;
        let split = Split::from_str(&self.split).ok_or_else(|| {
            CorpusError::MetadataParse(format!("line {}: unknown split '{}'", line, self.split))
        })?;

        Ok(ProcessedRecord {
            image_id: self.image_id,
            filepath: PathBuf::from(self.filepath),
            labels: LabelFlags {
                pneumonia: self.pneumonia,
                tb: self.tb,
                normal: self.normal,
            },
            source,
            split,
        })
    }
}

/// Ordered collection of processed records
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "json", derive(serde::Serialize))]
pub struct MetadataTable {
    pub rows: Vec<ProcessedRecord>,
}

impl MetadataTable {
    /// Creates a table from rows
    pub fn new(rows: Vec<ProcessedRecord>) -> Self {
        Self { rows }
    }

    /// Number of rows
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Whether the table has no rows
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Number of rows drawn from a source dataset
    pub fn count_source(&self, source: SourceDataset) -> usize {
        self.rows.iter().filter(|r| r.source == source).count()
    }

    /// Number of rows for a category and split
    pub fn count(&self, category: Category, split: Split) -> usize {
        self.rows
            .iter()
            .filter(|r| r.split == split && r.category() == Some(category))
            .count()
    }

    /// Writes the table as CSV with a header row and no index column
    ///
    /// # Errors
    ///
    /// Any failure is reported as `MetadataWriteFailure`.
    pub fn write_csv(&self, path: &Path) -> Result<()> {
        let fail = |reason: String| CorpusError::MetadataWriteFailure {
            path: path.to_path_buf(),
            reason,
        };

        // Header is written by hand so an empty table still carries it
        let mut writer = csv::WriterBuilder::new()
            .has_headers(false)
            .from_path(path)
            .map_err(|e| fail(e.to_string()))?;
        writer
            .write_record(METADATA_COLUMNS)
            .map_err(|e| fail(e.to_string()))?;
        for row in &self.rows {
            writer
                .serialize(CsvRow::from(row))
                .map_err(|e| fail(e.to_string()))?;
        }
        writer.flush().map_err(|e| fail(e.to_string()))?;

        info!("Metadata saved with {} entries to {}", self.len(), path.display());
        Ok(())
    }

    /// Reads a table previously written by [`MetadataTable::write_csv`]
    ///
    /// # Errors
    ///
    /// Returns `MetadataParse` if the header or a row is malformed.
    pub fn read_csv(path: &Path) -> Result<Self> {
        let mut reader = csv::ReaderBuilder::new().has_headers(true).from_path(path)?;

        let headers = reader.headers()?.clone();
        let found: Vec<&str> = headers.iter().collect();
        if found != METADATA_COLUMNS {
            return Err(CorpusError::MetadataParse(format!(
                "unexpected header {:?}",
                found
            )));
        }

        let mut rows = Vec::new();
        for (i, row) in reader.deserialize::<CsvRow>().enumerate() {
            // Line 1 is the header
            let line = i + 2;
            let row = row.map_err(|e| {
                CorpusError::MetadataParse(format!("line {}: {}", line, e))
            })?;
            rows.push(row.into_record(line)?);
        }

        Ok(Self { rows })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use std::fs;
    use tempfile::TempDir;

    #[rstest]
    #[case(Category::Pneumonia, 1, 0, 0, SourceDataset::Pneumonia)]
    #[case(Category::Tuberculosis, 0, 1, 0, SourceDataset::Tuberculosis)]
    #[case(Category::Normal, 0, 0, 1, SourceDataset::Pneumonia)]
    fn test_record_labels_from_category(
        #[case] category: Category,
        #[case] pneumonia: u8,
        #[case] tb: u8,
        #[case] normal: u8,
        #[case] source: SourceDataset,
    ) {
        let record = ProcessedRecord::new(PathBuf::from("out/train/x/img.png"), category, Split::Train);
        assert_eq!(record.labels, LabelFlags { pneumonia, tb, normal });
        assert!(record.labels.is_one_hot());
        assert_eq!(record.category(), Some(category));
        assert_eq!(record.source, source);
        assert_eq!(record.image_id, "img.png");
    }

    #[rstest]
    #[case(LabelFlags { pneumonia: 0, tb: 0, normal: 0 })]
    #[case(LabelFlags { pneumonia: 1, tb: 1, normal: 0 })]
    #[case(LabelFlags { pneumonia: 2, tb: 0, normal: 0 })]
    fn test_label_flags_not_one_hot(#[case] flags: LabelFlags) {
        assert!(!flags.is_one_hot());
        assert_eq!(flags.category(), None);
    }

    #[test]
    fn test_write_and_read_csv() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("metadata.csv");
        let table = MetadataTable::new(vec![
            ProcessedRecord::new(
                PathBuf::from("data/processed/train/pneumonia/pneumonia_train_0000.jpeg"),
                Category::Pneumonia,
                Split::Train,
            ),
            ProcessedRecord::new(
                PathBuf::from("data/processed/test/tuberculosis/tuberculosis_test_0003.png"),
                Category::Tuberculosis,
                Split::Test,
            ),
        ]);

        table.write_csv(&path).unwrap();

        let contents = fs::read_to_string(&path).unwrap();
        let mut lines = contents.lines();
        assert_eq!(
            lines.next(),
            Some("image_id,filepath,pneumonia,tb,normal,source,split")
        );
        assert_eq!(
            lines.next(),
            Some("pneumonia_train_0000.jpeg,data/processed/train/pneumonia/pneumonia_train_0000.jpeg,1,0,0,pneumonia_dataset,train")
        );
        assert_eq!(
            lines.next(),
            Some("tuberculosis_test_0003.png,data/processed/test/tuberculosis/tuberculosis_test_0003.png,0,1,0,tb_dataset,test")
        );

        assert_eq!(MetadataTable::read_csv(&path).unwrap(), table);
    }

    #[test]
    fn test_write_csv_empty_table_has_header() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("metadata.csv");
        MetadataTable::default().write_csv(&path).unwrap();
        assert_eq!(
            fs::read_to_string(&path).unwrap().trim_end(),
            "image_id,filepath,pneumonia,tb,normal,source,split"
        );
    }

    #[test]
    fn test_write_csv_unwritable_path() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("missing_dir").join("metadata.csv");
        let err = MetadataTable::default().write_csv(&path).unwrap_err();
        assert!(matches!(err, CorpusError::MetadataWriteFailure { path: p, .. } if p == path));
    }

    #[test]
    fn test_read_csv_rejects_bad_header() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("metadata.csv");
        fs::write(&path, "id,path\nx,y\n").unwrap();
        assert!(matches!(
            MetadataTable::read_csv(&path),
            Err(CorpusError::MetadataParse(_))
        ));
    }

    #[rstest]
    #[case("a.png,a.png,x,0,0,pneumonia_dataset,train\n")]
    #[case("a.png,a.png,1,0,0,pneumonia_dataset\n")]
    fn test_read_csv_rejects_malformed_row(#[case] row: &str) {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("metadata.csv");
        fs::write(
            &path,
            format!("image_id,filepath,pneumonia,tb,normal,source,split\n{}", row),
        )
        .unwrap();
        let err = MetadataTable::read_csv(&path).unwrap_err();
        assert!(matches!(err, CorpusError::MetadataParse(ref msg) if msg.starts_with("line 2")));
    }

    #[test]
    fn test_read_csv_rejects_bad_split() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("metadata.csv");
        fs::write(
            &path,
            "image_id,filepath,pneumonia,tb,normal,source,split\na.png,a.png,1,0,0,pneumonia_dataset,holdout\n",
        )
        .unwrap();
        let err = MetadataTable::read_csv(&path).unwrap_err();
        assert!(err.to_string().contains("line 2"));
    }
}
