use crate::pipeline::RunSummary;
use std::fmt;

/// Text report formatter for a pipeline run
pub struct TextReport<'a> {
    summary: &'a RunSummary,
}

impl<'a> TextReport<'a> {
    /// Creates a new text report
    pub fn new(summary: &'a RunSummary) -> Self {
        Self { summary }
    }
}

impl<'a> fmt::Display for TextReport<'a> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Corpus Assembly Summary")?;
        writeln!(f, "=======================")?;
        writeln!(f)?;

        for bucket in &self.summary.buckets {
            writeln!(f, "{} ({}):", bucket.category, bucket.source)?;
            writeln!(
                f,
                "  Sampled:   {} of {} (quota {})",
                bucket.sampled, bucket.available, bucket.requested
            )?;
            writeln!(
                f,
                "  Split:     train {} / val {} / test {}",
                bucket.train, bucket.val, bucket.test
            )?;
        }
        writeln!(f)?;

        if !self.summary.shortfalls.is_empty() {
            writeln!(f, "Quota Shortfalls")?;
            writeln!(f, "----------------")?;
            for shortfall in &self.summary.shortfalls {
                writeln!(f, "  {}", shortfall)?;
            }
            writeln!(f)?;
        }

        writeln!(f, "Not pooled:      {}", self.summary.discarded)?;
        writeln!(
            f,
            "Metadata:        {} rows -> {}",
            self.summary.metadata_rows,
            self.summary.metadata_path.display()
        )?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::BucketSummary;
    use crate::selection::QuotaShortfall;
    use crate::types::{Category, SourceDataset};
    use std::path::PathBuf;

    #[test]
    fn test_text_report_format() {
        let summary = RunSummary {
            buckets: vec![BucketSummary {
                category: Category::Normal,
                source: SourceDataset::Pneumonia,
                available: 100,
                requested: 200,
                sampled: 100,
                train: 70,
                val: 15,
                test: 15,
            }],
            shortfalls: vec![QuotaShortfall {
                category: Category::Normal,
                requested: 200,
                available: 100,
            }],
            discarded: 3500,
            metadata_rows: 100,
            metadata_path: PathBuf::from("data/processed/metadata.csv"),
        };

        let output = TextReport::new(&summary).to_string();

        assert!(output.contains("Corpus Assembly Summary"));
        assert!(output.contains("normal (pneumonia_dataset):"));
        assert!(output.contains("  Sampled:   100 of 100 (quota 200)"));
        assert!(output.contains("  Split:     train 70 / val 15 / test 15"));
        assert!(output.contains("normal: requested 200 images but only 100 available"));
        assert!(output.contains("Not pooled:      3500"));
        assert!(output.contains("Metadata:        100 rows -> data/processed/metadata.csv"));
    }

    #[test]
    fn test_text_report_omits_empty_shortfalls() {
        let output = TextReport::new(&RunSummary::default()).to_string();
        assert!(!output.contains("Quota Shortfalls"));
    }
}
