use crate::error::Result;
use crate::materialize::{clean_layout, materialize, prepare_layout};
use crate::metadata::record_metadata;
use crate::scan::scan_source;
use crate::selection::{stratified_split, ClassSampler, QuotaShortfall};
use crate::types::{Category, PipelineConfig, SourceDataset, ALL_SPLITS};
use log::info;
use std::path::PathBuf;

/// Source datasets in processing order
pub const SOURCE_ORDER: [SourceDataset; 2] = [SourceDataset::Pneumonia, SourceDataset::Tuberculosis];

/// Corpus assembly pipeline
///
/// Scans both source datasets, samples each class up to its quota, splits
/// every sample 70/15/15, copies the result into the canonical layout and
/// finally rebuilds the metadata table from disk.
///
/// # Example
///
/// ```no_run
/// use cxrtriage_core::{Pipeline, PipelineConfig};
///
/// let summary = Pipeline::new(PipelineConfig::default()).run().unwrap();
/// println!("{} rows written", summary.metadata_rows);
/// ```
pub struct Pipeline {
    config: PipelineConfig,
}

impl Pipeline {
    /// Creates a pipeline for a configuration
    pub fn new(config: PipelineConfig) -> Self {
        Self { config }
    }

    /// Returns the configuration
    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Runs the full pipeline
    ///
    /// # Errors
    ///
    /// Any error aborts the run. Output written before the failure is left in
    /// place and the metadata table is not rewritten.
    pub fn run(&self) -> Result<RunSummary> {
        self.config.validate()?;
        let output_root = &self.config.output_root;
        info!("Starting data preprocessing into {}", output_root.display());

        if self.config.clean {
            clean_layout(output_root)?;
        }
        prepare_layout(output_root)?;

        let mut sampler = ClassSampler::new(self.config.seed);
        let mut summary = RunSummary {
            metadata_path: self.config.metadata_path(),
            ..RunSummary::default()
        };

        for dataset in SOURCE_ORDER {
            self.process_dataset(dataset, &mut sampler, &mut summary)?;
        }

        let table = record_metadata(output_root)?;
        summary.metadata_rows = table.len();

        info!("Data preprocessing complete");
        Ok(summary)
    }

    /// Root directory of a source dataset
    pub fn source_root(&self, dataset: SourceDataset) -> &PathBuf {
        match dataset {
            SourceDataset::Pneumonia => &self.config.pneumonia_root,
            SourceDataset::Tuberculosis => &self.config.tuberculosis_root,
        }
    }

    /// Quota for a category
    pub fn quota_for(&self, category: Category) -> usize {
        let quotas = &self.config.quotas;
        match category {
            Category::Pneumonia => quotas.pneumonia,
            Category::Tuberculosis => quotas.tuberculosis,
            Category::Normal => quotas.normal,
        }
    }

    /// Scans, samples, splits and materializes one source dataset
    fn process_dataset(
        &self,
        dataset: SourceDataset,
        sampler: &mut ClassSampler,
        summary: &mut RunSummary,
    ) -> Result<()> {
        let root = self.source_root(dataset);
        info!("Processing {} from {}", dataset, root.display());

        let scanned = scan_source(dataset, root)?;
        summary.discarded += scanned.discarded_count();

        for bucket in &scanned.buckets {
            let sample = sampler.sample(bucket, self.quota_for(bucket.category));
            if let Some(shortfall) = sample.shortfall() {
                summary.shortfalls.push(shortfall);
            }

            let assignment = stratified_split(&sample.images, self.config.seed);
            for split in ALL_SPLITS {
                materialize(
                    &self.config.output_root,
                    bucket.category,
                    split,
                    assignment.get(split),
                )?;
            }

            summary.buckets.push(BucketSummary {
                category: bucket.category,
                source: dataset,
                available: sample.available,
                requested: sample.requested,
                sampled: sample.images.len(),
                train: assignment.train.len(),
                val: assignment.val.len(),
                test: assignment.test.len(),
            });
        }

        Ok(())
    }
}

/// Counts for one sampled bucket
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "json", derive(serde::Serialize))]
pub struct BucketSummary {
    pub category: Category,
    pub source: SourceDataset,
    pub available: usize,
    pub requested: usize,
    pub sampled: usize,
    pub train: usize,
    pub val: usize,
    pub test: usize,
}

/// Result of a pipeline run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "json", derive(serde::Serialize))]
pub struct RunSummary {
    /// Per-bucket counts in processing order
    pub buckets: Vec<BucketSummary>,
    /// Buckets that did not meet their quota
    pub shortfalls: Vec<QuotaShortfall>,
    /// Images scanned but not pooled
    pub discarded: usize,
    /// Rows in the metadata table after the run
    pub metadata_rows: usize,
    /// Where the metadata table was written
    pub metadata_path: PathBuf,
}

impl RunSummary {
    /// Returns the summary for a category
    pub fn bucket(&self, category: Category) -> Option<&BucketSummary> {
        self.buckets.iter().find(|b| b.category == category)
    }
}
