use crate::scan::ClassBucket;
use crate::types::Category;
use log::{info, warn};
use rand::seq::SliceRandom;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use std::fmt;
use std::path::PathBuf;

/// Diagnostic raised when a bucket holds fewer images than its quota
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "json", derive(serde::Serialize))]
pub struct QuotaShortfall {
    pub category: Category,
    pub requested: usize,
    pub available: usize,
}

impl fmt::Display for QuotaShortfall {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}: requested {} images but only {} available",
            self.category, self.requested, self.available
        )
    }
}

/// Images drawn from one bucket
#[derive(Debug, Clone, PartialEq)]
pub struct Sample {
    pub category: Category,
    pub images: Vec<PathBuf>,
    /// Bucket size before sampling
    pub available: usize,
    /// Quota asked for
    pub requested: usize,
}

impl Sample {
    /// Returns the shortfall diagnostic if the quota was not met
    pub fn shortfall(&self) -> Option<QuotaShortfall> {
        (self.available < self.requested).then(|| QuotaShortfall {
            category: self.category,
            requested: self.requested,
            available: self.available,
        })
    }
}

/// Seeded uniform sampler without replacement
///
/// One sampler is shared across all buckets of a run; buckets are drawn in
/// a fixed order so the whole selection is reproducible for a given seed.
pub struct ClassSampler {
    rng: ChaCha8Rng,
}

impl ClassSampler {
    /// Creates a sampler from a seed
    pub fn new(seed: u64) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(seed),
        }
    }

    /// Draws `min(quota, bucket.len())` images uniformly at random
    ///
    /// A bucket smaller than its quota is taken whole and logged at warn
    /// level; callers read the diagnostic from [`Sample::shortfall`].
    pub fn sample(&mut self, bucket: &ClassBucket, quota: usize) -> Sample {
        let available = bucket.len();
        let images: Vec<PathBuf> = bucket
            .images
            .choose_multiple(&mut self.rng, quota.min(available))
            .cloned()
            .collect();

        let sample = Sample {
            category: bucket.category,
            images,
            available,
            requested: quota,
        };

        match sample.shortfall() {
            Some(shortfall) => warn!("Quota shortfall: {}", shortfall),
            None => info!(
                "Sampled {} of {} {} images",
                sample.images.len(),
                available,
                bucket.category
            ),
        }

        sample
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    fn make_bucket(category: Category, n: usize) -> ClassBucket {
        ClassBucket::new(
            category,
            (0..n).map(|i| PathBuf::from(format!("img{:04}.png", i))).collect(),
        )
    }

    #[test]
    fn test_sample_meets_quota() {
        let bucket = make_bucket(Category::Pneumonia, 600);
        let sample = ClassSampler::new(42).sample(&bucket, 500);

        assert_eq!(sample.images.len(), 500);
        assert_eq!(sample.available, 600);
        assert!(sample.shortfall().is_none());

        // Without replacement
        let unique: HashSet<_> = sample.images.iter().collect();
        assert_eq!(unique.len(), 500);
        assert!(sample.images.iter().all(|p| bucket.images.contains(p)));
    }

    #[test]
    fn test_sample_shortfall_takes_all() {
        let bucket = make_bucket(Category::Normal, 100);
        let sample = ClassSampler::new(42).sample(&bucket, 200);

        assert_eq!(sample.images.len(), 100);
        let unique: HashSet<_> = sample.images.iter().collect();
        assert_eq!(unique.len(), 100);

        let shortfall = sample.shortfall().unwrap();
        assert_eq!(shortfall.category, Category::Normal);
        assert_eq!(shortfall.requested, 200);
        assert_eq!(shortfall.available, 100);
        assert_eq!(
            shortfall.to_string(),
            "normal: requested 200 images but only 100 available"
        );
    }

    #[test]
    fn test_sample_exact_quota_is_not_shortfall() {
        let bucket = make_bucket(Category::Tuberculosis, 10);
        let sample = ClassSampler::new(1).sample(&bucket, 10);
        assert_eq!(sample.images.len(), 10);
        assert!(sample.shortfall().is_none());
    }

    #[test]
    fn test_sample_empty_bucket() {
        let bucket = make_bucket(Category::Tuberculosis, 0);
        let sample = ClassSampler::new(42).sample(&bucket, 500);
        assert!(sample.images.is_empty());
        assert!(sample.shortfall().is_some());
    }

    #[test]
    fn test_sample_is_deterministic_for_seed() {
        let bucket = make_bucket(Category::Pneumonia, 300);
        let first = ClassSampler::new(42).sample(&bucket, 50);
        let second = ClassSampler::new(42).sample(&bucket, 50);
        assert_eq!(first.images, second.images);

        let other = ClassSampler::new(43).sample(&bucket, 50);
        assert_ne!(first.images, other.images);
    }
}
