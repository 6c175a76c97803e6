use crate::types::Split;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

/// Share held out by the first cut (train vs. temp), in percent
pub const FIRST_HOLDOUT_PERCENT: usize = 30;

/// Share of temp held out by the second cut (val vs. test), in percent
pub const SECOND_HOLDOUT_PERCENT: usize = 50;

/// Number of items held out of `n` for a percentage, rounded up
///
/// Integer arithmetic keeps the boundary exact: 30% of 500 is 150, never 149.
pub fn holdout_count(n: usize, percent: usize) -> usize {
    (n * percent).div_ceil(100)
}

/// Seeded two-way shuffle-then-cut
///
/// Shuffles the positions of `items` with a generator seeded from `seed`,
/// then returns `(kept, held_out)`: the first `holdout_count` shuffled
/// positions are held out and the rest are kept, both in shuffled order.
pub fn train_test_split<T: Clone>(items: &[T], holdout_percent: usize, seed: u64) -> (Vec<T>, Vec<T>) {
    let n_holdout = holdout_count(items.len(), holdout_percent);

    let mut order: Vec<usize> = (0..items.len()).collect();
    order.shuffle(&mut ChaCha8Rng::seed_from_u64(seed));

    let held_out = order[..n_holdout].iter().map(|&i| items[i].clone()).collect();
    let kept = order[n_holdout..].iter().map(|&i| items[i].clone()).collect();
    (kept, held_out)
}

/// Three disjoint partitions of one sampled bucket
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SplitAssignment<T> {
    pub train: Vec<T>,
    pub val: Vec<T>,
    pub test: Vec<T>,
}

impl<T> SplitAssignment<T> {
    /// Returns the partition for a split
    pub fn get(&self, split: Split) -> &[T] {
        match split {
            Split::Train => &self.train,
            Split::Val => &self.val,
            Split::Test => &self.test,
        }
    }

    /// Total number of items across all partitions
    pub fn len(&self) -> usize {
        self.train.len() + self.val.len() + self.test.len()
    }

    /// Whether all partitions are empty
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Splits a sample 70/15/15 in two stages
///
/// The first stage holds out 30% as temp, the second splits temp evenly into
/// val and test. Both stages use the same seed value.
///
/// # Example
///
/// ```
/// use cxrtriage_core::stratified_split;
///
/// let items: Vec<u32> = (0..100).collect();
/// let assignment = stratified_split(&items, 42);
///
/// assert_eq!(assignment.train.len(), 70);
/// assert_eq!(assignment.val.len(), 15);
/// assert_eq!(assignment.test.len(), 15);
/// ```
pub fn stratified_split<T: Clone>(items: &[T], seed: u64) -> SplitAssignment<T> {
    let (train, temp) = train_test_split(items, FIRST_HOLDOUT_PERCENT, seed);
    let (val, test) = train_test_split(&temp, SECOND_HOLDOUT_PERCENT, seed);
    SplitAssignment { train, val, test }
}
