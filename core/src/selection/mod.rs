//! Per-class sampling and train/val/test splitting
//!
//! Draws a fixed quota from each bucket and partitions the draw 70/15/15
//! with a fixed seed.

mod sampler;
mod splitter;

pub use sampler::{ClassSampler, QuotaShortfall, Sample};
pub use splitter::{
    holdout_count, stratified_split, train_test_split, SplitAssignment, FIRST_HOLDOUT_PERCENT,
    SECOND_HOLDOUT_PERCENT,
};
