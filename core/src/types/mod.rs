//! Core type definitions for corpus assembly
//!
//! This module provides the fundamental types used throughout the library:
//! - [`Category`]: Diagnostic category (pneumonia, tuberculosis, normal)
//! - [`Split`]: Dataset partition (train, val, test)
//! - [`SourceDataset`]: Public dataset an image was drawn from
//! - [`Diagnosis`]: Binary classifier verdict
//! - [`CanonicalName`]: Synthesized filename codec for the canonical layout
//! - [`PipelineConfig`]: Configuration for one assembly run

mod canonical_name;
mod config;
mod enums;

pub use canonical_name::CanonicalName;
pub use config::{metadata_path_for, PipelineConfig, Quotas, DEFAULT_SEED};
pub use enums::{Category, Diagnosis, SourceDataset, Split, ALL_CATEGORIES, ALL_SPLITS};
