pub mod cli;
pub mod error;
pub mod inference;
pub mod materialize;
pub mod metadata;
pub mod pipeline;
#[cfg(feature = "json")]
pub mod report;
pub mod scan;
pub mod selection;
pub mod types;

pub use cli::report::TextReport;
pub use error::{CorpusError, Result};
pub use inference::{Classifier, ImageTensor, Prediction, Scorer};
pub use metadata::{MetadataTable, ProcessedRecord, VerificationReport};
pub use pipeline::{Pipeline, RunSummary};
pub use selection::{stratified_split, QuotaShortfall, SplitAssignment};
pub use types::*;
