//! Metadata table recording and verification
//!
//! The table is rebuilt from the canonical layout on disk rather than from
//! what the current run copied, so it always reflects the filesystem.

mod record;
mod recorder;
mod verify;

pub use record::{LabelFlags, MetadataTable, ProcessedRecord, METADATA_COLUMNS};
pub use recorder::{record_metadata, scan_layout};
pub use verify::{Problem, VerificationReport};
