//! Source dataset scanning
//!
//! Walks the fixed subdirectory structure of each public dataset and groups
//! the image files it finds by category.

pub mod scanner;
pub mod sources;

pub use scanner::{collect_image_files, is_image_file_name, scan_bucket, ClassBucket, IMAGE_EXTENSIONS};
pub use sources::{layout_for, scan_source, BucketSpec, ScannedSource};
