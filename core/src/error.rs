use std::path::PathBuf;
use thiserror::Error;

/// Result type for corpus and triage operations
pub type Result<T> = std::result::Result<T, CorpusError>;

/// Error types for corpus assembly, inference and reporting
#[derive(Error, Debug)]
pub enum CorpusError {
    /// An expected source subdirectory is missing
    #[error("Directory not found: {}", path.display())]
    DirectoryNotFound { path: PathBuf },

    /// Copying a selected image into the canonical layout failed
    #[error(
        "Copy failed: {} -> {}: {source}",
        source_path.display(),
        destination.display()
    )]
    CopyFailure {
        source_path: PathBuf,
        destination: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The metadata table could not be written
    #[error("Metadata write failed for {}: {reason}", path.display())]
    MetadataWriteFailure { path: PathBuf, reason: String },

    /// A metadata table on disk is malformed
    #[error("Metadata parse error: {0}")]
    MetadataParse(String),

    /// Classifier returned a score outside [0, 1]
    #[error("Invalid score: {0}")]
    InvalidScore(f32),

    /// Prediction record failed validation
    #[error("Invalid prediction: {0}")]
    InvalidPrediction(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Image decoding error
    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),

    /// Directory traversal error
    #[error("Walk error: {0}")]
    Walk(#[from] walkdir::Error),

    /// I/O error
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

// Helper conversions
impl From<String> for CorpusError {
    fn from(s: String) -> Self {
        CorpusError::Config(s)
    }
}

impl From<&str> for CorpusError {
    fn from(s: &str) -> Self {
        CorpusError::Config(s.to_string())
    }
}

impl From<csv::Error> for CorpusError {
    fn from(e: csv::Error) -> Self {
        CorpusError::MetadataParse(format!("{}", e))
    }
}

#[cfg(feature = "json")]
impl From<serde_json::Error> for CorpusError {
    fn from(e: serde_json::Error) -> Self {
        CorpusError::InvalidPrediction(format!("{}", e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_directory_not_found_message() {
        let err = CorpusError::DirectoryNotFound {
            path: PathBuf::from("raw/Tuberculosis"),
        };
        assert_eq!(err.to_string(), "Directory not found: raw/Tuberculosis");
    }

    #[test]
    fn test_copy_failure_names_both_paths() {
        let err = CorpusError::CopyFailure {
            source_path: PathBuf::from("a.png"),
            destination: PathBuf::from("out/b.png"),
            source: std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"),
        };
        let msg = err.to_string();
        assert!(msg.contains("a.png"));
        assert!(msg.contains("out/b.png"));
        assert!(msg.contains("denied"));
    }
}
