use crate::error::{CorpusError, Result};
use std::path::{Path, PathBuf};

/// Seed shared by the sampler and both splitter stages
pub const DEFAULT_SEED: u64 = 42;

/// Per-class sampling quotas
///
/// A quota is an upper bound; buckets smaller than their quota are taken
/// whole and reported as a shortfall.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "json", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "json", serde(default))]
pub struct Quotas {
    /// Pneumonia images drawn from the pneumonia dataset
    pub pneumonia: usize,
    /// Normal images drawn from the pneumonia dataset
    pub normal: usize,
    /// Tuberculosis images drawn from the tuberculosis dataset
    pub tuberculosis: usize,
}

impl Default for Quotas {
    fn default() -> Self {
        Self {
            pneumonia: 500,
            normal: 200,
            tuberculosis: 500,
        }
    }
}

/// Configuration for one corpus assembly run
///
/// # Example
///
/// ```
/// use cxrtriage_core::PipelineConfig;
///
/// let config = PipelineConfig::default()
///     .with_output_root("/tmp/processed")
///     .with_seed(7)
///     .clean_before_write(true);
///
/// assert_eq!(config.seed, 7);
/// assert!(config.clean);
/// assert_eq!(config.metadata_path().to_str(), Some("/tmp/processed/metadata.csv"));
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "json", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "json", serde(default))]
pub struct PipelineConfig {
    /// Root of the pneumonia dataset (contains `train/PNEUMONIA`, `train/NORMAL`)
    pub pneumonia_root: PathBuf,

    /// Root of the tuberculosis dataset (contains `Tuberculosis`, `Normal`)
    pub tuberculosis_root: PathBuf,

    /// Root of the canonical output layout
    pub output_root: PathBuf,

    /// Seed for sampling and splitting
    pub seed: u64,

    /// Per-class quotas
    pub quotas: Quotas,

    /// Remove canonical class directories and the metadata table before writing
    pub clean: bool,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            pneumonia_root: PathBuf::from("data/raw/pneumonia/chest_xray"),
            tuberculosis_root: PathBuf::from("data/raw/tuberculosis/TB_Chest_Radiography_Database"),
            output_root: PathBuf::from("data/processed"),
            seed: DEFAULT_SEED,
            quotas: Quotas::default(),
            clean: false, // Default: silent overwrite
        }
    }
}

impl PipelineConfig {
    /// Loads a configuration from a JSON file
    ///
    /// Missing fields fall back to their defaults.
    #[cfg(feature = "json")]
    pub fn from_json_file(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        serde_json::from_str(&contents).map_err(|e| {
            CorpusError::Config(format!("Failed to parse {}: {}", path.display(), e))
        })
    }

    /// Builder: Set the pneumonia dataset root
    pub fn with_pneumonia_root(mut self, path: impl Into<PathBuf>) -> Self {
        self.pneumonia_root = path.into();
        self
    }

    /// Builder: Set the tuberculosis dataset root
    pub fn with_tuberculosis_root(mut self, path: impl Into<PathBuf>) -> Self {
        self.tuberculosis_root = path.into();
        self
    }

    /// Builder: Set the output root
    pub fn with_output_root(mut self, path: impl Into<PathBuf>) -> Self {
        self.output_root = path.into();
        self
    }

    /// Builder: Set the seed
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Builder: Set the quotas
    pub fn with_quotas(mut self, quotas: Quotas) -> Self {
        self.quotas = quotas;
        self
    }

    /// Builder: Clean the canonical layout before writing
    pub fn clean_before_write(mut self, clean: bool) -> Self {
        self.clean = clean;
        self
    }

    /// Path of the metadata table
    pub fn metadata_path(&self) -> PathBuf {
        metadata_path_for(&self.output_root)
    }

    /// Checks that the configuration can drive a run
    pub fn validate(&self) -> Result<()> {
        if self.output_root.as_os_str().is_empty() {
            return Err(CorpusError::Config("output root must not be empty".into()));
        }
        if self.output_root == self.pneumonia_root || self.output_root == self.tuberculosis_root {
            return Err(CorpusError::Config(format!(
                "output root {} overlaps a source root",
                self.output_root.display()
            )));
        }
        Ok(())
    }
}

/// Well-known metadata table location under an output root
pub fn metadata_path_for(output_root: &Path) -> PathBuf {
    output_root.join("metadata.csv")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = PipelineConfig::default();
        assert_eq!(config.seed, 42);
        assert_eq!(config.quotas.pneumonia, 500);
        assert_eq!(config.quotas.normal, 200);
        assert_eq!(config.quotas.tuberculosis, 500);
        assert!(!config.clean);
        assert_eq!(
            config.metadata_path(),
            PathBuf::from("data/processed/metadata.csv")
        );
    }

    #[test]
    fn test_validate_rejects_overlapping_roots() {
        let config = PipelineConfig::default()
            .with_pneumonia_root("same")
            .with_output_root("same");
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_empty_output() {
        let config = PipelineConfig::default().with_output_root("");
        assert!(config.validate().is_err());
    }

    #[cfg(feature = "json")]
    #[test]
    fn test_from_json_file_partial() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(
            &path,
            r#"{"output_root": "out", "seed": 3, "quotas": {"normal": 10}}"#,
        )
        .unwrap();

        let config = PipelineConfig::from_json_file(&path).unwrap();
        assert_eq!(config.output_root, PathBuf::from("out"));
        assert_eq!(config.seed, 3);
        assert_eq!(config.quotas.normal, 10);
        assert_eq!(config.quotas.pneumonia, 500);
        assert_eq!(config.pneumonia_root, PipelineConfig::default().pneumonia_root);
    }

    #[cfg(feature = "json")]
    #[test]
    fn test_from_json_file_invalid() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, "{ not json").unwrap();
        assert!(matches!(
            PipelineConfig::from_json_file(&path),
            Err(CorpusError::Config(_))
        ));
    }
}
