use std::fmt;

/// Diagnostic category of a processed image
///
/// Each category owns one directory per split in the canonical layout and
/// maps to exactly one of the one-hot label columns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "json", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "json", serde(rename_all = "lowercase"))]
pub enum Category {
    Pneumonia,
    Tuberculosis,
    Normal,
}

/// Categories in canonical layout order
pub const ALL_CATEGORIES: [Category; 3] =
    [Category::Pneumonia, Category::Tuberculosis, Category::Normal];

impl Category {
    /// Returns the directory and filename prefix for this category
    pub fn simple_name(&self) -> &'static str {
        match self {
            Category::Pneumonia => "pneumonia",
            Category::Tuberculosis => "tuberculosis",
            Category::Normal => "normal",
        }
    }

    /// Returns the source dataset this category is pooled from
    ///
    /// Normal images come only from the pneumonia dataset.
    pub fn source(&self) -> SourceDataset {
        match self {
            Category::Pneumonia | Category::Normal => SourceDataset::Pneumonia,
            Category::Tuberculosis => SourceDataset::Tuberculosis,
        }
    }

    /// Parses a category from its directory name
    #[allow(clippy::should_implement_trait)]
    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "pneumonia" => Some(Category::Pneumonia),
            "tuberculosis" => Some(Category::Tuberculosis),
            "normal" => Some(Category::Normal),
            _ => None,
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.simple_name())
    }
}

/// Dataset partition
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "json", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "json", serde(rename_all = "lowercase"))]
pub enum Split {
    Train,
    Val,
    Test,
}

/// Splits in canonical layout order
pub const ALL_SPLITS: [Split; 3] = [Split::Train, Split::Val, Split::Test];

impl Split {
    /// Returns the directory and filename component for this split
    pub fn simple_name(&self) -> &'static str {
        match self {
            Split::Train => "train",
            Split::Val => "val",
            Split::Test => "test",
        }
    }

    /// Parses a split from its directory name
    #[allow(clippy::should_implement_trait)]
    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "train" => Some(Split::Train),
            "val" => Some(Split::Val),
            "test" => Some(Split::Test),
            _ => None,
        }
    }
}

impl fmt::Display for Split {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.simple_name())
    }
}

/// Public source dataset an image was drawn from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "json", derive(serde::Serialize, serde::Deserialize))]
pub enum SourceDataset {
    #[cfg_attr(feature = "json", serde(rename = "pneumonia_dataset"))]
    Pneumonia,
    #[cfg_attr(feature = "json", serde(rename = "tb_dataset"))]
    Tuberculosis,
}

impl SourceDataset {
    /// Returns the value written to the `source` metadata column
    pub fn simple_name(&self) -> &'static str {
        match self {
            SourceDataset::Pneumonia => "pneumonia_dataset",
            SourceDataset::Tuberculosis => "tb_dataset",
        }
    }

    /// Parses the `source` metadata column
    #[allow(clippy::should_implement_trait)]
    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "pneumonia_dataset" => Some(SourceDataset::Pneumonia),
            "tb_dataset" => Some(SourceDataset::Tuberculosis),
            _ => None,
        }
    }
}

impl fmt::Display for SourceDataset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.simple_name())
    }
}

/// Classifier verdict for a single image
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "json", derive(serde::Serialize, serde::Deserialize))]
pub enum Diagnosis {
    #[cfg_attr(feature = "json", serde(rename = "Pneumonia", alias = "PNEUMONIA"))]
    Pneumonia,
    #[cfg_attr(feature = "json", serde(rename = "Normal", alias = "NORMAL"))]
    Normal,
}

impl Diagnosis {
    /// Returns simple name for display
    pub fn simple_name(&self) -> &'static str {
        match self {
            Diagnosis::Pneumonia => "Pneumonia",
            Diagnosis::Normal => "Normal",
        }
    }
}

impl fmt::Display for Diagnosis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.simple_name())
    }
}
