use super::{Category, Split};
use regex::Regex;
use std::fmt;
use std::sync::OnceLock;

/// Synthesized filename of a materialized image
///
/// Encodes category, split and a zero-padded sequence index, keeping the
/// original extension: `pneumonia_train_0007.jpeg`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CanonicalName {
    pub category: Category,
    pub split: Split,
    pub index: usize,
    /// Extension including the leading dot, or empty
    pub extension: String,
}

impl CanonicalName {
    /// Creates a new CanonicalName
    pub fn new(category: Category, split: Split, index: usize, extension: &str) -> Self {
        Self {
            category,
            split,
            index,
            extension: extension.to_string(),
        }
    }

    /// Returns the filename, e.g. `normal_val_0000.png`
    pub fn file_name(&self) -> String {
        format!(
            "{}_{}_{:04}{}",
            self.category.simple_name(),
            self.split.simple_name(),
            self.index,
            self.extension
        )
    }

    /// Parses a canonical filename
    ///
    /// Indices above 9999 keep their full width, so at least four digits
    /// are required.
    ///
    /// # Errors
    ///
    /// Returns an error if the name does not follow the canonical pattern
    pub fn parse(s: &str) -> Result<Self, String> {
        static REGEX: OnceLock<Regex> = OnceLock::new();
        let re = REGEX.get_or_init(|| {
            Regex::new(r"^(pneumonia|tuberculosis|normal)_(train|val|test)_(\d{4,})(\.[A-Za-z0-9]+)?$")
                .expect("Failed to compile regex")
        });

        let caps = re
            .captures(s)
            .ok_or_else(|| format!("Not a canonical image name: '{}'", s))?;

        let category = Category::from_str(&caps[1])
            .ok_or_else(|| format!("Unknown category in '{}'", s))?;
        let split =
            Split::from_str(&caps[2]).ok_or_else(|| format!("Unknown split in '{}'", s))?;
        let index: usize = caps[3]
            .parse()
            .map_err(|e| format!("Failed to parse index in '{}': {}", s, e))?;
        let extension = caps.get(4).map(|m| m.as_str()).unwrap_or("");

        Ok(Self::new(category, split, index, extension))
    }
}

impl fmt::Display for CanonicalName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.file_name())
    }
}
