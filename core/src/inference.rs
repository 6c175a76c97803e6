//! Classifier seam
//!
//! The trained model is an external collaborator. This module owns what
//! surrounds it: decoding and normalizing an image into the model's input,
//! the [`Scorer`] trait the model is plugged in through, and turning a raw
//! score into a labelled [`Prediction`].

use crate::error::{CorpusError, Result};
use crate::types::Diagnosis;
use image::imageops::FilterType;
use log::debug;
use std::path::Path;

/// Side length of the square model input, in pixels
pub const INPUT_SIZE: u32 = 150;

/// Scores strictly above this are labelled pneumonia
pub const DECISION_THRESHOLD: f32 = 0.5;

/// Normalized RGB image in row-major, channel-last order
#[derive(Debug, Clone, PartialEq)]
pub struct ImageTensor {
    pub width: u32,
    pub height: u32,
    /// `width * height * 3` values in [0, 1]
    pub data: Vec<f32>,
}

impl ImageTensor {
    /// Number of color channels
    pub const CHANNELS: usize = 3;

    /// Returns the `[r, g, b]` values of a pixel
    ///
    /// `None` if the coordinates fall outside the image or the buffer is
    /// shorter than the dimensions claim.
    pub fn pixel(&self, x: u32, y: u32) -> Option<[f32; 3]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let offset = (y as usize * self.width as usize + x as usize) * Self::CHANNELS;
        match self.data.get(offset..offset + Self::CHANNELS)? {
            &[r, g, b] => Some([r, g, b]),
            _ => None,
        }
    }
}

/// Loads an image and prepares it as model input
///
/// The image is converted to RGB, resized to exactly
/// `INPUT_SIZE`×`INPUT_SIZE` with nearest-neighbour sampling and scaled to
/// [0, 1].
pub fn preprocess(path: &Path) -> Result<ImageTensor> {
    let img = image::open(path)?;
    debug!(
        "Loaded {} ({}x{})",
        path.display(),
        img.width(),
        img.height()
    );

    let rgb = img
        .resize_exact(INPUT_SIZE, INPUT_SIZE, FilterType::Nearest)
        .to_rgb8();
    let data = rgb
        .pixels()
        .flat_map(|p| p.0)
        .map(|v| f32::from(v) / 255.0)
        .collect();

    Ok(ImageTensor {
        width: INPUT_SIZE,
        height: INPUT_SIZE,
        data,
    })
}

/// A trained binary classifier
///
/// Implementations return the probability that the image shows pneumonia.
pub trait Scorer {
    /// Scores a preprocessed image
    fn score(&self, input: &ImageTensor) -> Result<f32>;
}

impl<F> Scorer for F
where
    F: Fn(&ImageTensor) -> f32,
{
    fn score(&self, input: &ImageTensor) -> Result<f32> {
        Ok(self(input))
    }
}

/// Labelled classifier output for one image
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "json", derive(serde::Serialize))]
pub struct Prediction {
    pub label: Diagnosis,
    /// Confidence in `label`, in [0.5, 1]
    pub confidence: f32,
}

impl Prediction {
    /// Thresholds a raw score
    ///
    /// # Errors
    ///
    /// Returns `InvalidScore` for NaN or values outside [0, 1].
    pub fn from_score(score: f32) -> Result<Self> {
        if !(0.0..=1.0).contains(&score) {
            return Err(CorpusError::InvalidScore(score));
        }
        Ok(if score > DECISION_THRESHOLD {
            Prediction {
                label: Diagnosis::Pneumonia,
                confidence: score,
            }
        } else {
            Prediction {
                label: Diagnosis::Normal,
                confidence: 1.0 - score,
            }
        })
    }
}

/// Classifier wrapping a loaded scorer
///
/// Built once at startup and shared by reference with every caller.
pub struct Classifier<S> {
    scorer: S,
}

impl<S: Scorer> Classifier<S> {
    /// Wraps a scorer
    pub fn new(scorer: S) -> Self {
        Self { scorer }
    }

    /// Returns the wrapped scorer
    pub fn scorer(&self) -> &S {
        &self.scorer
    }

    /// Classifies a preprocessed image
    pub fn predict(&self, input: &ImageTensor) -> Result<Prediction> {
        Prediction::from_score(self.scorer.score(input)?)
    }

    /// Loads, preprocesses and classifies an image file
    pub fn predict_file(&self, path: &Path) -> Result<Prediction> {
        let input = preprocess(path)?;
        let prediction = self.predict(&input)?;
        debug!(
            "{}: {} ({:.2})",
            path.display(),
            prediction.label,
            prediction.confidence
        );
        Ok(prediction)
    }
}
