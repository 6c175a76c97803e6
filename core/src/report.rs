//! Patient report generation
//!
//! Prediction records reach the report generator as JSON. Parsing is
//! strict: unknown fields are rejected and every record is range-checked
//! before a report is built.

use crate::error::{CorpusError, Result};
use crate::inference::Prediction;
use crate::types::Diagnosis;
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};

/// Patient details entered alongside the uploaded images
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PatientInfo {
    pub name: String,
    pub age: String,
    pub gender: String,
    pub symptoms: String,
}

/// Classifier result for one uploaded image
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PredictionRecord {
    pub filename: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub filepath: Option<PathBuf>,
    pub label: Diagnosis,
    pub confidence: f32,
}

impl PredictionRecord {
    /// Creates a record from a prediction
    pub fn new(filename: impl Into<String>, filepath: Option<PathBuf>, prediction: Prediction) -> Self {
        Self {
            filename: filename.into(),
            filepath,
            label: prediction.label,
            confidence: prediction.confidence,
        }
    }

    /// Checks field ranges
    pub fn validate(&self) -> Result<()> {
        if self.filename.trim().is_empty() {
            return Err(CorpusError::InvalidPrediction(
                "filename must not be empty".into(),
            ));
        }
        if !(0.0..=1.0).contains(&self.confidence) {
            return Err(CorpusError::InvalidPrediction(format!(
                "{}: confidence {} outside [0, 1]",
                self.filename, self.confidence
            )));
        }
        Ok(())
    }
}

/// Everything needed to render one report
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ReportRequest {
    #[serde(default)]
    pub patient: PatientInfo,
    pub predictions: Vec<PredictionRecord>,
}

impl ReportRequest {
    /// Parses and validates a JSON request
    ///
    /// # Errors
    ///
    /// Returns `InvalidPrediction` for malformed JSON, unknown fields or
    /// out-of-range records.
    pub fn from_json(json: &str) -> Result<Self> {
        let request: ReportRequest = serde_json::from_str(json)?;
        request.validate()?;
        Ok(request)
    }

    /// Reads and validates a JSON request file
    pub fn from_json_file(path: &Path) -> Result<Self> {
        Self::from_json(&std::fs::read_to_string(path)?)
    }

    /// Serializes the request for storage or transfer
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Validates every prediction record
    pub fn validate(&self) -> Result<()> {
        self.predictions.iter().try_for_each(PredictionRecord::validate)
    }
}

/// Rendered patient report
///
/// # Example
///
/// ```
/// use chrono::NaiveDate;
/// use cxrtriage_core::report::{DiagnosticReport, ReportRequest};
///
/// let request = ReportRequest::from_json(
///     r#"{"patient": {"name": "A. Patient"},
///         "predictions": [{"filename": "x1.png", "label": "Normal", "confidence": 0.91}]}"#,
/// ).unwrap();
/// let date = NaiveDate::from_ymd_opt(2024, 5, 1).unwrap().and_hms_opt(9, 30, 0).unwrap();
///
/// let text = DiagnosticReport::new(&request, date).to_string();
/// assert!(text.contains("Image: x1.png - Label: Normal - Confidence: 0.91"));
/// ```
pub struct DiagnosticReport<'a> {
    request: &'a ReportRequest,
    generated_at: NaiveDateTime,
}

impl<'a> DiagnosticReport<'a> {
    /// Creates a new report
    pub fn new(request: &'a ReportRequest, generated_at: NaiveDateTime) -> Self {
        Self {
            request,
            generated_at,
        }
    }

    /// Number of images labelled pneumonia
    pub fn positive_count(&self) -> usize {
        self.request
            .predictions
            .iter()
            .filter(|p| p.label == Diagnosis::Pneumonia)
            .count()
    }
}

impl<'a> fmt::Display for DiagnosticReport<'a> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let patient = &self.request.patient;
        writeln!(f, "Chest X-ray Triage Report")?;
        writeln!(f, "=========================")?;
        writeln!(f)?;
        writeln!(f, "Patient Name: {}", patient.name)?;
        writeln!(f, "Age: {}", patient.age)?;
        writeln!(f, "Gender: {}", patient.gender)?;
        writeln!(f, "Symptoms: {}", patient.symptoms)?;
        writeln!(
            f,
            "Report Date: {}",
            self.generated_at.format("%Y-%m-%d %H:%M:%S")
        )?;
        writeln!(f)?;

        for pred in &self.request.predictions {
            writeln!(
                f,
                "Image: {} - Label: {} - Confidence: {:.2}",
                pred.filename, pred.label, pred.confidence
            )?;
        }

        writeln!(f)?;
        writeln!(
            f,
            "Summary: {} of {} images labelled {}",
            self.positive_count(),
            self.request.predictions.len(),
            Diagnosis::Pneumonia
        )?;
        Ok(())
    }
}
