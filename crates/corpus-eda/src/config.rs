//! Configuration types for the EDA report pipeline.
//!
//! This module provides configuration options using the builder pattern
//! for flexible and ergonomic pipeline setup.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Input file read when no path is given.
pub const DEFAULT_INPUT_PATH: &str = "joker_task1_retrieval_corpus25_EN.json";

/// Configuration for the EDA report pipeline.
///
/// Use [`EdaConfig::builder()`] to create a new configuration
/// with fluent API.
///
/// # Example
///
/// ```rust,ignore
/// use corpus_eda::config::EdaConfig;
///
/// let config = EdaConfig::builder()
///     .input_path("corpus.json")
///     .output_dir("charts")
///     .histogram_bins(30)
///     .build()?;
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EdaConfig {
    /// Record collection to analyse (JSON array of objects, or JSON Lines).
    /// Default: "joker_task1_retrieval_corpus25_EN.json"
    pub input_path: PathBuf,

    /// Directory the chart images and the optional JSON report are written to.
    /// Default: "." (current working directory)
    pub output_dir: PathBuf,

    /// Number of bins used for the histograms.
    /// Default: 50
    pub histogram_bins: usize,

    /// Number of feature-augmented rows shown in the sample table.
    /// Default: 5
    pub sample_rows: usize,

    /// TrueType font used for chart captions, axis labels and annotations.
    /// If None, common system font locations are searched.
    /// Default: None
    pub font_path: Option<PathBuf>,

    /// Whether to write `<input_stem>_eda_report.json` to the output directory.
    /// Default: false
    pub emit_report: bool,

    /// Optional CSV path for the feature-augmented table.
    /// Default: None
    pub export_features: Option<PathBuf>,
}

impl Default for EdaConfig {
    fn default() -> Self {
        Self {
            input_path: PathBuf::from(DEFAULT_INPUT_PATH),
            output_dir: PathBuf::from("."),
            histogram_bins: 50,
            sample_rows: 5,
            font_path: None,
            emit_report: false,
            export_features: None,
        }
    }
}

impl EdaConfig {
    /// Create a new configuration builder.
    pub fn builder() -> EdaConfigBuilder {
        EdaConfigBuilder::default()
    }

    /// Validate the configuration and return errors if invalid.
    pub fn validate(&self) -> Result<(), ConfigValidationError> {
        if self.input_path.as_os_str().is_empty() {
            return Err(ConfigValidationError::EmptyInputPath);
        }

        if self.histogram_bins == 0 {
            return Err(ConfigValidationError::InvalidBins(self.histogram_bins));
        }

        if self.sample_rows == 0 {
            return Err(ConfigValidationError::InvalidSampleRows(self.sample_rows));
        }

        Ok(())
    }
}

/// Errors that can occur during configuration validation.
#[derive(Debug, thiserror::Error)]
pub enum ConfigValidationError {
    #[error("Input path must not be empty")]
    EmptyInputPath,

    #[error("Invalid histogram bins: {0} (must be at least 1)")]
    InvalidBins(usize),

    #[error("Invalid sample rows: {0} (must be at least 1)")]
    InvalidSampleRows(usize),
}

/// Builder for [`EdaConfig`] with fluent API.
#[derive(Debug, Default)]
pub struct EdaConfigBuilder {
    input_path: Option<PathBuf>,
    output_dir: Option<PathBuf>,
    histogram_bins: Option<usize>,
    sample_rows: Option<usize>,
    font_path: Option<PathBuf>,
    emit_report: Option<bool>,
    export_features: Option<PathBuf>,
}

impl EdaConfigBuilder {
    /// Set the record collection to analyse.
    pub fn input_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.input_path = Some(path.into());
        self
    }

    /// Set the directory for chart images and reports.
    pub fn output_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.output_dir = Some(dir.into());
        self
    }

    /// Set the number of histogram bins.
    pub fn histogram_bins(mut self, bins: usize) -> Self {
        self.histogram_bins = Some(bins);
        self
    }

    /// Set how many rows the feature sample table shows.
    pub fn sample_rows(mut self, rows: usize) -> Self {
        self.sample_rows = Some(rows);
        self
    }

    /// Use a specific TrueType font for chart text.
    pub fn font_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.font_path = Some(path.into());
        self
    }

    /// Enable or disable writing the JSON run report.
    pub fn emit_report(mut self, enabled: bool) -> Self {
        self.emit_report = Some(enabled);
        self
    }

    /// Export the feature-augmented table to a CSV file.
    pub fn export_features(mut self, path: impl Into<PathBuf>) -> Self {
        self.export_features = Some(path.into());
        self
    }

    /// Build the configuration, validating all values.
    ///
    /// # Errors
    ///
    /// Returns an error if any configuration value is invalid.
    pub fn build(self) -> Result<EdaConfig, ConfigValidationError> {
        let defaults = EdaConfig::default();

        let config = EdaConfig {
            input_path: self.input_path.unwrap_or(defaults.input_path),
            output_dir: self.output_dir.unwrap_or(defaults.output_dir),
            histogram_bins: self.histogram_bins.unwrap_or(defaults.histogram_bins),
            sample_rows: self.sample_rows.unwrap_or(defaults.sample_rows),
            font_path: self.font_path.or(defaults.font_path),
            emit_report: self.emit_report.unwrap_or(defaults.emit_report),
            export_features: self.export_features.or(defaults.export_features),
        };

        config.validate()?;
        Ok(config)
    }
}
