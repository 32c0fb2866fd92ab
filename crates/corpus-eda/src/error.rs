//! Error types for the EDA report pipeline.
//!
//! Only the load stage is expected to fail on bad input. Everything after it
//! works on data the previous stage produced, so the remaining variants cover
//! environment failures (writing charts, reports, exports) and configuration
//! mistakes.
//!
//! Degenerate statistics (zero variance, empty dataset) are not errors: they
//! surface as NaN in the report.

use crate::config::ConfigValidationError;
use serde::Serialize;
use serde::ser::SerializeStruct;
use std::path::PathBuf;
use thiserror::Error;

/// The main error type for the EDA pipeline.
#[derive(Error, Debug)]
pub enum EdaError {
    /// The input could not be read or parsed.
    #[error("{reason} ({path})")]
    Load { path: PathBuf, reason: String },

    /// Invalid configuration provided.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// A chart could not be rendered or saved.
    #[error("Failed to render {chart}: {reason}")]
    RenderFailed { chart: String, reason: String },

    /// The run report or feature export could not be written.
    #[error("Failed to write report: {0}")]
    ReportFailed(String),

    /// IO error wrapper.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Polars error wrapper.
    #[error("Polars error: {0}")]
    Polars(#[from] polars::error::PolarsError),

    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Generic error with context.
    #[error("{context}: {source}")]
    WithContext {
        context: String,
        #[source]
        source: Box<EdaError>,
    },
}

static_assertions::assert_impl_all!(EdaError: Send, Sync);

impl EdaError {
    /// Build a load error for `path`.
    pub fn load(path: impl Into<PathBuf>, reason: impl Into<String>) -> Self {
        EdaError::Load {
            path: path.into(),
            reason: reason.into(),
        }
    }

    /// Add context to an error.
    pub fn with_context(self, context: impl Into<String>) -> Self {
        EdaError::WithContext {
            context: context.into(),
            source: Box::new(self),
        }
    }

    /// Stable error code, used in the JSON form of the error.
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::Load { .. } => "LOAD_ERROR",
            Self::InvalidConfig(_) => "INVALID_CONFIG",
            Self::RenderFailed { .. } => "RENDER_FAILED",
            Self::ReportFailed(_) => "REPORT_FAILED",
            Self::Io(_) => "IO_ERROR",
            Self::Polars(_) => "POLARS_ERROR",
            Self::Json(_) => "JSON_ERROR",
            Self::WithContext { source, .. } => source.error_code(),
        }
    }

    /// Check if this error came from the load stage.
    pub fn is_load_error(&self) -> bool {
        match self {
            Self::Load { .. } => true,
            Self::WithContext { source, .. } => source.is_load_error(),
            _ => false,
        }
    }
}

impl From<ConfigValidationError> for EdaError {
    fn from(error: ConfigValidationError) -> Self {
        EdaError::InvalidConfig(error.to_string())
    }
}

/// Errors are serialized as a struct with `code` and `message` fields.
impl Serialize for EdaError {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        let mut state = serializer.serialize_struct("EdaError", 2)?;
        state.serialize_field("code", &self.error_code())?;
        state.serialize_field("message", &self.to_string())?;
        state.end()
    }
}

/// Result type alias for EDA operations.
pub type Result<T> = std::result::Result<T, EdaError>;

/// Extension trait for adding context to Results.
pub trait ResultExt<T> {
    /// Add context to an error result.
    fn context(self, context: impl Into<String>) -> Result<T>;
}

impl<T> ResultExt<T> for Result<T> {
    fn context(self, context: impl Into<String>) -> Result<T> {
        self.map_err(|e| e.with_context(context))
    }
}

impl<T> ResultExt<T> for std::result::Result<T, polars::error::PolarsError> {
    fn context(self, context: impl Into<String>) -> Result<T> {
        self.map_err(|e| EdaError::Polars(e).with_context(context))
    }
}

impl<T> ResultExt<T> for std::result::Result<T, std::io::Error> {
    fn context(self, context: impl Into<String>) -> Result<T> {
        self.map_err(|e| EdaError::Io(e).with_context(context))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_code() {
        assert_eq!(
            EdaError::load("corpus.json", "missing").error_code(),
            "LOAD_ERROR"
        );
        assert_eq!(
            EdaError::InvalidConfig("bins".to_string()).error_code(),
            "INVALID_CONFIG"
        );
    }

    #[test]
    fn test_config_validation_error_converts() {
        let error: EdaError = ConfigValidationError::InvalidBins(0).into();
        assert_eq!(error.error_code(), "INVALID_CONFIG");
        assert!(error.to_string().contains("Invalid histogram bins: 0"));
    }

    #[test]
    fn test_json_error_converts() {
        let parse_error = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let error: EdaError = parse_error.into();
        assert_eq!(error.error_code(), "JSON_ERROR");
    }

    #[test]
    fn test_load_error_message_includes_path_and_reason() {
        let error = EdaError::load("corpus.json", "No such file or directory");
        let message = error.to_string();
        assert!(message.contains("No such file or directory"));
        assert!(message.contains("corpus.json"));
    }

    #[test]
    fn test_is_load_error() {
        assert!(EdaError::load("a.json", "bad").is_load_error());
        assert!(
            EdaError::load("a.json", "bad")
                .with_context("Loading corpus")
                .is_load_error()
        );
        assert!(!EdaError::ReportFailed("disk full".to_string()).is_load_error());
    }

    #[test]
    fn test_error_serialization() {
        let error = EdaError::RenderFailed {
            chart: "heatmap_correlation.png".to_string(),
            reason: "disk full".to_string(),
        };
        let json = serde_json::to_string(&error).unwrap();
        assert!(json.contains("RENDER_FAILED"));
        assert!(json.contains("heatmap_correlation.png"));
    }

    #[test]
    fn test_with_context() {
        let error = EdaError::InvalidConfig("bins".to_string()).with_context("Building pipeline");
        assert!(error.to_string().contains("Building pipeline"));
        assert_eq!(error.error_code(), "INVALID_CONFIG");
    }
}
