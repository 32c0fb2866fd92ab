//! Progress reporting for the report pipeline.
//!
//! # Example
//!
//! ```rust,ignore
//! use corpus_eda::ReportPipeline;
//!
//! let report = ReportPipeline::builder()
//!     .on_progress(|update| {
//!         eprintln!("[{:.0}%] {}", update.progress * 100.0, update.message);
//!     })
//!     .build()?
//!     .run(std::io::stdout())?;
//! ```

use serde::{Deserialize, Serialize};

/// Stages of the report pipeline, in execution order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EdaStage {
    /// Reading and parsing the input file
    Loading,
    /// Counting missing values and dropping records without text
    Cleaning,
    /// Computing text length, word count and unique word count
    FeatureDerivation,
    /// Descriptive statistics, skewness and correlations
    Summarizing,
    /// Rendering the charts
    Visualizing,
    /// Printing the console report and writing exports
    Reporting,
    /// Pipeline completed successfully
    Complete,
    /// Pipeline failed with an error
    Failed,
}

impl EdaStage {
    /// Returns a human-readable name for the stage.
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::Loading => "Loading Data",
            Self::Cleaning => "Cleaning Data",
            Self::FeatureDerivation => "Deriving Features",
            Self::Summarizing => "Summarizing Features",
            Self::Visualizing => "Rendering Charts",
            Self::Reporting => "Writing Report",
            Self::Complete => "Complete",
            Self::Failed => "Failed",
        }
    }

    /// Share of the whole run this stage typically takes (0.0 - 1.0).
    pub fn weight(&self) -> f32 {
        match self {
            Self::Loading => 0.15,
            Self::Cleaning => 0.05,
            Self::FeatureDerivation => 0.10,
            Self::Summarizing => 0.10,
            Self::Visualizing => 0.50,
            Self::Reporting => 0.10,
            Self::Complete | Self::Failed => 0.0,
        }
    }

    /// Cumulative progress at the start of this stage.
    pub fn base_progress(&self) -> f32 {
        match self {
            Self::Loading => 0.0,
            Self::Cleaning => 0.15,
            Self::FeatureDerivation => 0.20,
            Self::Summarizing => 0.30,
            Self::Visualizing => 0.40,
            Self::Reporting => 0.90,
            Self::Complete => 1.0,
            Self::Failed => 0.0,
        }
    }
}

/// A progress notification.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProgressUpdate {
    pub stage: EdaStage,
    /// Overall progress (0.0 - 1.0)
    pub progress: f32,
    /// Progress within the current stage (0.0 - 1.0)
    pub stage_progress: f32,
    pub message: String,
}

impl ProgressUpdate {
    pub fn new(stage: EdaStage, stage_progress: f32, message: impl Into<String>) -> Self {
        let stage_progress = stage_progress.clamp(0.0, 1.0);
        let progress = stage.base_progress() + stage.weight() * stage_progress;
        Self {
            stage,
            progress: progress.clamp(0.0, 1.0),
            stage_progress,
            message: message.into(),
        }
    }

    /// Update for item `current` of `total` within a stage.
    pub fn with_items(stage: EdaStage, current: usize, total: usize, message: impl Into<String>) -> Self {
        let stage_progress = if total > 0 {
            current as f32 / total as f32
        } else {
            0.0
        };
        Self::new(stage, stage_progress, message)
    }

    pub fn complete(message: impl Into<String>) -> Self {
        Self::new(EdaStage::Complete, 1.0, message)
    }

    pub fn failed(message: impl Into<String>) -> Self {
        Self {
            stage: EdaStage::Failed,
            progress: 0.0,
            stage_progress: 0.0,
            message: message.into(),
        }
    }
}

static_assertions::assert_impl_all!(ProgressUpdate: Send, Sync);

/// Receiver of progress updates.
pub trait ProgressReporter: Send + Sync {
    fn report(&self, update: ProgressUpdate);
}

/// [`ProgressReporter`] backed by a closure.
pub struct ClosureProgressReporter<F>
where
    F: Fn(ProgressUpdate) + Send + Sync,
{
    callback: F,
}

impl<F> ClosureProgressReporter<F>
where
    F: Fn(ProgressUpdate) + Send + Sync,
{
    pub fn new(callback: F) -> Self {
        Self { callback }
    }
}

impl<F> ProgressReporter for ClosureProgressReporter<F>
where
    F: Fn(ProgressUpdate) + Send + Sync,
{
    fn report(&self, update: ProgressUpdate) {
        (self.callback)(update);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    const ORDER: [EdaStage; 7] = [
        EdaStage::Loading,
        EdaStage::Cleaning,
        EdaStage::FeatureDerivation,
        EdaStage::Summarizing,
        EdaStage::Visualizing,
        EdaStage::Reporting,
        EdaStage::Complete,
    ];

    #[test]
    fn test_stage_weights_sum_to_one() {
        let total: f32 = ORDER.iter().map(EdaStage::weight).sum();
        assert!((total - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_base_progress_accumulates_weights() {
        let mut expected = 0.0;
        for stage in ORDER {
            assert!((stage.base_progress() - expected).abs() < 1e-6, "{stage:?}");
            expected += stage.weight();
        }
    }

    #[test]
    fn test_progress_update_clamps() {
        let update = ProgressUpdate::new(EdaStage::Visualizing, 2.0, "charts");
        assert_eq!(update.stage_progress, 1.0);
        assert!((update.progress - 0.9).abs() < 1e-6);

        let update = ProgressUpdate::with_items(EdaStage::Visualizing, 3, 6, "charts");
        assert!((update.progress - 0.65).abs() < 1e-6);

        let update = ProgressUpdate::with_items(EdaStage::Visualizing, 0, 0, "charts");
        assert_eq!(update.stage_progress, 0.0);
    }

    #[test]
    fn test_closure_reporter() {
        let seen = Mutex::new(Vec::new());
        let reporter = ClosureProgressReporter::new(|update: ProgressUpdate| {
            seen.lock().unwrap().push(update.stage);
        });
        reporter.report(ProgressUpdate::new(EdaStage::Loading, 0.0, "start"));
        reporter.report(ProgressUpdate::complete("done"));
        assert_eq!(*seen.lock().unwrap(), vec![EdaStage::Loading, EdaStage::Complete]);
    }
}
