//! Corpus EDA Library
//!
//! Exploratory data analysis for short-text corpora stored as JSON.
//!
//! # Overview
//!
//! A run loads a JSON array (or JSON Lines file) of records with a `text`
//! field and produces:
//!
//! - **Missing values**: per-column missing counts before cleaning
//! - **Cleaning**: records without text are dropped
//! - **Text features**: character length, word count and unique word count
//! - **Statistics**: mean, std, quartiles, P95 and skewness per feature
//! - **Correlations**: the Pearson matrix of the three features
//! - **Charts**: histograms, box plots, a correlation heatmap and a scatter
//!   plot, saved as PNG files
//! - **Report**: a sectioned console report with markdown tables, plus an
//!   optional JSON run report and feature CSV
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use corpus_eda::{EdaConfig, ReportPipeline};
//!
//! let config = EdaConfig::builder()
//!     .input_path("corpus.json")
//!     .output_dir("charts")
//!     .histogram_bins(30)
//!     .build()?;
//!
//! let report = ReportPipeline::builder()
//!     .config(config)
//!     .on_progress(|update| eprintln!("{}", update.message))
//!     .build()?
//!     .run(std::io::stdout())?;
//!
//! println!("{:?}", report.correlation);
//! ```
//!
//! # Degenerate data
//!
//! Statistics that are undefined for the data at hand (an empty corpus, a
//! feature with zero variance) are reported as NaN instead of failing the run,
//! and every chart is still written.

pub mod charts;
pub mod cleaner;
pub mod config;
pub mod error;
pub mod features;
pub mod loader;
pub mod pipeline;
pub mod profiler;
pub mod reporting;
pub mod types;

// Re-exports for convenient access
pub use charts::{ChartData, ChartKind, ChartTheme, init_theme};
pub use cleaner::{DataCleaner, missing_value_counts};
pub use config::{ConfigValidationError, DEFAULT_INPUT_PATH, EdaConfig, EdaConfigBuilder};
pub use error::{EdaError, Result as EdaResult, ResultExt};
pub use features::{TextFeatures, derive_features, feature_frame};
pub use loader::{InputFormat, load_dataset};
pub use pipeline::{
    ClosureProgressReporter, EdaStage, ProgressReporter, ProgressUpdate, ReportPipeline,
    ReportPipelineBuilder,
};
pub use profiler::DataProfiler;
pub use reporting::{ConsoleReport, EdaReport};
pub use types::{
    CorrelationMatrix, Dataset, Feature, FeatureDataset, FeatureRecord, FeatureSummary,
    MissingValueCount, Record, TEXT_COLUMN,
};
