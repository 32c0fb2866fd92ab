//! The report pipeline and its builder.

use crate::charts::{self, ChartData, ChartKind, ChartTheme, init_theme};
use crate::cleaner::{DataCleaner, missing_value_counts};
use crate::config::{ConfigValidationError, EdaConfig};
use crate::error::{EdaError, Result, ResultExt};
use crate::features::{derive_features, feature_frame};
use crate::loader::load_dataset;
use crate::pipeline::progress::{
    ClosureProgressReporter, EdaStage, ProgressReporter, ProgressUpdate,
};
use crate::profiler::DataProfiler;
use crate::reporting::{
    ConsoleReport, EdaReport, ReportParams, export_features_csv, report_path, report_stem,
    write_report_to_file,
};
use polars::error::PolarsError;
use std::fs;
use std::io::Write;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, error, info};

/// Runs load, clean, feature derivation, statistics, charts and the report
/// in strict sequence.
///
/// Use [`ReportPipeline::builder()`] to create one.
///
/// # Example
///
/// ```rust,ignore
/// use corpus_eda::{EdaConfig, ReportPipeline};
///
/// let report = ReportPipeline::builder()
///     .config(EdaConfig::builder().input_path("corpus.json").build()?)
///     .build()?
///     .run(std::io::stdout())?;
///
/// println!("{} charts written", report.artifacts.len());
/// ```
pub struct ReportPipeline {
    config: EdaConfig,
    progress_reporter: Option<Arc<dyn ProgressReporter>>,
    cleaner: DataCleaner,
}

static_assertions::assert_impl_all!(ReportPipeline: Send);

impl ReportPipeline {
    /// Create a new pipeline builder.
    pub fn builder() -> ReportPipelineBuilder {
        ReportPipelineBuilder::default()
    }

    pub fn config(&self) -> &EdaConfig {
        &self.config
    }

    /// Run the whole analysis, writing the console report to `out`.
    ///
    /// A load failure returns [`EdaError::Load`] before anything is written
    /// to `out` or to the output directory.
    pub fn run<W: Write>(&self, out: W) -> Result<EdaReport> {
        let start = Instant::now();
        info!("Starting EDA run for {}", self.config.input_path.display());

        match self.run_internal(out) {
            Ok(report) => {
                info!("EDA run finished in {:.2?}", start.elapsed());
                self.report_progress(ProgressUpdate::complete("Report complete"));
                Ok(report)
            }
            Err(e) => {
                error!("EDA run failed: {}", e);
                self.report_progress(ProgressUpdate::failed(e.to_string()));
                Err(e)
            }
        }
    }

    fn report_progress(&self, update: ProgressUpdate) {
        if let Some(reporter) = &self.progress_reporter {
            reporter.report(update);
        }
    }

    fn run_internal<W: Write>(&self, out: W) -> Result<EdaReport> {
        let config = &self.config;
        let theme = init_theme(config.font_path.as_deref());

        // ---- Load
        self.report_progress(ProgressUpdate::new(EdaStage::Loading, 0.0, "Loading input"));
        let dataset = load_dataset(&config.input_path)?;
        let initial_shape = dataset.shape();

        // ---- Clean
        self.report_progress(ProgressUpdate::new(EdaStage::Cleaning, 0.0, "Checking missing values"));
        let missing_values = missing_value_counts(&dataset);
        let (dataset, _) = self.cleaner.drop_missing_text(dataset);
        let clean_shape = dataset.shape();

        // ---- Features
        self.report_progress(ProgressUpdate::new(EdaStage::FeatureDerivation, 0.0, "Deriving text features"));
        let features = derive_features(dataset);
        let frame = feature_frame(&features).context("Failed to build the feature frame")?;

        // ---- Statistics
        self.report_progress(ProgressUpdate::new(EdaStage::Summarizing, 0.0, "Computing statistics"));
        let statistics = DataProfiler::describe(&frame).map_err(|e| stage_error(EdaStage::Summarizing, e))?;
        let correlation =
            DataProfiler::correlation_matrix(&frame).map_err(|e| stage_error(EdaStage::Summarizing, e))?;

        // ---- Charts
        let chart_data = ChartData::from_frame(&frame, correlation.clone(), config.histogram_bins)
            .map_err(|e| stage_error(EdaStage::Visualizing, e))?;
        fs::create_dir_all(&config.output_dir).context(format!(
            "Failed to create output directory {}",
            config.output_dir.display()
        ))?;
        let artifacts = self.render_charts(&chart_data, theme)?;

        // ---- Report
        self.report_progress(ProgressUpdate::new(EdaStage::Reporting, 0.0, "Writing report"));
        let mut report = EdaReport::new(ReportParams {
            input_file: &config.input_path,
            initial_shape,
            clean_shape,
            missing_values,
            statistics,
            correlation,
            artifacts,
        });

        let mut exports: Vec<PathBuf> = Vec::new();
        if let Some(path) = &config.export_features {
            let written = export_features_csv(&features, path)
                .map_err(|e| EdaError::ReportFailed(format!("feature export to {}: {e:#}", path.display())))?;
            report.feature_export = Some(written.clone());
            exports.push(written);
        }
        if config.emit_report {
            let stem = report_stem(&config.input_path);
            report.report_file = Some(report_path(&config.output_dir, &stem));
            let written = write_report_to_file(&report, &config.output_dir, &stem)
                .map_err(|e| EdaError::ReportFailed(format!("{e:#}")))?;
            exports.push(written);
        }

        let mut console = ConsoleReport::new(out);
        console.banner()?;
        console.initial_info(report.initial_shape, &report.missing_values)?;
        console.clean_shape(report.clean_shape)?;
        console.feature_sample(&features, config.sample_rows)?;
        console.statistics(&report.statistics)?;
        console.correlation(&report.correlation)?;
        console.artifacts(&report.artifacts)?;
        console.exports(&exports)?;
        console.footer().context("Failed to write the console report")?;

        Ok(report)
    }

    fn render_charts(&self, data: &ChartData, theme: &ChartTheme) -> Result<Vec<PathBuf>> {
        let total = ChartKind::ALL.len();
        let mut written = Vec::with_capacity(total);

        for (i, kind) in ChartKind::ALL.into_iter().enumerate() {
            self.report_progress(ProgressUpdate::with_items(
                EdaStage::Visualizing,
                i,
                total,
                format!("Rendering {}", kind.file_name()),
            ));

            let path = charts::render(kind, &self.config.output_dir, data, theme).map_err(|e| {
                EdaError::RenderFailed {
                    chart: kind.file_name(),
                    reason: format!("{e:#}"),
                }
            })?;
            debug!("Saved {}", path.display());
            written.push(path);
        }

        Ok(written)
    }
}

/// Map an internal stage failure onto the typed error.
fn stage_error(stage: EdaStage, err: anyhow::Error) -> EdaError {
    match err.downcast::<PolarsError>() {
        Ok(polars) => EdaError::Polars(polars).with_context(stage.display_name()),
        Err(other) => EdaError::ReportFailed(format!("{}: {other:#}", stage.display_name())),
    }
}

/// Builder for [`ReportPipeline`].
#[derive(Default)]
pub struct ReportPipelineBuilder {
    config: Option<EdaConfig>,
    progress_reporter: Option<Arc<dyn ProgressReporter>>,
}

static_assertions::assert_impl_all!(ReportPipelineBuilder: Send);

impl ReportPipelineBuilder {
    /// Set the run configuration.
    pub fn config(mut self, config: EdaConfig) -> Self {
        self.config = Some(config);
        self
    }

    /// Set a progress reporter.
    pub fn progress_reporter(mut self, reporter: Arc<dyn ProgressReporter>) -> Self {
        self.progress_reporter = Some(reporter);
        self
    }

    /// Set a progress callback closure.
    pub fn on_progress<F>(mut self, callback: F) -> Self
    where
        F: Fn(ProgressUpdate) + Send + Sync + 'static,
    {
        self.progress_reporter = Some(Arc::new(ClosureProgressReporter::new(callback)));
        self
    }

    /// Build the pipeline.
    ///
    /// Returns an error if the configuration is invalid.
    pub fn build(self) -> std::result::Result<ReportPipeline, ConfigValidationError> {
        let config = self.config.unwrap_or_default();
        config.validate()?;

        Ok(ReportPipeline {
            config,
            progress_reporter: self.progress_reporter,
            cleaner: DataCleaner,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;
    use std::sync::Mutex;
    use tempfile::{TempDir, tempdir};

    fn write_input(dir: &TempDir, name: &str, content: &str) -> PathBuf {
        let path = dir.path().join(name);
        std::fs::write(&path, content).unwrap();
        path
    }

    fn pipeline(input: &Path, output: &Path) -> ReportPipeline {
        let config = EdaConfig::builder()
            .input_path(input)
            .output_dir(output)
            .build()
            .unwrap();
        ReportPipeline::builder().config(config).build().unwrap()
    }

    fn png_count(dir: &Path) -> usize {
        std::fs::read_dir(dir)
            .unwrap()
            .filter_map(|entry| entry.ok())
            .filter(|entry| entry.path().extension().is_some_and(|ext| ext == "png"))
            .count()
    }

    #[test]
    fn test_builder_default() {
        let pipeline = ReportPipeline::builder().build().unwrap();
        assert_eq!(pipeline.config().histogram_bins, 50);
    }

    #[test]
    fn test_builder_rejects_invalid_config() {
        let config = EdaConfig {
            histogram_bins: 0,
            ..EdaConfig::default()
        };
        let result = ReportPipeline::builder().config(config).build();
        assert!(matches!(result, Err(ConfigValidationError::InvalidBins(0))));
    }

    #[test]
    fn test_run_produces_report_and_charts() {
        let dir = tempdir().unwrap();
        let input = write_input(
            &dir,
            "corpus.json",
            r#"[{"id": 1, "text": "a b"}, {"id": 2, "text": "a b a"}, {"id": 3, "text": null}]"#,
        );
        let out_dir = dir.path().join("out");

        let mut console = Vec::new();
        let report = pipeline(&input, &out_dir).run(&mut console).unwrap();

        assert_eq!(report.initial_shape, (3, 2));
        assert_eq!(report.clean_shape, (2, 2));
        assert_eq!(report.records_dropped, 1);
        assert_eq!(report.artifacts.len(), 6);
        assert_eq!(png_count(&out_dir), 6);

        let text = String::from_utf8(console).unwrap();
        let order = [
            "Initial Dataset Shape: (3, 2)",
            "[TABLE 1.1]",
            "Shape after handling missing values: (2, 2)",
            "[TABLE 2.1]",
            "[TABLE 3.1]",
            "[TABLE 3.2]",
            "[TABLE 4.1]",
            "Saved: hist_text_length.png",
            "Saved: scatterplot_word_length.png",
        ];
        let positions: Vec<usize> = order.iter().map(|needle| text.find(needle).unwrap()).collect();
        assert!(positions.windows(2).all(|w| w[0] < w[1]), "{text}");
    }

    #[test]
    fn test_run_reports_progress_in_order() {
        let dir = tempdir().unwrap();
        let input = write_input(&dir, "corpus.json", r#"[{"text": "hello world"}]"#);
        let config = EdaConfig::builder()
            .input_path(&input)
            .output_dir(dir.path())
            .build()
            .unwrap();

        let stages = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&stages);
        ReportPipeline::builder()
            .config(config)
            .on_progress(move |update| sink.lock().unwrap().push(update.stage))
            .build()
            .unwrap()
            .run(std::io::sink())
            .unwrap();

        let stages = stages.lock().unwrap();
        assert_eq!(stages.first(), Some(&EdaStage::Loading));
        assert_eq!(stages.last(), Some(&EdaStage::Complete));
        assert_eq!(stages.iter().filter(|s| **s == EdaStage::Visualizing).count(), 6);
    }

    #[test]
    fn test_load_failure_writes_nothing() {
        let dir = tempdir().unwrap();
        let out_dir = dir.path().join("out");

        let mut console = Vec::new();
        let err = pipeline(&dir.path().join("missing.json"), &out_dir)
            .run(&mut console)
            .unwrap_err();

        assert!(err.is_load_error());
        assert!(console.is_empty());
        assert!(!out_dir.exists());
    }

    #[test]
    fn test_empty_input_still_renders() {
        let dir = tempdir().unwrap();
        let input = write_input(&dir, "empty.json", "[]");

        let report = pipeline(&input, dir.path()).run(std::io::sink()).unwrap();
        assert_eq!(report.initial_shape, (0, 0));
        assert!(report.statistics.iter().all(|s| s.mean.is_nan()));
        assert_eq!(png_count(dir.path()), 6);
    }

    #[test]
    fn test_emit_report_and_export() {
        let dir = tempdir().unwrap();
        let input = write_input(&dir, "corpus.json", r#"[{"text": "one two"}, {"text": "three"}]"#);
        let export = dir.path().join("features.csv");
        let config = EdaConfig::builder()
            .input_path(&input)
            .output_dir(dir.path())
            .emit_report(true)
            .export_features(&export)
            .build()
            .unwrap();

        let report = ReportPipeline::builder()
            .config(config)
            .build()
            .unwrap()
            .run(std::io::sink())
            .unwrap();

        let report_file = dir.path().join("corpus_eda_report.json");
        assert_eq!(report.report_file.as_deref(), Some(report_file.as_path()));
        assert!(report_file.exists());
        assert_eq!(report.feature_export.as_deref(), Some(export.as_path()));

        let csv = std::fs::read_to_string(&export).unwrap();
        assert_eq!(csv.lines().count(), 3);
    }
}
