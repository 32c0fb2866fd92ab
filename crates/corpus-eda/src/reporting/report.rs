use crate::features::feature_frame;
use crate::types::{CorrelationMatrix, FeatureDataset, FeatureSummary, MissingValueCount};
use crate::error::EdaError;
use anyhow::Result;
use chrono::Local;
use polars::prelude::*;
use serde::{Deserialize, Serialize};
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::info;

/// Machine-readable summary of one analysis run.
///
/// Used for `--json` output and for the `<stem>_eda_report.json` file.
/// Undefined statistics (NaN) serialise as `null`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EdaReport {
    /// Local time the report was built, `%Y-%m-%d %H:%M:%S`.
    pub generated_at: String,
    pub input_file: String,
    /// (rows, columns) as loaded.
    pub initial_shape: (usize, usize),
    /// (rows, columns) after dropping records without text.
    pub clean_shape: (usize, usize),
    pub records_dropped: usize,
    /// Missing values per input column, before cleaning.
    pub missing_values: Vec<MissingValueCount>,
    pub statistics: Vec<FeatureSummary>,
    pub correlation: CorrelationMatrix,
    /// Charts written by the run.
    pub artifacts: Vec<PathBuf>,
    /// Feature CSV, when one was exported.
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub feature_export: Option<PathBuf>,
    /// This report's own file, when it was written to disk.
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub report_file: Option<PathBuf>,
}

/// Inputs for [`EdaReport::new`].
pub struct ReportParams<'a> {
    pub input_file: &'a Path,
    pub initial_shape: (usize, usize),
    pub clean_shape: (usize, usize),
    pub missing_values: Vec<MissingValueCount>,
    pub statistics: Vec<FeatureSummary>,
    pub correlation: CorrelationMatrix,
    pub artifacts: Vec<PathBuf>,
}

impl EdaReport {
    pub fn new(params: ReportParams<'_>) -> Self {
        Self {
            generated_at: Local::now().format("%Y-%m-%d %H:%M:%S").to_string(),
            input_file: params.input_file.display().to_string(),
            initial_shape: params.initial_shape,
            clean_shape: params.clean_shape,
            records_dropped: params.initial_shape.0.saturating_sub(params.clean_shape.0),
            missing_values: params.missing_values,
            statistics: params.statistics,
            correlation: params.correlation,
            artifacts: params.artifacts,
            feature_export: None,
            report_file: None,
        }
    }
}

/// File stem used for the run report: the input's stem, or `eda` if it has none.
pub fn report_stem(input: &Path) -> String {
    input
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .filter(|s| !s.is_empty())
        .unwrap_or_else(|| "eda".to_string())
}

/// Where [`write_report_to_file`] puts the report for `stem`.
pub fn report_path(output_dir: &Path, stem: &str) -> PathBuf {
    output_dir.join(format!("{stem}_eda_report.json"))
}

/// Write the report as pretty JSON to `<dir>/<stem>_eda_report.json`.
pub fn write_report_to_file(
    report: &EdaReport,
    output_dir: &Path,
    stem: &str,
) -> std::result::Result<PathBuf, EdaError> {
    fs::create_dir_all(output_dir)?;

    let path = report_path(output_dir, stem);
    let mut file = File::create(&path)?;
    file.write_all(serde_json::to_string_pretty(report)?.as_bytes())?;

    info!("Report saved: {}", path.display());

    Ok(path)
}

/// Write `text` and the derived feature columns to a CSV file.
pub fn export_features_csv(data: &FeatureDataset, path: &Path) -> Result<PathBuf> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }

    let mut df = feature_frame(data)?;
    let mut file = File::create(path)?;
    CsvWriter::new(&mut file)
        .include_header(true)
        .with_separator(b',')
        .with_quote_char(b'"')
        .finish(&mut df)?;

    info!("Features exported: {} ({} rows)", path.display(), df.height());

    Ok(path.to_path_buf())
}
