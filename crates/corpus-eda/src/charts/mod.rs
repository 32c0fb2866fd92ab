//! Chart rendering.
//!
//! Six fixed charts are produced per run:
//! - `hist_<feature>.png` and `boxplot_<feature>.png` for text length and word count
//! - `heatmap_correlation.png`
//! - `scatterplot_word_length.png`
//!
//! Every chart is written to its own PNG file through plotters' bitmap
//! backend. The file is created, encoded and closed inside the render call,
//! overwriting any previous file at that path.

mod boxplot;
mod heatmap;
mod histogram;
mod scatter;
mod theme;

pub use theme::{ChartTheme, FONT_FAMILY, init_theme, theme};

use crate::profiler::DataProfiler;
use crate::types::{CorrelationMatrix, Feature};
use anyhow::Result;
use polars::prelude::DataFrame;
use std::collections::HashMap;
use std::ops::Range;
use std::path::{Path, PathBuf};
use tracing::debug;

/// One of the charts the pipeline renders.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChartKind {
    /// Histogram with a density overlay.
    Histogram(Feature),
    /// Vertical box plot.
    BoxPlot(Feature),
    /// Annotated heatmap of the correlation matrix.
    CorrelationHeatmap,
    /// Word count (x) against text length (y).
    WordLengthScatter,
}

impl ChartKind {
    /// The charts of a run, in render order.
    pub const ALL: [ChartKind; 6] = [
        ChartKind::Histogram(Feature::TextLength),
        ChartKind::BoxPlot(Feature::TextLength),
        ChartKind::Histogram(Feature::WordCount),
        ChartKind::BoxPlot(Feature::WordCount),
        ChartKind::CorrelationHeatmap,
        ChartKind::WordLengthScatter,
    ];

    /// File name the chart is saved under.
    pub fn file_name(&self) -> String {
        match self {
            Self::Histogram(feature) => format!("hist_{}.png", feature.column_name()),
            Self::BoxPlot(feature) => format!("boxplot_{}.png", feature.column_name()),
            Self::CorrelationHeatmap => "heatmap_correlation.png".to_string(),
            Self::WordLengthScatter => "scatterplot_word_length.png".to_string(),
        }
    }
}

/// Everything the renderers read: feature samples and the correlation matrix.
#[derive(Debug, Clone)]
pub struct ChartData {
    columns: HashMap<Feature, Vec<f64>>,
    pub correlation: CorrelationMatrix,
    pub bins: usize,
}

impl ChartData {
    /// Collect the feature samples from the feature frame.
    pub fn from_frame(df: &DataFrame, correlation: CorrelationMatrix, bins: usize) -> Result<Self> {
        let columns = Feature::ALL
            .iter()
            .map(|&feature| Ok((feature, DataProfiler::feature_values(df, feature)?)))
            .collect::<Result<HashMap<_, _>>>()?;

        Ok(Self {
            columns,
            correlation,
            bins,
        })
    }

    /// Sample of one feature (empty if it was not collected).
    pub fn values(&self, feature: Feature) -> &[f64] {
        self.columns.get(&feature).map(Vec::as_slice).unwrap_or(&[])
    }
}

/// Render one chart into `output_dir` and return the written path.
pub fn render(kind: ChartKind, output_dir: &Path, data: &ChartData, theme: &ChartTheme) -> Result<PathBuf> {
    let path = output_dir.join(kind.file_name());
    debug!("Rendering {:?} to {}", kind, path.display());

    match kind {
        ChartKind::Histogram(feature) => {
            histogram::render(&path, feature, data.values(feature), data.bins, theme)?
        }
        ChartKind::BoxPlot(feature) => boxplot::render(&path, feature, data.values(feature), theme)?,
        ChartKind::CorrelationHeatmap => heatmap::render(&path, &data.correlation, theme)?,
        ChartKind::WordLengthScatter => scatter::render(
            &path,
            data.values(Feature::WordCount),
            data.values(Feature::TextLength),
            theme,
        )?,
    }

    Ok(path)
}

/// Axis range covering the finite values with 5% padding on each side.
///
/// Empty input maps to `0..1`; a single distinct value `v` maps to
/// `v - 0.5..v + 0.5`.
pub(crate) fn padded_range(values: &[f64]) -> Range<f64> {
    let Some((lo, hi)) = finite_bounds(values) else {
        return 0.0..1.0;
    };

    if lo == hi {
        return (lo - 0.5)..(hi + 0.5);
    }

    let pad = (hi - lo) * 0.05;
    (lo - pad)..(hi + pad)
}

/// Smallest and largest finite value.
pub(crate) fn finite_bounds(values: &[f64]) -> Option<(f64, f64)> {
    values
        .iter()
        .copied()
        .filter(|v| v.is_finite())
        .fold(None, |acc, v| match acc {
            None => Some((v, v)),
            Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_file_names() {
        let names: Vec<String> = ChartKind::ALL.iter().map(ChartKind::file_name).collect();
        assert_eq!(
            names,
            vec![
                "hist_text_length.png",
                "boxplot_text_length.png",
                "hist_word_count.png",
                "boxplot_word_count.png",
                "heatmap_correlation.png",
                "scatterplot_word_length.png",
            ]
        );
    }

    #[test]
    fn test_padded_range() {
        assert_eq!(padded_range(&[]), 0.0..1.0);
        assert_eq!(padded_range(&[4.0, 4.0]), 3.5..4.5);

        let range = padded_range(&[0.0, 10.0]);
        assert!((range.start + 0.5).abs() < 1e-12);
        assert!((range.end - 10.5).abs() < 1e-12);
    }

    #[test]
    fn test_finite_bounds_ignores_nan() {
        assert_eq!(finite_bounds(&[f64::NAN, 2.0, -1.0]), Some((-1.0, 2.0)));
        assert_eq!(finite_bounds(&[f64::NAN]), None);
    }
}
