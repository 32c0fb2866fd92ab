//! Feature profiling: descriptive statistics and correlations.
//!
//! This module provides functionality for summarising the derived feature
//! columns of the feature frame, including:
//! - Central tendency, dispersion, quartiles and P95
//! - Skewness
//! - The Pearson correlation matrix

pub mod statistics;

use crate::types::{CorrelationMatrix, Feature, FeatureSummary};
use anyhow::Result;
use polars::prelude::*;
use tracing::debug;

/// Profiler for the derived feature columns of a feature frame.
pub struct DataProfiler;

impl DataProfiler {
    /// Values of one feature column as `f64`, nulls skipped.
    pub fn feature_values(df: &DataFrame, feature: Feature) -> Result<Vec<f64>> {
        let series = df
            .column(feature.column_name())?
            .as_materialized_series()
            .cast(&DataType::Float64)?;

        Ok(series.f64()?.into_iter().flatten().collect())
    }

    /// Descriptive statistics for every derived feature, in column order.
    pub fn describe(df: &DataFrame) -> Result<Vec<FeatureSummary>> {
        Feature::ALL
            .iter()
            .map(|&feature| {
                let values = Self::feature_values(df, feature)?;
                let summary = Self::summarize(feature, &values);
                debug!(
                    "{}: mean={:.3} std={:.3} skew={:.3}",
                    feature.column_name(),
                    summary.mean,
                    summary.std,
                    summary.skewness
                );
                Ok(summary)
            })
            .collect()
    }

    /// Summarise a single sample.
    pub fn summarize(feature: Feature, values: &[f64]) -> FeatureSummary {
        let sorted = statistics::sorted(values);

        FeatureSummary {
            feature,
            count: values.len(),
            mean: statistics::mean(values),
            std: statistics::sample_std(values),
            min: sorted.first().copied().unwrap_or(f64::NAN),
            q1: statistics::quantile_sorted(&sorted, 0.25),
            median: statistics::quantile_sorted(&sorted, 0.5),
            q3: statistics::quantile_sorted(&sorted, 0.75),
            max: sorted.last().copied().unwrap_or(f64::NAN),
            p95: statistics::quantile_sorted(&sorted, 0.95),
            skewness: statistics::skewness(values),
        }
    }

    /// Pearson correlation matrix across all derived features.
    ///
    /// The diagonal is exactly 1.0 unless the feature has zero variance, in
    /// which case its whole row and column are NaN.
    pub fn correlation_matrix(df: &DataFrame) -> Result<CorrelationMatrix> {
        let columns: Vec<Vec<f64>> = Feature::ALL
            .iter()
            .map(|&feature| Self::feature_values(df, feature))
            .collect::<Result<_>>()?;

        let n = columns.len();
        let mut values = vec![vec![f64::NAN; n]; n];
        for i in 0..n {
            for j in i..n {
                let r = statistics::pearson(&columns[i], &columns[j]);
                let r = if i == j && !r.is_nan() { 1.0 } else { r };
                values[i][j] = r;
                values[j][i] = r;
            }
        }

        Ok(CorrelationMatrix {
            features: Feature::ALL.to_vec(),
            values,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::{derive_features, feature_frame};
    use crate::loader::{InputFormat, parse_records};

    fn frame(json: &str) -> DataFrame {
        let dataset = parse_records(json, InputFormat::JsonArray).unwrap();
        feature_frame(&derive_features(dataset)).unwrap()
    }

    #[test]
    fn test_feature_values() {
        let df = frame(r#"[{"text": "a b"}, {"text": "a b a"}]"#);
        let lengths = DataProfiler::feature_values(&df, Feature::TextLength).unwrap();
        assert_eq!(lengths, vec![3.0, 5.0]);
    }

    #[test]
    fn test_describe_basic() {
        let df = frame(r#"[{"text": "a"}, {"text": "a b"}, {"text": "a b c"}, {"text": "a b c d"}]"#);
        let summaries = DataProfiler::describe(&df).unwrap();
        assert_eq!(summaries.len(), 3);

        let words = summaries
            .iter()
            .find(|s| s.feature == Feature::WordCount)
            .unwrap();
        assert_eq!(words.count, 4);
        assert!((words.mean - 2.5).abs() < 1e-9);
        assert_eq!(words.min, 1.0);
        assert_eq!(words.max, 4.0);
        assert!((words.q1 - 1.75).abs() < 1e-9);
        assert!((words.median - 2.5).abs() < 1e-9);
        assert!((words.q3 - 3.25).abs() < 1e-9);
        assert!((words.p95 - 3.85).abs() < 1e-9);
        assert!(words.skewness.abs() < 1e-9);
    }

    #[test]
    fn test_describe_empty_frame_yields_nan() {
        let df = frame("[]");
        let summaries = DataProfiler::describe(&df).unwrap();
        for summary in summaries {
            assert_eq!(summary.count, 0);
            assert!(summary.mean.is_nan());
            assert!(summary.std.is_nan());
            assert!(summary.min.is_nan());
            assert!(summary.p95.is_nan());
            assert!(summary.skewness.is_nan());
        }
    }

    #[test]
    fn test_correlation_matrix_symmetric_with_unit_diagonal() {
        let df = frame(
            r#"[{"text": "a"}, {"text": "bb cc"}, {"text": "a a a a"}, {"text": "long words here"}]"#,
        );
        let matrix = DataProfiler::correlation_matrix(&df).unwrap();
        assert_eq!(matrix.dimension(), 3);

        for i in 0..3 {
            assert!((matrix.values[i][i] - 1.0).abs() < 1e-12);
            for j in 0..3 {
                assert!((matrix.values[i][j] - matrix.values[j][i]).abs() < 1e-12);
                assert!((-1.0..=1.0).contains(&matrix.values[i][j]));
            }
        }
    }

    #[test]
    fn test_correlation_matrix_zero_variance_is_nan() {
        // every text has exactly one word, lengths differ
        let df = frame(r#"[{"text": "a"}, {"text": "bb"}, {"text": "ccc"}]"#);
        let matrix = DataProfiler::correlation_matrix(&df).unwrap();

        assert!(matrix.get(Feature::WordCount, Feature::TextLength).unwrap().is_nan());
        assert!(matrix.get(Feature::WordCount, Feature::WordCount).unwrap().is_nan());
        assert_eq!(matrix.get(Feature::TextLength, Feature::TextLength), Some(1.0));
    }
}
