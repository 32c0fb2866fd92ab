//! Vertical box plot with Tukey whiskers.

use super::theme::{ChartTheme, FONT_FAMILY};
use super::padded_range;
use crate::profiler::statistics;
use crate::types::Feature;
use anyhow::Result;
use plotters::prelude::*;
use std::path::Path;

/// Whisker reach, in multiples of the interquartile range.
const WHISKER_IQR: f64 = 1.5;

/// Geometry of one box plot.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct BoxStats {
    pub q1: f64,
    pub median: f64,
    pub q3: f64,
    /// Lowest value within `q1 - 1.5 * IQR`.
    pub lower_whisker: f64,
    /// Highest value within `q3 + 1.5 * IQR`.
    pub upper_whisker: f64,
    pub outliers: Vec<f64>,
}

impl BoxStats {
    /// Compute the box geometry; `None` for input without finite values.
    pub fn from_values(values: &[f64]) -> Option<Self> {
        let sorted: Vec<f64> = statistics::sorted(values)
            .into_iter()
            .filter(|v| v.is_finite())
            .collect();
        if sorted.is_empty() {
            return None;
        }

        let q1 = statistics::quantile_sorted(&sorted, 0.25);
        let median = statistics::quantile_sorted(&sorted, 0.5);
        let q3 = statistics::quantile_sorted(&sorted, 0.75);
        let iqr = q3 - q1;
        let low_fence = q1 - WHISKER_IQR * iqr;
        let high_fence = q3 + WHISKER_IQR * iqr;

        let inside = sorted.iter().copied().filter(|v| (low_fence..=high_fence).contains(v));
        let lower_whisker = inside.clone().next().unwrap_or(q1);
        let upper_whisker = inside.last().unwrap_or(q3);
        let outliers = sorted
            .iter()
            .copied()
            .filter(|v| *v < low_fence || *v > high_fence)
            .collect();

        Some(Self {
            q1,
            median,
            q3,
            lower_whisker,
            upper_whisker,
            outliers,
        })
    }
}

pub(super) fn render(path: &Path, feature: Feature, values: &[f64], theme: &ChartTheme) -> Result<()> {
    let y_range = padded_range(values);

    let root = BitMapBackend::new(path, theme.boxplot_size).into_drawing_area();
    root.fill(&theme.background)?;

    let mut builder = ChartBuilder::on(&root);
    builder.margin(15);
    if theme.labels {
        builder
            .caption(
                format!("Box Plot: Outliers in {}", feature.title()),
                (FONT_FAMILY, theme.caption_size),
            )
            .y_label_area_size(55);
    }
    let mut chart = builder.build_cartesian_2d(0f64..1f64, y_range)?;

    if theme.labels {
        chart
            .configure_mesh()
            .disable_x_mesh()
            .disable_x_axis()
            .light_line_style(theme.grid.stroke_width(1))
            .label_style((FONT_FAMILY, theme.label_size))
            .y_desc(feature.title())
            .draw()?;
    }

    let Some(stats) = BoxStats::from_values(values) else {
        root.present()?;
        return Ok(());
    };

    let (left, right, center) = (0.3, 0.7, 0.5);
    let (cap_left, cap_right) = (0.4, 0.6);
    let outline = BLACK.stroke_width(1);

    chart.draw_series(std::iter::once(Rectangle::new(
        [(left, stats.q1), (right, stats.q3)],
        theme.boxplot_fill.filled(),
    )))?;
    chart.draw_series(std::iter::once(Rectangle::new(
        [(left, stats.q1), (right, stats.q3)],
        outline,
    )))?;

    chart.draw_series(
        [
            vec![(left, stats.median), (right, stats.median)],
            vec![(center, stats.q3), (center, stats.upper_whisker)],
            vec![(center, stats.q1), (center, stats.lower_whisker)],
            vec![(cap_left, stats.upper_whisker), (cap_right, stats.upper_whisker)],
            vec![(cap_left, stats.lower_whisker), (cap_right, stats.lower_whisker)],
        ]
        .into_iter()
        .map(|points| PathElement::new(points, outline)),
    )?;

    chart.draw_series(
        stats
            .outliers
            .iter()
            .map(|&v| Circle::new((center, v), 4, BLACK.mix(0.7).stroke_width(1))),
    )?;

    root.present()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_box_stats_without_outliers() {
        let stats = BoxStats::from_values(&[1.0, 2.0, 3.0, 4.0, 5.0]).unwrap();
        assert_eq!(stats.q1, 2.0);
        assert_eq!(stats.median, 3.0);
        assert_eq!(stats.q3, 4.0);
        assert_eq!(stats.lower_whisker, 1.0);
        assert_eq!(stats.upper_whisker, 5.0);
        assert!(stats.outliers.is_empty());
    }

    #[test]
    fn test_box_stats_flags_outliers() {
        let values = [1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 8.0, 9.0, 100.0];
        let stats = BoxStats::from_values(&values).unwrap();
        assert_eq!(stats.outliers, vec![100.0]);
        assert_eq!(stats.upper_whisker, 9.0);
        assert_eq!(stats.lower_whisker, 1.0);
    }

    #[test]
    fn test_box_stats_zero_variance() {
        let stats = BoxStats::from_values(&[5.0, 5.0, 5.0]).unwrap();
        assert_eq!(stats.q1, 5.0);
        assert_eq!(stats.q3, 5.0);
        assert_eq!(stats.lower_whisker, 5.0);
        assert_eq!(stats.upper_whisker, 5.0);
        assert!(stats.outliers.is_empty());
    }

    #[test]
    fn test_box_stats_empty() {
        assert!(BoxStats::from_values(&[]).is_none());
    }
}
