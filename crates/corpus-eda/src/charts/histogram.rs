//! Histogram with a Gaussian kernel density overlay.

use super::theme::{ChartTheme, FONT_FAMILY};
use super::finite_bounds;
use crate::profiler::statistics;
use crate::types::Feature;
use anyhow::Result;
use plotters::prelude::*;
use std::path::Path;

/// Points the density curve is evaluated at.
const DENSITY_POINTS: usize = 200;

/// One histogram bin, `[start, end)` (the last bin is closed).
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct Bin {
    pub start: f64,
    pub end: f64,
    pub count: usize,
}

/// Split the finite values into `bins` equal-width bins over their range.
///
/// A single distinct value `v` is binned over `v - 0.5..v + 0.5`; empty
/// input over `0..1`.
pub(crate) fn histogram_bins(values: &[f64], bins: usize) -> Vec<Bin> {
    let bins = bins.max(1);
    let (lo, hi) = match finite_bounds(values) {
        Some((lo, hi)) if lo == hi => (lo - 0.5, hi + 0.5),
        Some(bounds) => bounds,
        None => (0.0, 1.0),
    };
    let width = (hi - lo) / bins as f64;

    let mut counts = vec![0usize; bins];
    for v in values.iter().filter(|v| v.is_finite()) {
        let index = (((v - lo) / width).floor() as usize).min(bins - 1);
        counts[index] += 1;
    }

    counts
        .into_iter()
        .enumerate()
        .map(|(i, count)| Bin {
            start: lo + width * i as f64,
            end: lo + width * (i + 1) as f64,
            count,
        })
        .collect()
}

/// Gaussian KDE with Scott's bandwidth, scaled to histogram counts.
///
/// Returns `None` when there are fewer than two values or no spread.
pub(crate) fn density_curve(values: &[f64], range: (f64, f64), bin_width: f64) -> Option<Vec<(f64, f64)>> {
    let finite: Vec<f64> = values.iter().copied().filter(|v| v.is_finite()).collect();
    let n = finite.len();
    let std = statistics::sample_std(&finite);
    if n < 2 || std.is_nan() || std <= 0.0 {
        return None;
    }

    let bandwidth = std * (n as f64).powf(-0.2);
    let norm = 1.0 / (n as f64 * bandwidth * (2.0 * std::f64::consts::PI).sqrt());
    let scale = n as f64 * bin_width;

    let (lo, hi) = range;
    let step = (hi - lo) / (DENSITY_POINTS - 1) as f64;
    let curve = (0..DENSITY_POINTS)
        .map(|i| {
            let x = lo + step * i as f64;
            let density: f64 = finite
                .iter()
                .map(|xi| {
                    let u = (x - xi) / bandwidth;
                    (-0.5 * u * u).exp()
                })
                .sum::<f64>()
                * norm;
            (x, density * scale)
        })
        .collect();

    Some(curve)
}

pub(super) fn render(path: &Path, feature: Feature, values: &[f64], bins: usize, theme: &ChartTheme) -> Result<()> {
    let bins = histogram_bins(values, bins);
    let (lo, hi) = match (bins.first(), bins.last()) {
        (Some(first), Some(last)) => (first.start, last.end),
        _ => (0.0, 1.0),
    };
    let bin_width = bins.first().map(|b| b.end - b.start).unwrap_or(1.0);
    let curve = density_curve(values, (lo, hi), bin_width);

    let peak_count = bins.iter().map(|b| b.count).max().unwrap_or(0) as f64;
    let peak_density = curve
        .as_ref()
        .and_then(|c| c.iter().map(|&(_, y)| y).reduce(f64::max))
        .unwrap_or(0.0);
    let y_max = (peak_count.max(peak_density) * 1.05).max(1.0);

    let root = BitMapBackend::new(path, theme.histogram_size).into_drawing_area();
    root.fill(&theme.background)?;

    let mut builder = ChartBuilder::on(&root);
    builder.margin(15);
    if theme.labels {
        builder
            .caption(
                format!("Distribution of {}", feature.title()),
                (FONT_FAMILY, theme.caption_size),
            )
            .x_label_area_size(40)
            .y_label_area_size(55);
    }
    let mut chart = builder.build_cartesian_2d(lo..hi, 0f64..y_max)?;

    if theme.labels {
        chart
            .configure_mesh()
            .light_line_style(theme.grid.stroke_width(1))
            .label_style((FONT_FAMILY, theme.label_size))
            .x_desc(feature.title())
            .y_desc("Frequency")
            .draw()?;
    }

    chart.draw_series(bins.iter().map(|b| {
        Rectangle::new([(b.start, 0.0), (b.end, b.count as f64)], theme.histogram_fill.filled())
    }))?;
    chart.draw_series(bins.iter().filter(|b| b.count > 0).map(|b| {
        Rectangle::new([(b.start, 0.0), (b.end, b.count as f64)], theme.background.stroke_width(1))
    }))?;

    if let Some(curve) = curve {
        chart.draw_series(LineSeries::new(curve, theme.density_line.stroke_width(2)))?;
    }

    root.present()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bins_cover_range_and_count_everything() {
        let values = [1.0, 2.0, 2.0, 3.0, 10.0];
        let bins = histogram_bins(&values, 3);

        assert_eq!(bins.len(), 3);
        assert_eq!(bins[0].start, 1.0);
        assert!((bins[2].end - 10.0).abs() < 1e-12);
        assert_eq!(bins.iter().map(|b| b.count).sum::<usize>(), 5);
        // the maximum lands in the last (closed) bin
        assert_eq!(bins[2].count, 1);
        assert_eq!(bins[0].count, 4);
    }

    #[test]
    fn test_bins_single_value() {
        let bins = histogram_bins(&[7.0, 7.0, 7.0], 50);
        assert_eq!(bins.len(), 50);
        assert_eq!(bins[0].start, 6.5);
        assert!((bins[49].end - 7.5).abs() < 1e-12);
        assert_eq!(bins.iter().map(|b| b.count).sum::<usize>(), 3);
    }

    #[test]
    fn test_bins_empty_input() {
        let bins = histogram_bins(&[], 4);
        assert_eq!(bins.len(), 4);
        assert!(bins.iter().all(|b| b.count == 0));
    }

    #[test]
    fn test_density_skipped_without_spread() {
        assert!(density_curve(&[3.0, 3.0, 3.0], (2.5, 3.5), 0.02).is_none());
        assert!(density_curve(&[3.0], (2.5, 3.5), 0.02).is_none());
    }

    #[test]
    fn test_density_area_matches_sample_size() {
        let values: Vec<f64> = (0..100).map(|i| (i % 10) as f64).collect();
        let (lo, hi) = (-20.0, 30.0);
        let bin_width = 1.0;
        let curve = density_curve(&values, (lo, hi), bin_width).unwrap();
        assert_eq!(curve.len(), DENSITY_POINTS);

        // integrate with the trapezoid rule: area ~ n * bin_width
        let area: f64 = curve
            .windows(2)
            .map(|w| (w[1].0 - w[0].0) * (w[0].1 + w[1].1) / 2.0)
            .sum();
        assert!((area - 100.0).abs() < 1.0, "area {area}");
    }
}
