//! Scatter plot of word count against text length.

use super::padded_range;
use super::theme::{ChartTheme, FONT_FAMILY};
use anyhow::Result;
use plotters::prelude::*;
use std::path::Path;

const POINT_SIZE: u32 = 3;

/// Scatter plot of word count (x) against text length (y).
///
/// Pairs where either value is not finite are skipped.
pub(super) fn render(path: &Path, word_counts: &[f64], text_lengths: &[f64], theme: &ChartTheme) -> Result<()> {
    let points: Vec<(f64, f64)> = word_counts
        .iter()
        .zip(text_lengths)
        .map(|(&x, &y)| (x, y))
        .filter(|(x, y)| x.is_finite() && y.is_finite())
        .collect();

    let xs: Vec<f64> = points.iter().map(|p| p.0).collect();
    let ys: Vec<f64> = points.iter().map(|p| p.1).collect();

    let root = BitMapBackend::new(path, theme.scatter_size).into_drawing_area();
    root.fill(&theme.background)?;

    let mut builder = ChartBuilder::on(&root);
    builder.margin(15);
    if theme.labels {
        builder
            .caption(
                "Relationship between Word Count and Text Length",
                (FONT_FAMILY, theme.caption_size),
            )
            .x_label_area_size(45)
            .y_label_area_size(60);
    }
    let mut chart = builder.build_cartesian_2d(padded_range(&xs), padded_range(&ys))?;

    if theme.labels {
        chart
            .configure_mesh()
            .light_line_style(theme.grid.stroke_width(1))
            .label_style((FONT_FAMILY, theme.label_size))
            .x_desc("Word Count")
            .y_desc("Text Length (Characters)")
            .draw()?;
    }

    let style = theme.scatter_point.mix(theme.scatter_alpha).filled();
    chart.draw_series(points.into_iter().map(|p| Circle::new(p, POINT_SIZE, style)))?;

    root.present()?;
    Ok(())
}
