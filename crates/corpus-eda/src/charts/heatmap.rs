//! Annotated correlation heatmap with a colour bar.

use super::finite_bounds;
use super::theme::{ChartTheme, FONT_FAMILY};
use crate::types::CorrelationMatrix;
use anyhow::Result;
use plotters::prelude::*;
use plotters::style::text_anchor::{HPos, Pos, VPos};
use std::path::Path;

/// Viridis colour stops, evenly spaced over `[0, 1]`.
const VIRIDIS: [(u8, u8, u8); 9] = [
    (68, 1, 84),
    (71, 44, 122),
    (59, 81, 139),
    (44, 113, 142),
    (33, 144, 141),
    (39, 173, 129),
    (92, 200, 99),
    (170, 220, 50),
    (253, 231, 37),
];

const COLOR_BAR_WIDTH: u32 = 90;
const COLOR_BAR_STEPS: usize = 64;

/// Viridis colour at `t`, clamped to `[0, 1]`.
pub(crate) fn viridis(t: f64) -> RGBColor {
    let t = if t.is_nan() { 0.0 } else { t.clamp(0.0, 1.0) };
    let scaled = t * (VIRIDIS.len() - 1) as f64;
    let index = (scaled.floor() as usize).min(VIRIDIS.len() - 2);
    let frac = scaled - index as f64;

    let (a, b) = (VIRIDIS[index], VIRIDIS[index + 1]);
    let lerp = |x: u8, y: u8| (x as f64 + (y as f64 - x as f64) * frac).round() as u8;
    RGBColor(lerp(a.0, b.0), lerp(a.1, b.1), lerp(a.2, b.2))
}

/// Maps correlation values onto the colour scale.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct ColorScale {
    pub min: f64,
    pub max: f64,
}

impl ColorScale {
    /// Scale spanning the finite values of the matrix; `-1..1` when there are none.
    pub fn for_matrix(matrix: &CorrelationMatrix) -> Self {
        let flat: Vec<f64> = matrix.values.iter().flatten().copied().collect();
        match finite_bounds(&flat) {
            Some((min, max)) => Self { min, max },
            None => Self { min: -1.0, max: 1.0 },
        }
    }

    /// Position of `value` on the scale; 0.5 when the scale is degenerate.
    pub fn normalize(&self, value: f64) -> f64 {
        if self.max == self.min {
            0.5
        } else {
            (value - self.min) / (self.max - self.min)
        }
    }

    /// Cell colour, or the missing colour for NaN.
    pub fn color(&self, value: f64, missing: RGBColor) -> RGBColor {
        if value.is_finite() {
            viridis(self.normalize(value))
        } else {
            missing
        }
    }
}

/// Black or white, whichever reads better on `background`.
pub(crate) fn annotation_color(background: RGBColor) -> RGBColor {
    let RGBColor(r, g, b) = background;
    let luminance = 0.299 * r as f64 + 0.587 * g as f64 + 0.114 * b as f64;
    if luminance > 128.0 { BLACK } else { WHITE }
}

fn format_cell(value: f64) -> String {
    if value.is_nan() {
        "nan".to_string()
    } else {
        format!("{value:.2}")
    }
}

pub(super) fn render(path: &Path, matrix: &CorrelationMatrix, theme: &ChartTheme) -> Result<()> {
    let n = matrix.dimension();
    let size = n.max(1) as f64;
    let scale = ColorScale::for_matrix(matrix);

    let canvas = BitMapBackend::new(path, theme.heatmap_size).into_drawing_area();
    canvas.fill(&theme.background)?;

    let split_at = theme.heatmap_size.0.saturating_sub(COLOR_BAR_WIDTH);
    let (main, bar) = if theme.labels {
        canvas
            .titled("Correlation Matrix Heatmap", (FONT_FAMILY, theme.caption_size))?
            .split_horizontally(split_at)
    } else {
        canvas.split_horizontally(split_at)
    };

    let mut builder = ChartBuilder::on(&main);
    builder.margin(15);
    if theme.labels {
        builder.x_label_area_size(40).y_label_area_size(140);
    }
    let mut chart = builder.build_cartesian_2d(0f64..size, 0f64..size)?;

    let cells: Vec<(usize, usize, f64)> = (0..n)
        .flat_map(|i| (0..n).map(move |j| (i, j)))
        .map(|(i, j)| (i, j, matrix.values[i][j]))
        .collect();

    // row 0 at the top
    let cell_rect = |i: usize, j: usize| {
        let top = size - i as f64;
        [(j as f64, top - 1.0), (j as f64 + 1.0, top)]
    };

    chart.draw_series(cells.iter().map(|&(i, j, value)| {
        Rectangle::new(cell_rect(i, j), scale.color(value, theme.missing_cell).filled())
    }))?;
    chart.draw_series(
        cells
            .iter()
            .map(|&(i, j, _)| Rectangle::new(cell_rect(i, j), BLACK.stroke_width(1))),
    )?;

    if theme.labels {
        let centered = Pos::new(HPos::Center, VPos::Center);
        for &(i, j, value) in &cells {
            let color = annotation_color(scale.color(value, theme.missing_cell));
            let style = (FONT_FAMILY, theme.annotation_size)
                .into_font()
                .color(&color)
                .pos(centered);
            let center = (j as f64 + 0.5, size - i as f64 - 0.5);
            chart.draw_series(std::iter::once(Text::new(format_cell(value), center, style)))?;
        }

        let label_style = (FONT_FAMILY, theme.label_size).into_font().color(&BLACK);
        for (k, feature) in matrix.features.iter().enumerate() {
            let name = feature.column_name();

            let (x, y) = chart.backend_coord(&(k as f64 + 0.5, 0.0));
            canvas.draw(&Text::new(
                name,
                (x, y + 8),
                label_style.pos(Pos::new(HPos::Center, VPos::Top)),
            ))?;

            let (x, y) = chart.backend_coord(&(0.0, size - k as f64 - 0.5));
            canvas.draw(&Text::new(
                name,
                (x - 8, y),
                label_style.pos(Pos::new(HPos::Right, VPos::Center)),
            ))?;
        }
    }

    draw_color_bar(&bar, scale, theme)?;

    canvas.present()?;
    Ok(())
}

fn draw_color_bar<DB: DrawingBackend>(
    area: &DrawingArea<DB, plotters::coord::Shift>,
    scale: ColorScale,
    theme: &ChartTheme,
) -> Result<()>
where
    DB::ErrorType: 'static,
{
    let (lo, hi) = if scale.max > scale.min {
        (scale.min, scale.max)
    } else {
        (scale.min - 0.5, scale.max + 0.5)
    };

    let mut builder = ChartBuilder::on(area);
    builder.margin_top(15).margin_bottom(55).margin_right(10);
    if theme.labels {
        builder.y_label_area_size(45);
    }
    let mut chart = builder.build_cartesian_2d(0f64..1f64, lo..hi)?;

    let step = (hi - lo) / COLOR_BAR_STEPS as f64;
    chart.draw_series((0..COLOR_BAR_STEPS).map(|k| {
        let start = lo + step * k as f64;
        let mid = start + step / 2.0;
        Rectangle::new(
            [(0.0, start), (1.0, start + step)],
            scale.color(mid, theme.missing_cell).filled(),
        )
    }))?;

    if theme.labels {
        chart
            .configure_mesh()
            .disable_mesh()
            .disable_x_axis()
            .y_labels(5)
            .y_label_formatter(&|v| format!("{v:.2}"))
            .label_style((FONT_FAMILY, theme.label_size))
            .draw()?;
    }
    Ok(())
}
