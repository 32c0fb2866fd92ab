//! Pipe-style (markdown) tables for the console report.

use std::fmt;

/// Longest text cell, in characters, before it is cut with `...`.
pub const MAX_TEXT_CELL_CHARS: usize = 100;

/// Column alignment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Align {
    #[default]
    Left,
    Right,
}

/// A table rendered in the markdown pipe format.
///
/// ```text
/// |             | Missing Count |
/// |:------------|--------------:|
/// | text        |             1 |
/// ```
#[derive(Debug, Clone, Default)]
pub struct MarkdownTable {
    headers: Vec<String>,
    aligns: Vec<Align>,
    rows: Vec<Vec<String>>,
}

impl MarkdownTable {
    /// A table with the given headers, all left-aligned.
    pub fn new<I, S>(headers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let headers: Vec<String> = headers.into_iter().map(Into::into).collect();
        let aligns = vec![Align::Left; headers.len()];
        Self {
            headers,
            aligns,
            rows: Vec::new(),
        }
    }

    /// Set the alignment of one column.
    pub fn align(mut self, column: usize, align: Align) -> Self {
        if let Some(slot) = self.aligns.get_mut(column) {
            *slot = align;
        }
        self
    }

    /// Append a row; missing cells render empty, extra cells are dropped.
    pub fn push_row<I, S>(&mut self, cells: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut row: Vec<String> = cells
            .into_iter()
            .take(self.headers.len())
            .map(Into::into)
            .collect();
        row.resize(self.headers.len(), String::new());
        self.rows.push(row);
    }

    fn widths(&self) -> Vec<usize> {
        self.headers
            .iter()
            .enumerate()
            .map(|(i, header)| {
                self.rows
                    .iter()
                    .map(|row| row[i].chars().count())
                    .chain(std::iter::once(header.chars().count()))
                    .max()
                    .unwrap_or(0)
            })
            .collect()
    }

    fn write_line(f: &mut fmt::Formatter<'_>, cells: &[String], widths: &[usize], aligns: &[Align]) -> fmt::Result {
        write!(f, "|")?;
        for ((cell, &width), align) in cells.iter().zip(widths).zip(aligns) {
            match align {
                Align::Left => write!(f, " {cell:<width$} |")?,
                Align::Right => write!(f, " {cell:>width$} |")?,
            }
        }
        writeln!(f)
    }
}

impl fmt::Display for MarkdownTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let widths = self.widths();

        Self::write_line(f, &self.headers, &widths, &self.aligns)?;

        write!(f, "|")?;
        for (&width, align) in widths.iter().zip(&self.aligns) {
            let dashes = "-".repeat(width + 1);
            match align {
                Align::Left => write!(f, ":{dashes}|")?,
                Align::Right => write!(f, "{dashes}:|")?,
            }
        }
        writeln!(f)?;

        for row in &self.rows {
            Self::write_line(f, row, &widths, &self.aligns)?;
        }
        Ok(())
    }
}

/// Format a statistic: `nan` for NaN, otherwise up to four decimals with
/// trailing zeros removed (`2.5`, `3`, `0.1235`).
pub fn format_number(value: f64) -> String {
    if value.is_nan() {
        return "nan".to_string();
    }
    if value.is_infinite() {
        return if value > 0.0 { "inf" } else { "-inf" }.to_string();
    }

    let formatted = format!("{value:.4}");
    let trimmed = formatted.trim_end_matches('0').trim_end_matches('.');
    match trimmed {
        "-0" => "0".to_string(),
        other => other.to_string(),
    }
}

/// Make free text safe for a single table cell.
///
/// Line breaks become spaces, pipes are escaped and the text is cut to
/// [`MAX_TEXT_CELL_CHARS`] characters.
pub fn escape_cell(text: &str) -> String {
    let flattened: String = text
        .chars()
        .map(|c| if c == '\n' || c == '\r' || c == '\t' { ' ' } else { c })
        .collect();

    let cut = if flattened.chars().count() > MAX_TEXT_CELL_CHARS {
        let head: String = flattened.chars().take(MAX_TEXT_CELL_CHARS).collect();
        format!("{}...", head.trim_end())
    } else {
        flattened
    };

    cut.replace('|', "\\|")
}
