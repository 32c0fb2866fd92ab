//! The sectioned console report.

use super::table::{Align, MarkdownTable, escape_cell, format_number};
use crate::types::{CorrelationMatrix, FeatureDataset, FeatureSummary, MissingValueCount};
use std::io::{self, Write};
use std::path::Path;

const RULE_WIDTH: usize = 80;

/// Writes the report sections to any [`Write`] sink, in call order.
pub struct ConsoleReport<W: Write> {
    out: W,
}

impl<W: Write> ConsoleReport<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    /// Give back the underlying writer.
    pub fn into_inner(self) -> W {
        self.out
    }

    fn section(&mut self, title: &str) -> io::Result<()> {
        let head = format!("--- {title} ");
        let fill = RULE_WIDTH.saturating_sub(head.chars().count());
        writeln!(self.out, "\n{head}{}", "-".repeat(fill))
    }

    pub fn banner(&mut self) -> io::Result<()> {
        let rule = "=".repeat(RULE_WIDTH);
        writeln!(self.out, "\n{rule}")?;
        writeln!(self.out, "{:^width$}", "EXPLORATORY DATA ANALYSIS (EDA) REPORT", width = RULE_WIDTH)?;
        writeln!(self.out, "{rule}")
    }

    /// Section 1: initial shape and the missing-value table.
    pub fn initial_info(&mut self, shape: (usize, usize), missing: &[MissingValueCount]) -> io::Result<()> {
        self.section("1. INITIAL INFORMATION AND DATA CLEANING")?;
        writeln!(self.out, "Initial Dataset Shape: ({}, {})", shape.0, shape.1)?;

        writeln!(self.out, "\n[TABLE 1.1] Missing Values Check (before cleaning):")?;
        let mut table = MarkdownTable::new(["", "Missing Count"]).align(1, Align::Right);
        for count in missing {
            table.push_row([count.column.clone(), count.missing.to_string()]);
        }
        write!(self.out, "{table}")
    }

    pub fn clean_shape(&mut self, shape: (usize, usize)) -> io::Result<()> {
        writeln!(
            self.out,
            "\nShape after handling missing values: ({}, {})",
            shape.0, shape.1
        )
    }

    /// Section 2: the first `rows` feature-augmented records.
    pub fn feature_sample(&mut self, data: &FeatureDataset, rows: usize) -> io::Result<()> {
        self.section("2. EXAMPLE OF CREATED FEATURES")?;
        writeln!(self.out, "[TABLE 2.1] First {rows} Rows with Textual Features:")?;

        let mut table = MarkdownTable::new(["text", "text_length", "word_count", "unique_word_count"]);
        for row in data.rows.iter().take(rows) {
            table.push_row([
                escape_cell(&row.text),
                row.text_length.to_string(),
                row.word_count.to_string(),
                row.unique_word_count.to_string(),
            ]);
        }
        write!(self.out, "{table}")
    }

    /// Section 3: descriptive statistics and skewness.
    pub fn statistics(&mut self, summaries: &[FeatureSummary]) -> io::Result<()> {
        self.section("3. UNIVARIATE ANALYSIS: DESCRIPTIVE STATISTICS")?;
        writeln!(self.out, "[TABLE 3.1] Central Tendency, Dispersion, and Quartiles:")?;

        let mut table = MarkdownTable::new([
            "Variable",
            "mean",
            "std",
            "min",
            "Q1",
            "Median (Q2)",
            "Q3",
            "max",
            "P95",
        ]);
        for s in summaries {
            let mut cells = vec![s.feature.column_name().to_string()];
            cells.extend(
                [s.mean, s.std, s.min, s.q1, s.median, s.q3, s.max, s.p95]
                    .into_iter()
                    .map(format_number),
            );
            table.push_row(cells);
        }
        write!(self.out, "{table}")?;

        writeln!(self.out, "\n[TABLE 3.2] Distribution Shape (Skewness):")?;
        let mut skew = MarkdownTable::new(["", "Skewness"]).align(1, Align::Right);
        for s in summaries {
            skew.push_row([s.feature.column_name().to_string(), format_number(s.skewness)]);
        }
        write!(self.out, "{skew}")
    }

    /// Section 4: the Pearson matrix.
    pub fn correlation(&mut self, matrix: &CorrelationMatrix) -> io::Result<()> {
        self.section("4. MULTIVARIATE ANALYSIS: PEARSON CORRELATION")?;
        writeln!(self.out, "[TABLE 4.1] Pearson Correlation Matrix:")?;

        let headers = std::iter::once("").chain(matrix.features.iter().map(|f| f.column_name()));
        let mut table = MarkdownTable::new(headers);
        for (feature, row) in matrix.features.iter().zip(&matrix.values) {
            let cells = std::iter::once(feature.column_name().to_string())
                .chain(row.iter().copied().map(format_number));
            table.push_row(cells);
        }
        write!(self.out, "{table}")
    }

    /// Section 5: one `Saved:` line per written chart.
    pub fn artifacts<P: AsRef<Path>>(&mut self, paths: &[P]) -> io::Result<()> {
        self.section("5. VISUALIZATIONS SAVED TO FILES")?;
        for path in paths {
            let path = path.as_ref();
            let name = path
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_else(|| path.display().to_string());
            writeln!(self.out, "Saved: {name}")?;
        }
        Ok(())
    }

    /// Extra output files (run report, feature export).
    pub fn exports<P: AsRef<Path>>(&mut self, paths: &[P]) -> io::Result<()> {
        for path in paths {
            writeln!(self.out, "Exported: {}", path.as_ref().display())?;
        }
        Ok(())
    }

    pub fn footer(&mut self) -> io::Result<()> {
        writeln!(self.out, "\n{}", "=".repeat(RULE_WIDTH))?;
        writeln!(
            self.out,
            "All required printed outputs and PNG files have been generated for documentation."
        )?;
        writeln!(self.out, "{}", "=".repeat(RULE_WIDTH))?;
        self.out.flush()
    }
}
