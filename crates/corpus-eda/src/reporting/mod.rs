//! Report output.
//!
//! - [`ConsoleReport`] prints the sectioned, human-readable report with
//!   markdown tables.
//! - [`EdaReport`] is the serialisable run summary, printed for `--json` and
//!   written to `<stem>_eda_report.json` for `--emit-report`.
//! - [`export_features_csv`] saves the feature table for downstream use.
//!
//! # Example
//!
//! ```rust,ignore
//! use corpus_eda::reporting::{write_report_to_file, report_stem};
//!
//! let report = pipeline.run(std::io::stdout())?;
//! println!("{}", serde_json::to_string_pretty(&report)?);
//!
//! write_report_to_file(&report, Path::new("out"), &report_stem(input))?;
//! ```

mod console;
mod report;
mod table;

pub use console::ConsoleReport;
pub use report::{
    EdaReport, ReportParams, export_features_csv, report_path, report_stem, write_report_to_file,
};
pub use table::{Align, MarkdownTable, escape_cell, format_number};
