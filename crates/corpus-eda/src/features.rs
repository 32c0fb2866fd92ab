//! Feature derivation.
//!
//! Every cleaned record gets three features computed from its text:
//! `text_length` (characters), `word_count` (whitespace-delimited tokens) and
//! `unique_word_count` (distinct tokens). Non-string text is measured through
//! its repr-style string form (`True`, `[1, 2]`, `{'a': 1}`) rather than
//! rejected.

use crate::types::{Dataset, Feature, FeatureDataset, FeatureRecord, TEXT_COLUMN};
use polars::prelude::*;
use serde_json::Value;
use std::collections::HashSet;
use tracing::debug;

/// Features measured from a single text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TextFeatures {
    pub text_length: usize,
    pub word_count: usize,
    pub unique_word_count: usize,
}

impl TextFeatures {
    /// Measure a text. Empty text yields all zeros.
    pub fn measure(text: &str) -> Self {
        let tokens: Vec<&str> = text.split_whitespace().collect();
        let unique: HashSet<&str> = tokens.iter().copied().collect();

        Self {
            text_length: text.chars().count(),
            word_count: tokens.len(),
            unique_word_count: unique.len(),
        }
    }
}

/// String form of a text value: strings as-is, anything else in repr style
/// (`None`, `True`, single-quoted strings, `, ` and `: ` separators).
pub fn coerce_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => {
            let mut out = String::new();
            write_repr(other, &mut out);
            out
        }
    }
}

fn write_repr(value: &Value, out: &mut String) {
    match value {
        Value::Null => out.push_str("None"),
        Value::Bool(true) => out.push_str("True"),
        Value::Bool(false) => out.push_str("False"),
        Value::Number(n) => out.push_str(&n.to_string()),
        Value::String(s) => write_quoted(s, out),
        Value::Array(items) => {
            out.push('[');
            for (i, item) in items.iter().enumerate() {
                if i > 0 {
                    out.push_str(", ");
                }
                write_repr(item, out);
            }
            out.push(']');
        }
        Value::Object(map) => {
            out.push('{');
            for (i, (key, item)) in map.iter().enumerate() {
                if i > 0 {
                    out.push_str(", ");
                }
                write_quoted(key, out);
                out.push_str(": ");
                write_repr(item, out);
            }
            out.push('}');
        }
    }
}

// Single quotes unless the string holds a single quote and no double quote.
fn write_quoted(s: &str, out: &mut String) {
    let quote = if s.contains('\'') && !s.contains('"') { '"' } else { '\'' };
    out.push(quote);
    for c in s.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            c if c == quote => {
                out.push('\\');
                out.push(c);
            }
            c => out.push(c),
        }
    }
    out.push(quote);
}

/// Derive the text features for every record of a cleaned dataset.
///
/// Records without text are measured as empty text; cleaning removes them
/// beforehand, so this only happens when the stage is used on its own.
pub fn derive_features(dataset: Dataset) -> FeatureDataset {
    let Dataset { columns, records } = dataset;

    let rows: Vec<FeatureRecord> = records
        .into_iter()
        .map(|record| {
            let text = record.text.as_ref().map(coerce_text).unwrap_or_default();
            let measured = TextFeatures::measure(&text);
            FeatureRecord {
                text,
                text_length: measured.text_length,
                word_count: measured.word_count,
                unique_word_count: measured.unique_word_count,
                fields: record.fields,
            }
        })
        .collect();

    debug!("Derived features for {} records", rows.len());
    FeatureDataset { columns, rows }
}

/// Columnar view of the feature dataset: `text` plus the three feature columns.
pub fn feature_frame(dataset: &FeatureDataset) -> PolarsResult<DataFrame> {
    let texts: Vec<String> = dataset.rows.iter().map(|r| r.text.clone()).collect();
    let column = |feature: Feature| -> Vec<i64> {
        dataset
            .rows
            .iter()
            .map(|r| r.feature(feature) as i64)
            .collect()
    };

    df!(
        TEXT_COLUMN => texts,
        Feature::TextLength.column_name() => column(Feature::TextLength),
        Feature::WordCount.column_name() => column(Feature::WordCount),
        Feature::UniqueWordCount.column_name() => column(Feature::UniqueWordCount)
    )
}
