//! Clean stage.
//!
//! This module provides:
//! - Per-column missing-value counts for the report
//! - Removal of records without a usable `text` field

mod missing;

pub use missing::missing_value_counts;

use crate::types::Dataset;
use tracing::{debug, info};

/// Data cleaner for the text corpus.
pub struct DataCleaner;

impl DataCleaner {
    /// Drop every record whose `text` is absent or `null`.
    ///
    /// Relative order of the kept records is preserved and the column list is
    /// left untouched. Returns the cleaned dataset and the number of records
    /// removed. Running it on already-clean data removes nothing.
    pub fn drop_missing_text(&self, dataset: Dataset) -> (Dataset, usize) {
        let before = dataset.len();
        let Dataset { columns, records } = dataset;

        let records: Vec<_> = records
            .into_iter()
            .filter(|record| record.text.is_some())
            .collect();

        let removed = before - records.len();
        if removed > 0 {
            info!("Removed {} records without text", removed);
        } else {
            debug!("All records have text");
        }

        (Dataset { columns, records }, removed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::loader::{InputFormat, parse_records};
    use serde_json::json;

    #[test]
    fn test_drop_missing_text_keeps_text_records() {
        let dataset =
            parse_records(r#"[{"text": "hi"}, {"foo": "bar"}]"#, InputFormat::JsonArray).unwrap();

        let (cleaned, removed) = DataCleaner.drop_missing_text(dataset);
        assert_eq!(removed, 1);
        assert_eq!(cleaned.len(), 1);
        assert_eq!(cleaned.records[0].text, Some(json!("hi")));
        // dropping rows does not drop columns
        assert_eq!(cleaned.shape(), (1, 2));
    }

    #[test]
    fn test_drop_missing_text_preserves_order() {
        let dataset = parse_records(
            r#"[{"text": "a"}, {"text": null}, {"text": "b"}, {}, {"text": "c"}]"#,
            InputFormat::JsonArray,
        )
        .unwrap();

        let (cleaned, removed) = DataCleaner.drop_missing_text(dataset);
        assert_eq!(removed, 2);
        let texts: Vec<_> = cleaned.records.iter().map(|r| r.text.clone()).collect();
        assert_eq!(texts, vec![Some(json!("a")), Some(json!("b")), Some(json!("c"))]);
    }

    #[test]
    fn test_drop_missing_text_is_idempotent() {
        let dataset = parse_records(
            r#"[{"text": "a", "id": 1}, {"id": 2}, {"text": 7}]"#,
            InputFormat::JsonArray,
        )
        .unwrap();

        let (once, _) = DataCleaner.drop_missing_text(dataset);
        let (twice, removed_again) = DataCleaner.drop_missing_text(once.clone());
        assert_eq!(removed_again, 0);
        assert_eq!(once, twice);
    }

    #[test]
    fn test_drop_missing_text_on_empty_dataset() {
        let (cleaned, removed) = DataCleaner.drop_missing_text(Dataset::default());
        assert_eq!(removed, 0);
        assert!(cleaned.is_empty());
    }
}
