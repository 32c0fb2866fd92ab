//! Missing-value accounting.

use crate::types::{Dataset, MissingValueCount};

/// Count absent or `null` values per input column, in column order.
pub fn missing_value_counts(dataset: &Dataset) -> Vec<MissingValueCount> {
    dataset
        .columns
        .iter()
        .map(|column| MissingValueCount {
            column: column.clone(),
            missing: dataset
                .records
                .iter()
                .filter(|record| record.is_missing(column))
                .count(),
        })
        .collect()
}
