use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Name of the primary text field every record is expected to carry.
pub const TEXT_COLUMN: &str = "text";

// ============================================================================
// Features
// ============================================================================

/// A feature derived from a record's text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Feature {
    /// Number of characters in the text.
    TextLength,
    /// Number of whitespace-delimited tokens.
    WordCount,
    /// Number of distinct whitespace-delimited tokens.
    UniqueWordCount,
}

impl Feature {
    /// All derived features, in column order.
    pub const ALL: [Feature; 3] = [
        Feature::TextLength,
        Feature::WordCount,
        Feature::UniqueWordCount,
    ];

    /// Column name used in tables, frames and file names.
    pub fn column_name(&self) -> &'static str {
        match self {
            Self::TextLength => "text_length",
            Self::WordCount => "word_count",
            Self::UniqueWordCount => "unique_word_count",
        }
    }

    /// Human-readable title, used for chart captions and axes.
    pub fn title(&self) -> &'static str {
        match self {
            Self::TextLength => "Text Length",
            Self::WordCount => "Word Count",
            Self::UniqueWordCount => "Unique Word Count",
        }
    }
}

// ============================================================================
// Records and datasets
// ============================================================================

/// One input entry.
///
/// `text` is `None` when the field is absent or `null`. Every other input
/// field is kept, in input order, in `fields`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Record {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<Value>,
    #[serde(flatten)]
    pub fields: Map<String, Value>,
}

impl Record {
    /// Split a JSON object into the text field and the passthrough fields.
    pub fn from_object(mut object: Map<String, Value>) -> Self {
        let text = object
            .shift_remove(TEXT_COLUMN)
            .filter(|value| !value.is_null());
        Self {
            text,
            fields: object,
        }
    }

    /// Whether `column` is absent or `null` in this record.
    pub fn is_missing(&self, column: &str) -> bool {
        if column == TEXT_COLUMN {
            return self.text.is_none();
        }
        self.fields.get(column).is_none_or(Value::is_null)
    }
}

/// An ordered collection of records.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Dataset {
    /// Input field names in order of first appearance.
    pub columns: Vec<String>,
    pub records: Vec<Record>,
}

impl Dataset {
    /// Build a dataset from parsed JSON objects, collecting the column order.
    pub fn from_objects(objects: Vec<Map<String, Value>>) -> Self {
        let mut columns: Vec<String> = Vec::new();
        for object in &objects {
            for key in object.keys() {
                if !columns.iter().any(|c| c == key) {
                    columns.push(key.clone());
                }
            }
        }

        let records = objects.into_iter().map(Record::from_object).collect();
        Self { columns, records }
    }

    /// (rows, columns), counting input columns only.
    pub fn shape(&self) -> (usize, usize) {
        (self.records.len(), self.columns.len())
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

/// A cleaned record with its derived features.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureRecord {
    /// The text, coerced to its string form.
    pub text: String,
    pub text_length: usize,
    pub word_count: usize,
    pub unique_word_count: usize,
    /// Passthrough input fields.
    #[serde(flatten)]
    pub fields: Map<String, Value>,
}

impl FeatureRecord {
    /// Value of a derived feature.
    pub fn feature(&self, feature: Feature) -> usize {
        match feature {
            Feature::TextLength => self.text_length,
            Feature::WordCount => self.word_count,
            Feature::UniqueWordCount => self.unique_word_count,
        }
    }
}

/// The cleaned dataset augmented with derived features.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FeatureDataset {
    /// Input field names, as in the source [`Dataset`].
    pub columns: Vec<String>,
    pub rows: Vec<FeatureRecord>,
}

impl FeatureDataset {
    /// (rows, columns), counting input columns plus the derived features.
    pub fn shape(&self) -> (usize, usize) {
        (self.rows.len(), self.columns.len() + Feature::ALL.len())
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

// ============================================================================
// Summaries
// ============================================================================

/// Missing-value count for one input column.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MissingValueCount {
    pub column: String,
    pub missing: usize,
}

/// Descriptive statistics for one derived feature.
///
/// Undefined values (empty input, too few rows) are NaN.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FeatureSummary {
    pub feature: Feature,
    pub count: usize,
    pub mean: f64,
    pub std: f64,
    pub min: f64,
    pub q1: f64,
    pub median: f64,
    pub q3: f64,
    pub max: f64,
    pub p95: f64,
    pub skewness: f64,
}

/// Pearson correlation matrix over the derived features.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CorrelationMatrix {
    pub features: Vec<Feature>,
    /// Row-major coefficients; `values[i][j]` correlates `features[i]` with `features[j]`.
    pub values: Vec<Vec<f64>>,
}

impl CorrelationMatrix {
    /// Coefficient between two features, if both are part of the matrix.
    pub fn get(&self, a: Feature, b: Feature) -> Option<f64> {
        let i = self.features.iter().position(|f| *f == a)?;
        let j = self.features.iter().position(|f| *f == b)?;
        Some(self.values[i][j])
    }

    /// Number of rows (and columns).
    pub fn dimension(&self) -> usize {
        self.features.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn object(value: Value) -> Map<String, Value> {
        value.as_object().cloned().unwrap()
    }

    #[test]
    fn test_record_from_object_splits_text() {
        let record = Record::from_object(object(json!({"id": 1, "text": "hello", "lang": "en"})));
        assert_eq!(record.text, Some(json!("hello")));
        assert_eq!(
            record.fields.keys().collect::<Vec<_>>(),
            vec!["id", "lang"]
        );
    }

    #[test]
    fn test_record_null_text_is_missing() {
        let record = Record::from_object(object(json!({"text": null})));
        assert!(record.text.is_none());
        assert!(record.is_missing(TEXT_COLUMN));
    }

    #[test]
    fn test_record_missing_passthrough_field() {
        let record = Record::from_object(object(json!({"text": "a", "lang": null})));
        assert!(record.is_missing("lang"));
        assert!(record.is_missing("absent"));
        assert!(!record.is_missing(TEXT_COLUMN));
    }

    #[test]
    fn test_dataset_columns_follow_first_appearance() {
        let dataset = Dataset::from_objects(vec![
            object(json!({"id": 1, "text": "a"})),
            object(json!({"text": "b", "lang": "en"})),
        ]);
        assert_eq!(dataset.columns, vec!["id", "text", "lang"]);
        assert_eq!(dataset.shape(), (2, 3));
    }

    #[test]
    fn test_feature_names() {
        assert_eq!(Feature::TextLength.column_name(), "text_length");
        assert_eq!(Feature::WordCount.title(), "Word Count");
        assert_eq!(
            serde_json::to_string(&Feature::UniqueWordCount).unwrap(),
            "\"unique_word_count\""
        );
    }

    #[test]
    fn test_correlation_matrix_lookup() {
        let matrix = CorrelationMatrix {
            features: vec![Feature::TextLength, Feature::WordCount],
            values: vec![vec![1.0, 0.5], vec![0.5, 1.0]],
        };
        assert_eq!(matrix.get(Feature::WordCount, Feature::TextLength), Some(0.5));
        assert_eq!(matrix.get(Feature::UniqueWordCount, Feature::TextLength), None);
        assert_eq!(matrix.dimension(), 2);
    }
}
