//! Load stage: read a record collection into a [`Dataset`].
//!
//! Supported formats:
//! * `.jsonl` / `.ndjson` – one JSON object per line (blank lines skipped)
//! * anything else        – a JSON array of objects, e.g. `[{"text": "..."}, ...]`
//!
//! The file is read in one call and the handle is dropped before parsing.

use crate::error::{EdaError, Result};
use crate::types::Dataset;
use serde_json::{Map, Value};
use std::path::Path;
use tracing::{debug, info};

/// Layout of the input file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputFormat {
    /// A single JSON array of objects.
    JsonArray,
    /// Newline-delimited JSON objects.
    JsonLines,
}

impl InputFormat {
    /// Pick the format from the file extension.
    pub fn from_path(path: &Path) -> Self {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or("")
            .to_ascii_lowercase();

        match ext.as_str() {
            "jsonl" | "ndjson" => Self::JsonLines,
            _ => Self::JsonArray,
        }
    }
}

/// Load the record collection at `path`.
///
/// # Errors
///
/// Returns [`EdaError::Load`] if the file cannot be read, is not valid JSON,
/// or does not hold a collection of objects.
pub fn load_dataset(path: &Path) -> Result<Dataset> {
    info!("Loading records from: {}", path.display());

    let content = std::fs::read_to_string(path).map_err(|e| EdaError::load(path, e.to_string()))?;
    let format = InputFormat::from_path(path);
    debug!("Input format: {:?}", format);

    let dataset = parse_records(&content, format).map_err(|reason| EdaError::load(path, reason))?;
    info!("Loaded {} records with {} columns", dataset.len(), dataset.columns.len());
    Ok(dataset)
}

/// Parse already-read input into a [`Dataset`].
///
/// Returns a human-readable reason on failure.
pub fn parse_records(content: &str, format: InputFormat) -> std::result::Result<Dataset, String> {
    let objects = match format {
        InputFormat::JsonArray => parse_json_array(content)?,
        InputFormat::JsonLines => parse_json_lines(content)?,
    };
    Ok(Dataset::from_objects(objects))
}

fn parse_json_array(content: &str) -> std::result::Result<Vec<Map<String, Value>>, String> {
    let root: Value = serde_json::from_str(content).map_err(|e| e.to_string())?;

    let items = match root {
        Value::Array(items) => items,
        other => {
            return Err(format!(
                "expected a JSON array of objects, found {}",
                json_kind(&other)
            ));
        }
    };

    items
        .into_iter()
        .enumerate()
        .map(|(index, item)| match item {
            Value::Object(map) => Ok(map),
            other => Err(format!(
                "record {} is not a JSON object (found {})",
                index,
                json_kind(&other)
            )),
        })
        .collect()
}

fn parse_json_lines(content: &str) -> std::result::Result<Vec<Map<String, Value>>, String> {
    let mut objects = Vec::new();

    for (line_no, line) in content.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        let value: Value =
            serde_json::from_str(line).map_err(|e| format!("line {}: {}", line_no + 1, e))?;
        match value {
            Value::Object(map) => objects.push(map),
            other => {
                return Err(format!(
                    "line {} is not a JSON object (found {})",
                    line_no + 1,
                    json_kind(&other)
                ));
            }
        }
    }

    Ok(objects)
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;
    use std::io::Write;

    #[test]
    fn test_format_from_extension() {
        assert_eq!(InputFormat::from_path(Path::new("a.json")), InputFormat::JsonArray);
        assert_eq!(InputFormat::from_path(Path::new("a.JSONL")), InputFormat::JsonLines);
        assert_eq!(InputFormat::from_path(Path::new("a.ndjson")), InputFormat::JsonLines);
        assert_eq!(InputFormat::from_path(Path::new("corpus")), InputFormat::JsonArray);
    }

    #[test]
    fn test_parse_array_of_objects() {
        let dataset = parse_records(
            r#"[{"id": 1, "text": "hi"}, {"foo": "bar"}]"#,
            InputFormat::JsonArray,
        )
        .unwrap();

        assert_eq!(dataset.len(), 2);
        assert_eq!(dataset.columns, vec!["id", "text", "foo"]);
        assert_eq!(dataset.records[0].text, Some(json!("hi")));
        assert!(dataset.records[1].text.is_none());
    }

    #[test]
    fn test_parse_empty_array() {
        let dataset = parse_records("[]", InputFormat::JsonArray).unwrap();
        assert!(dataset.is_empty());
        assert_eq!(dataset.shape(), (0, 0));
    }

    #[test]
    fn test_parse_rejects_non_array() {
        let err = parse_records(r#"{"text": "hi"}"#, InputFormat::JsonArray).unwrap_err();
        assert!(err.contains("expected a JSON array"));
    }

    #[test]
    fn test_parse_rejects_non_object_element() {
        let err = parse_records(r#"[{"text": "hi"}, 3]"#, InputFormat::JsonArray).unwrap_err();
        assert!(err.contains("record 1"));
    }

    #[test]
    fn test_parse_malformed_json() {
        assert!(parse_records(r#"[{"text": "hi"#, InputFormat::JsonArray).is_err());
    }

    #[test]
    fn test_parse_json_lines_skips_blank_lines() {
        let content = "{\"text\": \"a b\"}\n\n{\"text\": \"c\", \"id\": 2}\n";
        let dataset = parse_records(content, InputFormat::JsonLines).unwrap();
        assert_eq!(dataset.len(), 2);
        assert_eq!(dataset.columns, vec!["text", "id"]);
    }

    #[test]
    fn test_parse_json_lines_reports_line_number() {
        let err = parse_records("{\"text\": \"a\"}\n[1]\n", InputFormat::JsonLines).unwrap_err();
        assert!(err.contains("line 2"));
    }

    #[test]
    fn test_load_missing_file_is_load_error() {
        let err = load_dataset(Path::new("definitely/not/here.json")).unwrap_err();
        assert!(err.is_load_error());
        assert_eq!(err.error_code(), "LOAD_ERROR");
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::Builder::new().suffix(".json").tempfile().unwrap();
        write!(file, r#"[{{"text": "a b"}}, {{"text": "a b a"}}]"#).unwrap();

        let dataset = load_dataset(file.path()).unwrap();
        assert_eq!(dataset.len(), 2);
    }
}
