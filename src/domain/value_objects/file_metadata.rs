use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;

pub type CsvRow = HashMap<String, String>;

/// Free-form, extractor-specific metadata attached to extracted content.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FileMetadata {
    properties: HashMap<String, Value>,
}

impl FileMetadata {
    pub fn new() -> Self {
        Self {
            properties: HashMap::new(),
        }
    }

    pub fn with_property(mut self, key: &str, value: Value) -> Self {
        self.properties.insert(key.to_string(), value);
        self
    }

    pub fn set_property(&mut self, key: &str, value: Value) {
        self.properties.insert(key.to_string(), value);
    }

    pub fn get_property(&self, key: &str) -> Option<&Value> {
        self.properties.get(key)
    }

    pub fn properties(&self) -> &HashMap<String, Value> {
        &self.properties
    }

    // CSV
    pub fn set_headers(&mut self, headers: &[String]) {
        self.set_property("headers", Value::from(headers.to_vec()));
    }

    pub fn headers(&self) -> Option<Vec<String>> {
        self.get_property("headers")
            .and_then(|v| serde_json::from_value(v.clone()).ok())
    }

    pub fn set_row_count(&mut self, count: usize) {
        self.set_property("row_count", Value::from(count));
    }

    pub fn set_rows(&mut self, key: &str, rows: &[CsvRow]) {
        let rows = serde_json::to_value(rows).unwrap_or(Value::Array(Vec::new()));
        self.set_property(key, rows);
    }

    /// All parsed CSV rows, when the extractor recorded them.
    pub fn rows(&self) -> Option<Vec<CsvRow>> {
        self.get_property("rows")
            .and_then(|v| serde_json::from_value(v.clone()).ok())
    }

    // Text and image
    pub fn set_word_count(&mut self, count: usize) {
        self.set_property("word_count", Value::from(count));
    }

    pub fn set_char_count(&mut self, count: usize) {
        self.set_property("char_count", Value::from(count));
    }
}

impl Default for FileMetadata {
    fn default() -> Self {
        Self::new()
    }
}

impl From<FileMetadata> for Value {
    fn from(metadata: FileMetadata) -> Self {
        Value::Object(metadata.properties.into_iter().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_csv_helpers() {
        let mut metadata = FileMetadata::new();
        metadata.set_headers(&["revenue".to_string(), "users".to_string()]);
        metadata.set_row_count(3);

        let row: CsvRow = [("revenue".to_string(), "100".to_string())]
            .into_iter()
            .collect();
        metadata.set_rows("rows", std::slice::from_ref(&row));

        assert_eq!(metadata.headers().unwrap(), vec!["revenue", "users"]);
        assert_eq!(metadata.get_property("row_count"), Some(&Value::from(3)));
        assert_eq!(metadata.rows().unwrap(), vec![row]);
    }

    #[test]
    fn test_rows_absent_for_non_csv_metadata() {
        let metadata = FileMetadata::new().with_property("word_count", Value::from(12));
        assert!(metadata.rows().is_none());
        assert_eq!(metadata.get_property("word_count"), Some(&Value::from(12)));
    }

    #[test]
    fn test_into_json_object() {
        let mut metadata = FileMetadata::new();
        metadata.set_row_count(2);

        let json: Value = metadata.into();
        assert_eq!(json["row_count"], 2);
    }
}
