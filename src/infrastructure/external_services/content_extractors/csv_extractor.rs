use async_trait::async_trait;
use serde_json::Value;

use crate::application::ports::content_extractor::{
    ContentExtractor, ExtractedContent, ExtractionError,
};
use crate::domain::entities::RawFile;
use crate::domain::value_objects::{ContentKind, CsvRow, FileMetadata};

const SUMMARY_ROWS: usize = 3;
const SAMPLE_ROWS: usize = 5;

/// Line-oriented CSV reader. Quoted fields containing commas are not
/// supported; short rows are padded with empty values.
pub struct CsvExtractor;

impl CsvExtractor {
    pub fn new() -> Self {
        Self
    }

    fn parse(text: &str) -> (Vec<String>, Vec<CsvRow>) {
        let mut lines = text.lines().filter(|line| !line.trim().is_empty());

        let headers: Vec<String> = match lines.next() {
            Some(line) => split_fields(line),
            None => return (Vec::new(), Vec::new()),
        };

        let rows = lines
            .map(|line| {
                let values = split_fields(line);
                headers
                    .iter()
                    .enumerate()
                    .map(|(i, header)| {
                        (header.clone(), values.get(i).cloned().unwrap_or_default())
                    })
                    .collect::<CsvRow>()
            })
            .collect();

        (headers, rows)
    }

    fn summarize(text: &str, headers: &[String], rows: &[CsvRow]) -> String {
        let mut summary = format!(
            "CSV Data Analysis:\nTotal rows: {}\nTotal columns: {}\nHeaders: {}\n\nSample data (first {} rows):\n",
            rows.len(),
            headers.len(),
            headers.join(", "),
            SUMMARY_ROWS
        );

        for (i, row) in rows.iter().take(SUMMARY_ROWS).enumerate() {
            let fields: Vec<String> = headers
                .iter()
                .map(|h| format!("{}: {}", h, row.get(h).map(String::as_str).unwrap_or("")))
                .collect();
            summary.push_str(&format!("Row {}: {}\n", i + 1, fields.join(", ")));
        }

        summary.push_str("\nRaw CSV:\n");
        summary.push_str(text);
        summary
    }
}

impl Default for CsvExtractor {
    fn default() -> Self {
        Self::new()
    }
}

fn split_fields(line: &str) -> Vec<String> {
    line.split(',')
        .map(|field| field.trim().trim_matches('"').trim().to_string())
        .collect()
}

#[async_trait]
impl ContentExtractor for CsvExtractor {
    async fn extract(&self, file: &RawFile) -> Result<ExtractedContent, ExtractionError> {
        let text = file
            .text()
            .map_err(|e| ExtractionError::ReadFailure(format!("{}: {}", file.file_name(), e)))?;

        let (headers, rows) = Self::parse(text);

        let mut metadata = FileMetadata::new();
        metadata.set_headers(&headers);
        metadata.set_row_count(rows.len());
        metadata.set_property("column_count", Value::from(headers.len()));
        metadata.set_rows("sample_rows", &rows[..rows.len().min(SAMPLE_ROWS)]);
        metadata.set_rows("rows", &rows);

        Ok(ExtractedContent {
            kind: ContentKind::Csv,
            content: Self::summarize(text, &headers, &rows),
            metadata,
        })
    }

    fn can_extract(&self, kind: ContentKind) -> bool {
        kind == ContentKind::Csv
    }
}
