use async_trait::async_trait;
use regex::Regex;
use serde_json::Value;
use std::sync::LazyLock;

use crate::application::ports::content_extractor::{
    ContentExtractor, ExtractedContent, ExtractionError,
};
use crate::domain::entities::RawFile;
use crate::domain::value_objects::{ContentKind, FileMetadata};

static PARAGRAPH_BREAK: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\n\s*\n").expect("paragraph pattern is valid"));

pub struct TextExtractor;

impl TextExtractor {
    pub fn new() -> Self {
        Self
    }
}

impl Default for TextExtractor {
    fn default() -> Self {
        Self::new()
    }
}

fn paragraph_count(text: &str) -> usize {
    PARAGRAPH_BREAK
        .split(text)
        .filter(|p| !p.trim().is_empty())
        .count()
}

#[async_trait]
impl ContentExtractor for TextExtractor {
    async fn extract(&self, file: &RawFile) -> Result<ExtractedContent, ExtractionError> {
        let text = file
            .text()
            .map_err(|e| ExtractionError::ReadFailure(format!("{}: {}", file.file_name(), e)))?;

        let line_count = text.split('\n').count();
        let word_count = text.split_whitespace().count();
        let paragraphs = paragraph_count(text);

        let content = format!(
            "Text Document Analysis:\nLines: {}\nWords: {}\nParagraphs: {}\n\nContent:\n{}",
            line_count, word_count, paragraphs, text
        );

        let mut metadata = FileMetadata::new()
            .with_property("line_count", Value::from(line_count))
            .with_property("paragraph_count", Value::from(paragraphs))
            .with_property("full_text", Value::from(text));
        metadata.set_word_count(word_count);

        Ok(ExtractedContent {
            kind: ContentKind::Txt,
            content,
            metadata,
        })
    }

    fn can_extract(&self, kind: ContentKind) -> bool {
        kind == ContentKind::Txt
    }
}
