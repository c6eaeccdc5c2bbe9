use async_trait::async_trait;
use serde_json::Value;
use std::sync::Arc;
use tracing::{debug, warn};

use crate::application::ports::content_extractor::{
    ContentExtractor, ExtractedContent, ExtractionError,
};
use crate::application::ports::ocr_engine::OcrEngine;
use crate::domain::entities::RawFile;
use crate::domain::value_objects::{ContentKind, FileMetadata};

pub const NO_TEXT_PLACEHOLDER: &str = "[No text detected in image]";

pub struct ImageExtractor {
    ocr: Arc<dyn OcrEngine>,
}

impl ImageExtractor {
    pub fn new(ocr: Arc<dyn OcrEngine>) -> Self {
        Self { ocr }
    }
}

#[async_trait]
impl ContentExtractor for ImageExtractor {
    async fn extract(&self, file: &RawFile) -> Result<ExtractedContent, ExtractionError> {
        let output = self
            .ocr
            .recognize(file.data(), file.file_name())
            .await
            .map_err(|e| {
                warn!(file_name = %file.file_name(), error = %e, "OCR failed");
                ExtractionError::OcrFailure(e.to_string())
            })?;

        let text = output.text.trim();
        let word_count = text.split_whitespace().count();
        let char_count = text.chars().count();

        debug!(
            file_name = %file.file_name(),
            confidence = output.confidence,
            word_count,
            "OCR complete"
        );

        let content = format!(
            "Image OCR Analysis:\nConfidence: {:.1}%\nWords detected: {}\nCharacters: {}\n\nExtracted text:\n{}",
            output.confidence,
            word_count,
            char_count,
            if text.is_empty() { NO_TEXT_PLACEHOLDER } else { text }
        );

        let mut metadata = FileMetadata::new()
            .with_property("size", Value::from(file.size()))
            .with_property("confidence", Value::from(output.confidence))
            .with_property("ocr_text", Value::from(text));
        metadata.set_word_count(word_count);
        metadata.set_char_count(char_count);

        Ok(ExtractedContent {
            kind: ContentKind::Image,
            content,
            metadata,
        })
    }

    fn can_extract(&self, kind: ContentKind) -> bool {
        kind == ContentKind::Image
    }
}
