use async_trait::async_trait;
use std::sync::Arc;

use super::{CsvExtractor, ImageExtractor, TextExtractor};
use crate::application::ports::content_extractor::{
    ContentExtractor, ExtractedContent, ExtractionError,
};
use crate::application::ports::ocr_engine::OcrEngine;
use crate::domain::entities::RawFile;
use crate::domain::value_objects::ContentKind;

/// Dispatches an upload to the strategy for its detected kind.
pub struct CompositeContentExtractor {
    csv_extractor: Arc<CsvExtractor>,
    image_extractor: Arc<ImageExtractor>,
    text_extractor: Arc<TextExtractor>,
}

impl CompositeContentExtractor {
    pub fn new(ocr: Arc<dyn OcrEngine>) -> Self {
        Self {
            csv_extractor: Arc::new(CsvExtractor::new()),
            image_extractor: Arc::new(ImageExtractor::new(ocr)),
            text_extractor: Arc::new(TextExtractor::new()),
        }
    }

    fn get_extractor_for_kind(&self, kind: ContentKind) -> Option<Arc<dyn ContentExtractor>> {
        if self.csv_extractor.can_extract(kind) {
            Some(self.csv_extractor.clone())
        } else if self.image_extractor.can_extract(kind) {
            Some(self.image_extractor.clone())
        } else if self.text_extractor.can_extract(kind) {
            Some(self.text_extractor.clone())
        } else {
            None
        }
    }
}

#[async_trait]
impl ContentExtractor for CompositeContentExtractor {
    async fn extract(&self, file: &RawFile) -> Result<ExtractedContent, ExtractionError> {
        let unsupported = || {
            ExtractionError::UnsupportedFileType(
                file.content_type()
                    .map(str::to_string)
                    .unwrap_or_else(|| file.file_name().to_string()),
            )
        };

        let kind = ContentKind::detect(file.file_name(), file.content_type()).ok_or_else(unsupported)?;
        let extractor = self.get_extractor_for_kind(kind).ok_or_else(unsupported)?;

        extractor.extract(file).await
    }

    fn can_extract(&self, kind: ContentKind) -> bool {
        self.csv_extractor.can_extract(kind)
            || self.image_extractor.can_extract(kind)
            || self.text_extractor.can_extract(kind)
    }
}
