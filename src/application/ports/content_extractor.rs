use async_trait::async_trait;
use thiserror::Error;

use crate::domain::entities::RawFile;
use crate::domain::value_objects::{ContentKind, FileMetadata};

#[derive(Debug, Error)]
pub enum ExtractionError {
    #[error("Unsupported file type: {0}")]
    UnsupportedFileType(String),
    #[error("Failed to read file: {0}")]
    ReadFailure(String),
    #[error("OCR failed: {0}")]
    OcrFailure(String),
}

/// Normalized text rendering of an upload plus type-specific metadata.
#[derive(Debug, Clone, PartialEq)]
pub struct ExtractedContent {
    pub kind: ContentKind,
    pub content: String,
    pub metadata: FileMetadata,
}

impl ExtractedContent {
    pub fn word_count(&self) -> usize {
        self.content.split_whitespace().count()
    }
}

#[async_trait]
pub trait ContentExtractor: Send + Sync {
    async fn extract(&self, file: &RawFile) -> Result<ExtractedContent, ExtractionError>;

    fn can_extract(&self, kind: ContentKind) -> bool;
}
