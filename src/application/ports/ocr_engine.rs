use async_trait::async_trait;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum OcrError {
    #[error("OCR engine not available: {0}")]
    EngineNotAvailable(String),
    #[error("OCR failed: {0}")]
    RecognitionFailed(String),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

#[derive(Debug, Clone, PartialEq)]
pub struct OcrOutput {
    pub text: String,
    /// Mean word confidence, 0-100.
    pub confidence: f32,
}

#[async_trait]
pub trait OcrEngine: Send + Sync {
    async fn recognize(&self, image: &[u8], file_name: &str) -> Result<OcrOutput, OcrError>;
}
