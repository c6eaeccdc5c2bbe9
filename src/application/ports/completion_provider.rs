use async_trait::async_trait;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CompletionError {
    #[error("Network error: {0}")]
    NetworkError(String),
    #[error("API error ({status}): {message}")]
    ApiError { status: u16, message: String },
    #[error("Authentication failed: {0}")]
    AuthError(String),
    #[error("Rate limit exceeded")]
    RateLimitExceeded,
    #[error("Invalid response: {0}")]
    InvalidResponse(String),
}

#[derive(Debug, Clone)]
pub struct CompletionRequest {
    pub system_prompt: String,
    pub user_content: String,
    pub model: String,
    pub temperature: f32,
    pub max_tokens: u32,
}

/// A generative text completion service. The returned text is untrusted.
#[async_trait]
pub trait CompletionProvider: Send + Sync {
    async fn complete(&self, request: CompletionRequest) -> Result<String, CompletionError>;
}
