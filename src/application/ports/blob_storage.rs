use async_trait::async_trait;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum BlobStorageError {
    #[error("Bucket not found: {0}")]
    BucketNotFound(String),
    #[error("Upload failed: {0}")]
    UploadFailed(String),
    #[error("Permission denied: {0}")]
    PermissionDenied(String),
    #[error("IO error: {0}")]
    IoError(String),
    #[error("Storage service unreachable: {0}")]
    Transport(String),
}

impl BlobStorageError {
    /// Whether the failure means the target bucket does not exist. Adapters
    /// that can tell return `BucketNotFound`. Only `UploadFailed`, which
    /// carries a provider response, falls back to matching the message.
    pub fn is_missing_bucket(&self) -> bool {
        match self {
            BlobStorageError::BucketNotFound(_) => true,
            BlobStorageError::UploadFailed(message) => looks_like_missing_bucket(message),
            BlobStorageError::PermissionDenied(_)
            | BlobStorageError::IoError(_)
            | BlobStorageError::Transport(_) => false,
        }
    }
}

/// Message heuristic for storage providers that do not type their errors.
pub fn looks_like_missing_bucket(message: &str) -> bool {
    let message = message.to_lowercase();
    message.contains("bucket") || message.contains("not found") || message.contains("404")
}

#[derive(Debug, Clone, PartialEq)]
pub struct StoredObject {
    pub bucket: String,
    pub path: String,
    pub size: u64,
}

#[async_trait]
pub trait BlobStorage: Send + Sync {
    async fn upload(
        &self,
        bucket: &str,
        object_name: &str,
        data: &[u8],
        content_type: Option<&str>,
    ) -> Result<StoredObject, BlobStorageError>;

    fn public_url(&self, bucket: &str, object_name: &str) -> String;
}
