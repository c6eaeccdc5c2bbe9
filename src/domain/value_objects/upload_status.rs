use serde::{Deserialize, Serialize};

/// Progress of a single upload through the ingestion pipeline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "state", content = "message", rename_all = "snake_case")]
pub enum UploadStatus {
    Idle,
    Processing,
    Analyzing,
    Saving,
    Uploading,
    Success,
    BucketError(String),
    Error(String),
}

impl UploadStatus {
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            UploadStatus::Success | UploadStatus::BucketError(_) | UploadStatus::Error(_)
        )
    }

    pub fn is_success(&self) -> bool {
        matches!(self, UploadStatus::Success)
    }

    pub fn can_transition_to(&self, next: &UploadStatus) -> bool {
        match (self, next) {
            (UploadStatus::Idle, UploadStatus::Processing) => true,
            (UploadStatus::Processing, UploadStatus::Analyzing) => true,
            (UploadStatus::Analyzing, UploadStatus::Saving) => true,
            (UploadStatus::Saving, UploadStatus::Uploading) => true,
            (UploadStatus::Uploading, UploadStatus::Success) => true,
            (UploadStatus::Uploading, UploadStatus::BucketError(_)) => true,
            // Any non-terminal state may fail.
            (current, UploadStatus::Error(_)) => !current.is_terminal(),
            _ => false,
        }
    }

    pub fn error_message(&self) -> Option<&str> {
        match self {
            UploadStatus::BucketError(msg) | UploadStatus::Error(msg) => Some(msg),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            UploadStatus::Idle => "idle",
            UploadStatus::Processing => "processing",
            UploadStatus::Analyzing => "analyzing",
            UploadStatus::Saving => "saving",
            UploadStatus::Uploading => "uploading",
            UploadStatus::Success => "success",
            UploadStatus::BucketError(_) => "bucket_error",
            UploadStatus::Error(_) => "error",
        }
    }
}

impl Default for UploadStatus {
    fn default() -> Self {
        UploadStatus::Idle
    }
}

impl std::fmt::Display for UploadStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
