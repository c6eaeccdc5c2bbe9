use serde::Serialize;
use uuid::Uuid;

use crate::application::use_cases::UploadOutcome;
use crate::domain::entities::StartupAnalysis;
use crate::domain::value_objects::PersistenceResult;

#[derive(Debug, Serialize)]
pub struct UploadOutcomeDto {
    pub status: String,
    pub message: Option<String>,
    pub transitions: Vec<String>,
    pub file_name: String,
    pub content_kind: Option<String>,
    pub used_fallback: bool,
    pub ai_notice: Option<String>,
    pub analysis: Option<StartupAnalysis>,
    pub persistence: Option<PersistenceResult>,
    pub persistence_notice: Option<String>,
    pub file_url: Option<String>,
    pub queue_record_id: Option<Uuid>,
    pub remediation: Option<String>,
}

impl From<UploadOutcome> for UploadOutcomeDto {
    fn from(outcome: UploadOutcome) -> Self {
        Self {
            status: outcome.status.as_str().to_string(),
            message: outcome.status.error_message().map(str::to_string),
            transitions: outcome
                .transitions
                .iter()
                .map(|s| s.as_str().to_string())
                .collect(),
            file_name: outcome.file_name,
            content_kind: outcome.content_kind.map(|k| k.as_str().to_string()),
            used_fallback: outcome.used_fallback,
            ai_notice: outcome.ai_notice,
            analysis: outcome.analysis,
            persistence: outcome.persistence,
            persistence_notice: outcome.persistence_notice,
            file_url: outcome.file_url,
            queue_record_id: outcome.queue_record_id,
            remediation: outcome.remediation,
        }
    }
}
