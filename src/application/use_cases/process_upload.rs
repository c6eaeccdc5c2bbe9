use serde::Serialize;
use serde_json::Value;
use std::sync::Arc;
use thiserror::Error;
use tracing::{Instrument, error, info, info_span, warn};
use uuid::Uuid;

use crate::application::ports::blob_storage::BlobStorage;
use crate::application::ports::content_extractor::{ContentExtractor, ExtractedContent};
use crate::application::ports::feature_gate::{FEATURE_UPLOADS, FeatureGate};
use crate::application::services::{AnalysisRequester, PersistenceGateway, build_fallback_analysis};
use crate::domain::entities::ingestion_record::build_parsed_json;
use crate::domain::entities::{IngestionQueueRecord, RawFile, StartupAnalysis};
use crate::domain::repositories::UploadQueueRepository;
use crate::domain::value_objects::content_kind::is_allowed_upload;
use crate::domain::value_objects::{ContentKind, FileHash, PersistenceResult, UploadStatus};

const GENERIC_FAILURE: &str = "An unexpected error occurred while processing your file.";
const NOTICE_MAX_ERRORS: usize = 3;

/// Why a run stopped before reaching `success`.
#[derive(Debug, Error)]
pub enum PipelineFailure {
    #[error(
        "Unsupported file type: {file_name}. Supported formats: .txt, .csv, .jpg, .jpeg, .png, .gif, .bmp, .webp"
    )]
    UnsupportedFile { file_name: String },
    #[error(
        "Upload limit reached: you have used {current_usage} of {limit_value} uploads on your current plan."
    )]
    LimitReached {
        current_usage: i64,
        limit_value: i64,
    },
    #[error("Could not verify your upload allowance: {0}")]
    GateUnavailable(String),
    #[error("Error processing file: {0}")]
    Extraction(String),
    #[error("Storage bucket is missing: {0}")]
    BucketMissing(String),
    #[error("Storage upload failed: {0}")]
    Storage(String),
    #[error("Failed to record upload: {0}")]
    QueueInsert(String),
}

impl PipelineFailure {
    /// Validation failures happen before any external work is done.
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            PipelineFailure::UnsupportedFile { .. } | PipelineFailure::LimitReached { .. }
        )
    }

    pub fn status(&self) -> UploadStatus {
        let message = self.to_string();
        let message = if message.trim().is_empty() {
            GENERIC_FAILURE.to_string()
        } else {
            message
        };

        match self {
            PipelineFailure::BucketMissing(_) => UploadStatus::BucketError(message),
            _ => UploadStatus::Error(message),
        }
    }
}

#[derive(Debug)]
pub struct ProcessUploadRequest {
    pub file: RawFile,
    pub user_id: Option<Uuid>,
}

#[derive(Debug, Clone, Serialize)]
pub struct UploadOutcome {
    pub status: UploadStatus,
    pub transitions: Vec<UploadStatus>,
    pub file_name: String,
    pub content_kind: Option<ContentKind>,
    pub analysis: Option<StartupAnalysis>,
    pub used_fallback: bool,
    pub ai_notice: Option<String>,
    pub persistence: Option<PersistenceResult>,
    pub persistence_notice: Option<String>,
    pub file_url: Option<String>,
    pub queue_record_id: Option<Uuid>,
    pub remediation: Option<String>,
    #[serde(skip)]
    pub failure: Option<Arc<PipelineFailure>>,
}

impl UploadOutcome {
    fn new(file_name: &str) -> Self {
        Self {
            status: UploadStatus::Idle,
            transitions: vec![UploadStatus::Idle],
            file_name: file_name.to_string(),
            content_kind: None,
            analysis: None,
            used_fallback: false,
            ai_notice: None,
            persistence: None,
            persistence_notice: None,
            file_url: None,
            queue_record_id: None,
            remediation: None,
            failure: None,
        }
    }

    fn advance(&mut self, next: UploadStatus) {
        if !self.status.can_transition_to(&next) {
            warn!(from = %self.status, to = %next, "unexpected upload status transition");
        }
        info!(from = %self.status, to = %next, "upload status changed");
        self.status = next.clone();
        self.transitions.push(next);
    }
}

struct AnalyzedUpload {
    analysis: StartupAnalysis,
    used_fallback: bool,
    ai_error: Option<String>,
}

struct UploadedObject {
    object_name: String,
    public_url: String,
}

pub struct ProcessUploadUseCase {
    content_extractor: Arc<dyn ContentExtractor>,
    analysis_requester: Arc<AnalysisRequester>,
    persistence_gateway: Arc<PersistenceGateway>,
    blob_storage: Arc<dyn BlobStorage>,
    upload_queue: Arc<dyn UploadQueueRepository>,
    feature_gate: Arc<dyn FeatureGate>,
    bucket: String,
}

impl ProcessUploadUseCase {
    pub fn new(
        content_extractor: Arc<dyn ContentExtractor>,
        analysis_requester: Arc<AnalysisRequester>,
        persistence_gateway: Arc<PersistenceGateway>,
        blob_storage: Arc<dyn BlobStorage>,
        upload_queue: Arc<dyn UploadQueueRepository>,
        feature_gate: Arc<dyn FeatureGate>,
        bucket: String,
    ) -> Self {
        Self {
            content_extractor,
            analysis_requester,
            persistence_gateway,
            blob_storage,
            upload_queue,
            feature_gate,
            bucket,
        }
    }

    /// Runs one upload to a terminal status. Failures are reported through
    /// the outcome, never as an `Err`.
    pub async fn execute(&self, request: ProcessUploadRequest) -> UploadOutcome {
        let span = info_span!(
            "process_upload",
            file_name = %request.file.file_name(),
            user_id = ?request.user_id
        );

        async move {
            let mut outcome = UploadOutcome::new(request.file.file_name());

            match self.run(&request, &mut outcome).await {
                Ok(()) => {
                    outcome.advance(UploadStatus::Success);
                    info!(file_url = ?outcome.file_url, "upload processed");
                }
                Err(failure) => {
                    if failure.is_validation() {
                        warn!(error = %failure, "upload rejected");
                    } else {
                        error!(error = %failure, "upload failed");
                    }
                    if let PipelineFailure::BucketMissing(_) = failure {
                        outcome.remediation = Some(self.bucket_remediation());
                    }
                    outcome.advance(failure.status());
                    outcome.failure = Some(Arc::new(failure));
                }
            }

            outcome
        }
        .instrument(span)
        .await
    }

    async fn run(
        &self,
        request: &ProcessUploadRequest,
        outcome: &mut UploadOutcome,
    ) -> Result<(), PipelineFailure> {
        self.admit(request).await?;
        outcome.advance(UploadStatus::Processing);

        let extracted = self.extract(&request.file).await?;
        outcome.content_kind = Some(extracted.kind);
        outcome.advance(UploadStatus::Analyzing);

        let analyzed = self.analyze(&extracted).await;
        outcome.used_fallback = analyzed.used_fallback;
        outcome.ai_notice = analyzed.used_fallback.then(|| ai_notice(analyzed.ai_error.as_deref()));
        outcome.analysis = Some(analyzed.analysis.clone());
        outcome.advance(UploadStatus::Saving);

        let persistence = self.persist(&analyzed.analysis, request.user_id).await;
        outcome.persistence_notice = persistence_notice(&persistence);
        outcome.persistence = Some(persistence.clone());
        outcome.advance(UploadStatus::Uploading);

        let uploaded = self.upload(&request.file).await?;
        outcome.file_url = Some(uploaded.public_url.clone());

        let record_id = self
            .record(&request.file, &extracted, &analyzed, &persistence, &uploaded)
            .await?;
        outcome.queue_record_id = Some(record_id);

        self.track_usage(request.user_id).await;
        Ok(())
    }

    async fn admit(&self, request: &ProcessUploadRequest) -> Result<(), PipelineFailure> {
        let file = &request.file;
        if !is_allowed_upload(file.file_name(), file.content_type()) {
            return Err(PipelineFailure::UnsupportedFile {
                file_name: file.file_name().to_string(),
            });
        }

        let Some(user_id) = request.user_id else {
            return Ok(());
        };

        let check = self
            .feature_gate
            .check_limit(user_id, FEATURE_UPLOADS)
            .await
            .map_err(|e| PipelineFailure::GateUnavailable(e.to_string()))?;

        if check.is_blocked() {
            return Err(PipelineFailure::LimitReached {
                current_usage: check.current_usage,
                limit_value: check.limit_value,
            });
        }

        Ok(())
    }

    async fn extract(&self, file: &RawFile) -> Result<ExtractedContent, PipelineFailure> {
        self.content_extractor
            .extract(file)
            .await
            .map_err(|e| PipelineFailure::Extraction(e.to_string()))
    }

    /// AI analysis with the deterministic builder as the fallback. Never fails.
    async fn analyze(&self, extracted: &ExtractedContent) -> AnalyzedUpload {
        let ai_error = match self.analysis_requester.analyze(extracted).await {
            Ok(analysis) if !analysis.is_empty() => {
                return AnalyzedUpload {
                    analysis,
                    used_fallback: false,
                    ai_error: None,
                };
            }
            Ok(_) => "AI returned no structured data".to_string(),
            Err(e) => e.to_string(),
        };

        warn!(error = %ai_error, "falling back to basic analysis");
        AnalyzedUpload {
            analysis: build_fallback_analysis(extracted),
            used_fallback: true,
            ai_error: Some(ai_error),
        }
    }

    async fn persist(
        &self,
        analysis: &StartupAnalysis,
        user_id: Option<Uuid>,
    ) -> PersistenceResult {
        let result = self.persistence_gateway.persist(analysis, user_id).await;
        if !result.errors.is_empty() {
            warn!(errors = ?result.errors, "some startup records were not saved");
        }
        result
    }

    async fn upload(&self, file: &RawFile) -> Result<UploadedObject, PipelineFailure> {
        let object_name = match file.extension() {
            Some(ext) => format!("{}.{}", Uuid::new_v4(), ext),
            None => Uuid::new_v4().to_string(),
        };

        self.blob_storage
            .upload(&self.bucket, &object_name, file.data(), file.content_type())
            .await
            .map_err(|e| {
                if e.is_missing_bucket() {
                    PipelineFailure::BucketMissing(e.to_string())
                } else {
                    PipelineFailure::Storage(e.to_string())
                }
            })?;

        let public_url = self.blob_storage.public_url(&self.bucket, &object_name);
        Ok(UploadedObject {
            object_name,
            public_url,
        })
    }

    async fn record(
        &self,
        file: &RawFile,
        extracted: &ExtractedContent,
        analyzed: &AnalyzedUpload,
        persistence: &PersistenceResult,
        uploaded: &UploadedObject,
    ) -> Result<Uuid, PipelineFailure> {
        let mut parsed_json = build_parsed_json(
            &extracted.metadata,
            &analyzed.analysis,
            persistence,
            analyzed.ai_error.as_deref(),
        );
        if let Value::Object(map) = &mut parsed_json {
            map.insert("fileName".to_string(), Value::from(file.file_name()));
            map.insert(
                "fileHash".to_string(),
                Value::from(FileHash::from_bytes(file.data()).as_str()),
            );
            map.insert(
                "storagePath".to_string(),
                Value::from(format!("{}/{}", self.bucket, uploaded.object_name)),
            );
            if let Some(last_modified) = file.last_modified() {
                map.insert(
                    "lastModified".to_string(),
                    Value::from(last_modified.to_rfc3339()),
                );
            }
        }

        let record = IngestionQueueRecord::new(
            uploaded.public_url.clone(),
            extracted.kind.as_str(),
            persistence.company_id,
            parsed_json,
            extracted.content.clone(),
        );

        self.upload_queue
            .insert(&record)
            .await
            .map_err(|e| PipelineFailure::QueueInsert(e.to_string()))
    }

    async fn track_usage(&self, user_id: Option<Uuid>) {
        let Some(user_id) = user_id else {
            return;
        };

        if let Err(e) = self
            .feature_gate
            .track_usage(user_id, FEATURE_UPLOADS, 1)
            .await
        {
            warn!(%user_id, error = %e, "failed to track upload usage");
        }
    }

    fn bucket_remediation(&self) -> String {
        format!(
            "The storage bucket \"{}\" does not exist. Create a public bucket named \"{}\" in your storage provider (or set STORAGE_BUCKET to an existing one), then retry the upload.",
            self.bucket, self.bucket
        )
    }
}

/// User-facing summary of failed inserts, listing the first few errors.
fn persistence_notice(result: &PersistenceResult) -> Option<String> {
    if result.errors.is_empty() {
        return None;
    }

    let mut listed = result
        .errors
        .iter()
        .take(NOTICE_MAX_ERRORS)
        .cloned()
        .collect::<Vec<_>>()
        .join("; ");
    let remaining = result.errors.len().saturating_sub(NOTICE_MAX_ERRORS);
    if remaining > 0 {
        listed.push_str(&format!(" (and {} more)", remaining));
    }

    let lead = if result.is_partial() {
        "Some startup data was saved, but part of it failed"
    } else {
        "Startup data could not be saved"
    };
    Some(format!("{}: {}", lead, listed))
}

fn ai_notice(ai_error: Option<&str>) -> String {
    match ai_error {
        Some(reason) => format!(
            "AI analysis unavailable ({}). A basic analysis was generated from the file contents.",
            reason
        ),
        None => "AI analysis unavailable. A basic analysis was generated from the file contents."
            .to_string(),
    }
}
