use axum::{
    Json,
    extract::{Multipart, State},
    http::StatusCode,
};
use chrono::{DateTime, Utc};
use std::sync::Arc;
use tracing::warn;
use uuid::Uuid;

use crate::application::use_cases::{
    PipelineFailure, ProcessUploadRequest, ProcessUploadUseCase, UploadOutcome,
};
use crate::domain::entities::RawFile;
use crate::presentation::http::dto::{ApiResponse, UploadOutcomeDto};

pub struct UploadHandler {
    process_upload_use_case: Arc<ProcessUploadUseCase>,
}

struct UploadForm {
    file: Option<RawFile>,
    user_id: Option<Uuid>,
    last_modified: Option<DateTime<Utc>>,
}

impl UploadHandler {
    pub fn new(process_upload_use_case: Arc<ProcessUploadUseCase>) -> Self {
        Self {
            process_upload_use_case,
        }
    }

    /// `POST /uploads`: multipart with a `file` part and optional `user_id`
    /// and `last_modified` (RFC 3339) text parts.
    pub async fn upload(
        State(handler): State<Arc<UploadHandler>>,
        multipart: Multipart,
    ) -> (StatusCode, Json<ApiResponse<UploadOutcomeDto>>) {
        let form = match read_form(multipart).await {
            Ok(form) => form,
            Err((code, message)) => {
                return (
                    StatusCode::BAD_REQUEST,
                    Json(ApiResponse::error(
                        code.to_string(),
                        message,
                        None,
                    )),
                );
            }
        };

        let Some(mut file) = form.file else {
            return (
                StatusCode::BAD_REQUEST,
                Json(ApiResponse::error(
                    "NO_FILE_PROVIDED".to_string(),
                    "No file provided in the request".to_string(),
                    None,
                )),
            );
        };
        if let Some(last_modified) = form.last_modified {
            file = file.with_last_modified(last_modified);
        }

        let outcome = handler
            .process_upload_use_case
            .execute(ProcessUploadRequest {
                file,
                user_id: form.user_id,
            })
            .await;

        respond(outcome)
    }
}

async fn read_form(mut multipart: Multipart) -> Result<UploadForm, (&'static str, String)> {
    let mut form = UploadForm {
        file: None,
        user_id: None,
        last_modified: None,
    };

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ("INVALID_MULTIPART", e.to_string()))?
    {
        let name = field.name().map(str::to_string);
        match name.as_deref() {
            Some("file") => {
                let file_name = field
                    .file_name()
                    .map(str::to_string)
                    .ok_or(("INVALID_MULTIPART", "file part has no file name".to_string()))?;
                let content_type = field.content_type().map(str::to_string);
                let data = field
                    .bytes()
                    .await
                    .map_err(|e| ("INVALID_MULTIPART", e.to_string()))?
                    .to_vec();

                form.file = Some(RawFile::new(file_name, content_type, data));
            }
            Some("user_id") => {
                let text = field
                    .text()
                    .await
                    .map_err(|e| ("INVALID_MULTIPART", e.to_string()))?;
                let text = text.trim();
                if !text.is_empty() {
                    let user_id = Uuid::parse_str(text)
                        .map_err(|e| ("INVALID_USER_ID", format!("Invalid user id: {}", e)))?;
                    form.user_id = Some(user_id);
                }
            }
            Some("last_modified") => {
                let text = field
                    .text()
                    .await
                    .map_err(|e| ("INVALID_MULTIPART", e.to_string()))?;
                match DateTime::parse_from_rfc3339(text.trim()) {
                    Ok(ts) => form.last_modified = Some(ts.with_timezone(&Utc)),
                    Err(e) => warn!(error = %e, "ignoring unparseable last_modified"),
                }
            }
            _ => {}
        }
    }

    Ok(form)
}

fn respond(outcome: UploadOutcome) -> (StatusCode, Json<ApiResponse<UploadOutcomeDto>>) {
    if outcome.status.is_success() {
        return (
            StatusCode::CREATED,
            Json(ApiResponse::success(UploadOutcomeDto::from(outcome))),
        );
    }

    let (status, code) = match outcome.failure.as_deref() {
        Some(PipelineFailure::UnsupportedFile { .. }) => {
            (StatusCode::UNPROCESSABLE_ENTITY, "UNSUPPORTED_FILE_TYPE")
        }
        Some(PipelineFailure::LimitReached { .. }) => {
            (StatusCode::UNPROCESSABLE_ENTITY, "UPLOAD_LIMIT_REACHED")
        }
        Some(PipelineFailure::Extraction(_)) => {
            (StatusCode::UNPROCESSABLE_ENTITY, "EXTRACTION_FAILED")
        }
        Some(PipelineFailure::BucketMissing(_)) => {
            (StatusCode::SERVICE_UNAVAILABLE, "BUCKET_NOT_FOUND")
        }
        Some(PipelineFailure::GateUnavailable(_)) => {
            (StatusCode::INTERNAL_SERVER_ERROR, "FEATURE_GATE_UNAVAILABLE")
        }
        Some(PipelineFailure::Storage(_)) => (StatusCode::INTERNAL_SERVER_ERROR, "STORAGE_FAILED"),
        Some(PipelineFailure::QueueInsert(_)) => {
            (StatusCode::INTERNAL_SERVER_ERROR, "QUEUE_INSERT_FAILED")
        }
        None => (StatusCode::INTERNAL_SERVER_ERROR, "UPLOAD_FAILED"),
    };

    let message = outcome
        .status
        .error_message()
        .unwrap_or_default()
        .to_string();
    let details = outcome.remediation.clone();

    (
        status,
        Json(ApiResponse::failure(
            UploadOutcomeDto::from(outcome),
            code.to_string(),
            message,
            details,
        )),
    )
}
