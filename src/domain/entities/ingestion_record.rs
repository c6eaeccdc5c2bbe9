use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use uuid::Uuid;

use crate::domain::entities::StartupAnalysis;
use crate::domain::value_objects::{FileMetadata, PersistenceResult};

pub const QUEUE_STATUS_PROCESSED: &str = "processed";

/// Durable audit trail of one upload, written to `uploads_queue`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IngestionQueueRecord {
    pub file_url: String,
    pub input_type: String,
    pub company_id: Option<Uuid>,
    pub status: String,
    pub parsed_json: Value,
    pub raw_text: String,
}

impl IngestionQueueRecord {
    pub fn new(
        file_url: String,
        input_type: &str,
        company_id: Option<Uuid>,
        parsed_json: Value,
        raw_text: String,
    ) -> Self {
        Self {
            file_url,
            input_type: input_type.to_string(),
            company_id,
            status: QUEUE_STATUS_PROCESSED.to_string(),
            parsed_json,
            raw_text,
        }
    }
}

/// Builds `parsed_json`: extraction metadata with the analysis, the
/// persistence outcome and the AI error note layered on top.
pub fn build_parsed_json(
    metadata: &FileMetadata,
    analysis: &StartupAnalysis,
    db_result: &PersistenceResult,
    ai_error: Option<&str>,
) -> Value {
    let mut object: Map<String, Value> = metadata
        .properties()
        .iter()
        .map(|(k, v)| (k.clone(), v.clone()))
        .collect();

    object.insert(
        "aiAnalysis".to_string(),
        serde_json::to_value(analysis).unwrap_or(Value::Null),
    );
    object.insert(
        "dbResult".to_string(),
        serde_json::to_value(db_result).unwrap_or(Value::Null),
    );
    object.insert(
        "aiError".to_string(),
        ai_error.map_or(Value::Null, |e| Value::String(e.to_string())),
    );

    Value::Object(object)
}
