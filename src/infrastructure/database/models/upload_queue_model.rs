use diesel::prelude::*;
use uuid::Uuid;

use crate::domain::entities::IngestionQueueRecord;
use crate::infrastructure::database::schema::uploads_queue;

#[derive(Debug, Insertable)]
#[diesel(table_name = uploads_queue)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct NewUploadQueueModel {
    pub id: Uuid,
    pub file_url: String,
    pub input_type: String,
    pub company_id: Option<Uuid>,
    pub status: String,
    pub parsed_json: serde_json::Value,
    pub raw_text: String,
}

impl From<&IngestionQueueRecord> for NewUploadQueueModel {
    fn from(record: &IngestionQueueRecord) -> Self {
        Self {
            id: Uuid::new_v4(),
            file_url: record.file_url.clone(),
            input_type: record.input_type.clone(),
            company_id: record.company_id,
            status: record.status.clone(),
            parsed_json: record.parsed_json.clone(),
            raw_text: record.raw_text.clone(),
        }
    }
}
