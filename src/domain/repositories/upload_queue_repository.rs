use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::entities::IngestionQueueRecord;
use crate::domain::repositories::RepositoryError;

#[async_trait]
pub trait UploadQueueRepository: Send + Sync {
    async fn insert(&self, record: &IngestionQueueRecord) -> Result<Uuid, RepositoryError>;
}
