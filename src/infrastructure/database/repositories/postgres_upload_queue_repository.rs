use async_trait::async_trait;
use diesel::prelude::*;
use uuid::Uuid;

use crate::domain::entities::IngestionQueueRecord;
use crate::domain::repositories::{RepositoryError, UploadQueueRepository};
use crate::infrastructure::database::models::NewUploadQueueModel;
use crate::infrastructure::database::schema::uploads_queue;
use crate::infrastructure::database::{DbPool, with_connection};

pub struct PostgresUploadQueueRepository {
    pool: DbPool,
}

impl PostgresUploadQueueRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UploadQueueRepository for PostgresUploadQueueRepository {
    async fn insert(&self, record: &IngestionQueueRecord) -> Result<Uuid, RepositoryError> {
        let model = NewUploadQueueModel::from(record);
        let record_id = model.id;

        with_connection(&self.pool, move |conn| {
            diesel::insert_into(uploads_queue::table)
                .values(&model)
                .execute(conn)
                .map_err(|e| RepositoryError::DatabaseError(e.to_string()))
        })
        .await?;

        Ok(record_id)
    }
}
