pub mod postgres_feature_gate;
pub mod postgres_startup_repository;
pub mod postgres_upload_queue_repository;

pub use postgres_feature_gate::PostgresFeatureGate;
pub use postgres_startup_repository::PostgresStartupRepository;
pub use postgres_upload_queue_repository::PostgresUploadQueueRepository;

use crate::application::ports::feature_gate::FeatureGateError;
use crate::domain::repositories::RepositoryError;
use crate::infrastructure::database::DatabaseError;

impl From<DatabaseError> for RepositoryError {
    fn from(error: DatabaseError) -> Self {
        RepositoryError::ConnectionError(error.to_string())
    }
}

impl From<DatabaseError> for FeatureGateError {
    fn from(error: DatabaseError) -> Self {
        FeatureGateError::Unavailable(error.to_string())
    }
}
