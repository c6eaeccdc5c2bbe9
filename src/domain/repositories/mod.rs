pub mod startup_repository;
pub mod upload_queue_repository;

pub use startup_repository::{RepositoryError, StartupRepository};
pub use upload_queue_repository::UploadQueueRepository;
