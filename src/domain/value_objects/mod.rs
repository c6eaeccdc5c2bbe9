pub mod content_kind;
pub mod file_hash;
pub mod file_metadata;
pub mod persistence_result;
pub mod upload_status;

pub use content_kind::ContentKind;
pub use file_hash::FileHash;
pub use file_metadata::{CsvRow, FileMetadata};
pub use persistence_result::PersistenceResult;
pub use upload_status::UploadStatus;
