pub mod process_upload;

pub use process_upload::{
    PipelineFailure, ProcessUploadRequest, ProcessUploadUseCase, UploadOutcome,
};
