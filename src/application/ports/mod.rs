pub mod blob_storage;
pub mod completion_provider;
pub mod content_extractor;
pub mod feature_gate;
pub mod ocr_engine;

pub use blob_storage::BlobStorage;
pub use completion_provider::CompletionProvider;
pub use content_extractor::ContentExtractor;
pub use feature_gate::FeatureGate;
pub use ocr_engine::OcrEngine;
