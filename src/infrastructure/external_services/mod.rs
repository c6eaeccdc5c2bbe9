pub mod content_extractors;
pub mod openai_client;
pub mod supabase_storage;
pub mod tesseract_ocr;

pub use content_extractors::CompositeContentExtractor;
pub use openai_client::{OpenAiClient, OpenAiClientConfig};
pub use supabase_storage::{SupabaseStorage, SupabaseStorageConfig};
pub use tesseract_ocr::{TesseractConfig, TesseractOcr};
