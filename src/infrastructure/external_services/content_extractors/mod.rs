pub mod composite_extractor;
pub mod csv_extractor;
pub mod image_extractor;
pub mod text_extractor;

pub use composite_extractor::CompositeContentExtractor;
pub use csv_extractor::CsvExtractor;
pub use image_extractor::ImageExtractor;
pub use text_extractor::TextExtractor;
