pub mod ingestion_record;
pub mod raw_file;
pub mod startup_analysis;

pub use ingestion_record::IngestionQueueRecord;
pub use raw_file::RawFile;
pub use startup_analysis::{
    CompanyProfile, FinancialModel, Founder, GoToMarket, Metric, PitchDeck, StartupAnalysis,
};
