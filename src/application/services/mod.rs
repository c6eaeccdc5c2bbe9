pub mod analysis_requester;
pub mod fallback_analysis;
pub mod persistence_gateway;

pub use analysis_requester::{AnalysisConfig, AnalysisError, AnalysisRequester};
pub use fallback_analysis::build_fallback_analysis;
pub use persistence_gateway::PersistenceGateway;
