pub mod feature_models;
pub mod startup_models;
pub mod upload_queue_model;

pub use feature_models::*;
pub use startup_models::*;
pub use upload_queue_model::*;
