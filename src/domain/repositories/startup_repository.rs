use async_trait::async_trait;
use chrono::NaiveDate;
use thiserror::Error;
use uuid::Uuid;

use crate::domain::entities::{CompanyProfile, FinancialModel, Founder, GoToMarket, Metric, PitchDeck};

#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("Database error: {0}")]
    DatabaseError(String),
    #[error("Connection error: {0}")]
    ConnectionError(String),
    #[error("Validation error: {0}")]
    ValidationError(String),
}

/// Table-level inserts for the startup schema. Callers apply defaults;
/// implementations write what they are given.
#[async_trait]
pub trait StartupRepository: Send + Sync {
    /// Inserts a company row and returns its generated id.
    async fn insert_company(
        &self,
        company: &CompanyProfile,
        user_id: Option<Uuid>,
    ) -> Result<Uuid, RepositoryError>;

    async fn insert_founders(
        &self,
        company_id: Uuid,
        founders: &[Founder],
    ) -> Result<usize, RepositoryError>;

    async fn insert_pitch_deck(
        &self,
        company_id: Uuid,
        pitch_deck: &PitchDeck,
    ) -> Result<(), RepositoryError>;

    async fn insert_financial_model(
        &self,
        company_id: Uuid,
        financial_model: &FinancialModel,
    ) -> Result<(), RepositoryError>;

    async fn insert_go_to_market(
        &self,
        company_id: Uuid,
        go_to_market: &GoToMarket,
    ) -> Result<(), RepositoryError>;

    async fn insert_metrics(
        &self,
        company_id: Uuid,
        metrics: &[Metric],
        date: NaiveDate,
    ) -> Result<usize, RepositoryError>;
}
