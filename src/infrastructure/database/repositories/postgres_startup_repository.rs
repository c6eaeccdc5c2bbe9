use async_trait::async_trait;
use chrono::NaiveDate;
use diesel::prelude::*;
use uuid::Uuid;

use crate::domain::entities::{
    CompanyProfile, FinancialModel, Founder, GoToMarket, Metric, PitchDeck,
};
use crate::domain::repositories::{RepositoryError, StartupRepository};
use crate::infrastructure::database::models::{
    NewCompanyModel, NewFinancialModelModel, NewFounderModel, NewGoToMarketModel, NewMetricModel,
    NewPitchDeckModel,
};
use crate::infrastructure::database::schema::{
    companies, financial_models, founders, go_to_market, metrics, pitch_decks,
};
use crate::infrastructure::database::{DbPool, with_connection};

pub struct PostgresStartupRepository {
    pool: DbPool,
}

impl PostgresStartupRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn db_error(error: diesel::result::Error) -> RepositoryError {
    RepositoryError::DatabaseError(error.to_string())
}

#[async_trait]
impl StartupRepository for PostgresStartupRepository {
    async fn insert_company(
        &self,
        company: &CompanyProfile,
        user_id: Option<Uuid>,
    ) -> Result<Uuid, RepositoryError> {
        let model = NewCompanyModel::from_profile(company, user_id);
        let company_id = model.id;

        with_connection(&self.pool, move |conn| {
            diesel::insert_into(companies::table)
                .values(&model)
                .execute(conn)
                .map_err(db_error)
        })
        .await?;

        Ok(company_id)
    }

    async fn insert_founders(
        &self,
        company_id: Uuid,
        founders: &[Founder],
    ) -> Result<usize, RepositoryError> {
        let models: Vec<NewFounderModel> = founders
            .iter()
            .map(|f| NewFounderModel::from_founder(company_id, f))
            .collect();

        with_connection(&self.pool, move |conn| {
            diesel::insert_into(founders::table)
                .values(&models)
                .execute(conn)
                .map_err(db_error)
        })
        .await
    }

    async fn insert_pitch_deck(
        &self,
        company_id: Uuid,
        pitch_deck: &PitchDeck,
    ) -> Result<(), RepositoryError> {
        let model = NewPitchDeckModel::from_pitch_deck(company_id, pitch_deck);

        with_connection(&self.pool, move |conn| {
            diesel::insert_into(pitch_decks::table)
                .values(&model)
                .execute(conn)
                .map(|_| ())
                .map_err(db_error)
        })
        .await
    }

    async fn insert_financial_model(
        &self,
        company_id: Uuid,
        financial_model: &FinancialModel,
    ) -> Result<(), RepositoryError> {
        let model = NewFinancialModelModel::from_financial_model(company_id, financial_model);

        with_connection(&self.pool, move |conn| {
            diesel::insert_into(financial_models::table)
                .values(&model)
                .execute(conn)
                .map(|_| ())
                .map_err(db_error)
        })
        .await
    }

    async fn insert_go_to_market(
        &self,
        company_id: Uuid,
        go_to_market: &GoToMarket,
    ) -> Result<(), RepositoryError> {
        let model = NewGoToMarketModel::from_go_to_market(company_id, go_to_market);

        with_connection(&self.pool, move |conn| {
            diesel::insert_into(go_to_market::table)
                .values(&model)
                .execute(conn)
                .map(|_| ())
                .map_err(db_error)
        })
        .await
    }

    async fn insert_metrics(
        &self,
        company_id: Uuid,
        metrics: &[Metric],
        date: NaiveDate,
    ) -> Result<usize, RepositoryError> {
        let models: Vec<NewMetricModel> = metrics
            .iter()
            .map(|m| NewMetricModel::from_metric(company_id, m, date))
            .collect();

        with_connection(&self.pool, move |conn| {
            diesel::insert_into(metrics::table)
                .values(&models)
                .execute(conn)
                .map_err(db_error)
        })
        .await
    }
}
