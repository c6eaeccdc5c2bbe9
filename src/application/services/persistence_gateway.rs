use chrono::{NaiveDate, Utc};
use std::sync::Arc;
use tracing::{info, warn};
use uuid::Uuid;

use crate::application::services::fallback_analysis::FALLBACK_COMPANY_NAME;
use crate::domain::entities::{CompanyProfile, Founder, Metric, StartupAnalysis};
use crate::domain::repositories::StartupRepository;
use crate::domain::value_objects::PersistenceResult;

pub const UNNAMED_COMPANY: &str = "Unnamed Startup";
pub const UNKNOWN_FOUNDER: &str = "Unknown Founder";
pub const UNKNOWN_METRIC: &str = "Unknown Metric";

/// Maps an analysis onto the startup tables. Every insert is attempted on
/// its own; failures are collected, never propagated.
pub struct PersistenceGateway {
    repository: Arc<dyn StartupRepository>,
}

impl PersistenceGateway {
    pub fn new(repository: Arc<dyn StartupRepository>) -> Self {
        Self { repository }
    }

    pub async fn persist(
        &self,
        analysis: &StartupAnalysis,
        user_id: Option<Uuid>,
    ) -> PersistenceResult {
        self.persist_on(analysis, user_id, Utc::now().date_naive())
            .await
    }

    pub async fn persist_on(
        &self,
        analysis: &StartupAnalysis,
        user_id: Option<Uuid>,
        today: NaiveDate,
    ) -> PersistenceResult {
        let mut result = PersistenceResult::new();

        let company_id = self.save_company(analysis, user_id, &mut result).await;
        result.company_id = company_id;

        let Some(company_id) = company_id else {
            if analysis.has_dependent_records() {
                warn!("no company row available, skipping dependent inserts");
            }
            return result;
        };

        if !analysis.founders.is_empty() {
            let founders: Vec<Founder> = analysis.founders.iter().map(with_founder_defaults).collect();
            match self.repository.insert_founders(company_id, &founders).await {
                Ok(_) => result.record_insert("founders"),
                Err(e) => self.fail(&mut result, "Founders", company_id, e),
            }
        }

        if let Some(pitch_deck) = analysis.pitch_deck.as_ref().filter(|p| p.has_any_field()) {
            match self.repository.insert_pitch_deck(company_id, pitch_deck).await {
                Ok(()) => result.record_insert("pitch_decks"),
                Err(e) => self.fail(&mut result, "Pitch deck", company_id, e),
            }
        }

        if let Some(model) = analysis
            .financial_model
            .as_ref()
            .filter(|m| m.has_any_field())
        {
            match self.repository.insert_financial_model(company_id, model).await {
                Ok(()) => result.record_insert("financial_models"),
                Err(e) => self.fail(&mut result, "Financial model", company_id, e),
            }
        }

        if let Some(gtm) = analysis.go_to_market.as_ref().filter(|g| g.has_any_field()) {
            match self.repository.insert_go_to_market(company_id, gtm).await {
                Ok(()) => result.record_insert("go_to_market"),
                Err(e) => self.fail(&mut result, "Go-to-market", company_id, e),
            }
        }

        if !analysis.metrics.is_empty() {
            let metrics: Vec<Metric> = analysis.metrics.iter().map(with_metric_defaults).collect();
            match self
                .repository
                .insert_metrics(company_id, &metrics, today)
                .await
            {
                Ok(_) => result.record_insert("metrics"),
                Err(e) => self.fail(&mut result, "Metrics", company_id, e),
            }
        }

        info!(
            %company_id,
            inserted = ?result.inserted_tables,
            failed = result.errors.len(),
            "persisted startup analysis"
        );

        result
    }

    /// Inserts the company row, or a generic anchor row when only child
    /// records were extracted.
    async fn save_company(
        &self,
        analysis: &StartupAnalysis,
        user_id: Option<Uuid>,
        result: &mut PersistenceResult,
    ) -> Option<Uuid> {
        let company = match analysis.company.as_ref().filter(|c| c.has_any_field()) {
            Some(company) => {
                let mut company = company.clone();
                if company.name.as_deref().is_none_or(|n| n.trim().is_empty()) {
                    company.name = Some(UNNAMED_COMPANY.to_string());
                }
                company
            }
            None if analysis.has_dependent_records() => CompanyProfile {
                name: Some(FALLBACK_COMPANY_NAME.to_string()),
                ..Default::default()
            },
            None => return None,
        };

        match self.repository.insert_company(&company, user_id).await {
            Ok(id) => {
                result.record_insert("companies");
                Some(id)
            }
            Err(e) => {
                warn!(user_id = ?user_id, error = %e, "company insert failed");
                result.record_error(format!("Company: {}", e));
                None
            }
        }
    }

    fn fail(
        &self,
        result: &mut PersistenceResult,
        label: &str,
        company_id: Uuid,
        error: impl std::fmt::Display,
    ) {
        warn!(%company_id, table = label, error = %error, "insert failed");
        result.record_error(format!("{}: {}", label, error));
    }
}

fn with_founder_defaults(founder: &Founder) -> Founder {
    let mut founder = founder.clone();
    if founder.name.as_deref().is_none_or(|n| n.trim().is_empty()) {
        founder.name = Some(UNKNOWN_FOUNDER.to_string());
    }
    founder
}

fn with_metric_defaults(metric: &Metric) -> Metric {
    Metric {
        name: Some(
            metric
                .name
                .clone()
                .filter(|n| !n.trim().is_empty())
                .unwrap_or_else(|| UNKNOWN_METRIC.to_string()),
        ),
        value: Some(metric.value.unwrap_or(0.0)),
        unit: metric.unit.clone(),
    }
}
