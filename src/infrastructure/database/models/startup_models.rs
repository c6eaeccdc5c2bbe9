use chrono::NaiveDate;
use diesel::prelude::*;
use uuid::Uuid;

use crate::domain::entities::{
    CompanyProfile, FinancialModel, Founder, GoToMarket, Metric, PitchDeck,
};
use crate::infrastructure::database::schema::{
    companies, financial_models, founders, go_to_market, metrics, pitch_decks,
};

#[derive(Debug, Insertable)]
#[diesel(table_name = companies)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct NewCompanyModel {
    pub id: Uuid,
    pub user_id: Option<Uuid>,
    pub name: String,
    pub industry: Option<String>,
    pub sub_industry: Option<String>,
    pub country: Option<String>,
    pub region: Option<String>,
    pub stage: Option<String>,
    pub valuation_target: Option<f64>,
    pub funding_goal: Option<f64>,
    pub incorporation_year: Option<i32>,
    pub pitch_deck_summary: Option<String>,
}

impl NewCompanyModel {
    pub fn from_profile(profile: &CompanyProfile, user_id: Option<Uuid>) -> Self {
        Self {
            id: Uuid::new_v4(),
            user_id,
            name: profile.name.clone().unwrap_or_default(),
            industry: profile.industry.clone(),
            sub_industry: profile.sub_industry.clone(),
            country: profile.country.clone(),
            region: profile.region.clone(),
            stage: profile.stage.clone(),
            valuation_target: profile.valuation_target,
            funding_goal: profile.funding_goal,
            incorporation_year: profile.incorporation_year,
            pitch_deck_summary: profile.pitch_deck_summary.clone(),
        }
    }
}

#[derive(Debug, Insertable)]
#[diesel(table_name = founders)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct NewFounderModel {
    pub id: Uuid,
    pub company_id: Uuid,
    pub name: String,
    pub linkedin_url: Option<String>,
    pub education_history: Option<serde_json::Value>,
    pub years_domain_experience: Option<i32>,
    pub technical_skills: Vec<String>,
    pub achievements: Option<String>,
}

impl NewFounderModel {
    pub fn from_founder(company_id: Uuid, founder: &Founder) -> Self {
        Self {
            id: Uuid::new_v4(),
            company_id,
            name: founder.name.clone().unwrap_or_default(),
            linkedin_url: founder.linkedin_url.clone(),
            education_history: founder.education_history.clone(),
            years_domain_experience: founder.years_domain_experience,
            technical_skills: founder.technical_skills.clone(),
            achievements: founder.achievements.clone(),
        }
    }
}

#[derive(Debug, Insertable)]
#[diesel(table_name = pitch_decks)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct NewPitchDeckModel {
    pub id: Uuid,
    pub company_id: Uuid,
    pub core_problem: Option<String>,
    pub core_solution: Option<String>,
    pub customer_segment: Option<String>,
    pub product_summary_md: Option<String>,
}

impl NewPitchDeckModel {
    pub fn from_pitch_deck(company_id: Uuid, deck: &PitchDeck) -> Self {
        Self {
            id: Uuid::new_v4(),
            company_id,
            core_problem: deck.core_problem.clone(),
            core_solution: deck.core_solution.clone(),
            customer_segment: deck.customer_segment.clone(),
            product_summary_md: deck.product_summary_md.clone(),
        }
    }
}

#[derive(Debug, Insertable)]
#[diesel(table_name = financial_models)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct NewFinancialModelModel {
    pub id: Uuid,
    pub company_id: Uuid,
    pub monthly_revenue: Option<f64>,
    pub burn_rate: Option<f64>,
    pub ltv_cac_ratio: Option<f64>,
    pub runway_months: Option<f64>,
    pub revenue_model_notes: Option<String>,
}

impl NewFinancialModelModel {
    pub fn from_financial_model(company_id: Uuid, model: &FinancialModel) -> Self {
        Self {
            id: Uuid::new_v4(),
            company_id,
            monthly_revenue: model.monthly_revenue,
            burn_rate: model.burn_rate,
            ltv_cac_ratio: model.ltv_cac_ratio,
            runway_months: model.runway_months,
            revenue_model_notes: model.revenue_model_notes.clone(),
        }
    }
}

#[derive(Debug, Insertable)]
#[diesel(table_name = go_to_market)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct NewGoToMarketModel {
    pub id: Uuid,
    pub company_id: Uuid,
    pub channels: Vec<String>,
    pub notes_md: Option<String>,
}

impl NewGoToMarketModel {
    pub fn from_go_to_market(company_id: Uuid, gtm: &GoToMarket) -> Self {
        Self {
            id: Uuid::new_v4(),
            company_id,
            channels: gtm.channels.clone(),
            notes_md: gtm.notes_md.clone(),
        }
    }
}

#[derive(Debug, Insertable)]
#[diesel(table_name = metrics)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct NewMetricModel {
    pub id: Uuid,
    pub company_id: Uuid,
    pub name: String,
    pub value: f64,
    pub unit: Option<String>,
    pub date: NaiveDate,
}

impl NewMetricModel {
    pub fn from_metric(company_id: Uuid, metric: &Metric, date: NaiveDate) -> Self {
        Self {
            id: Uuid::new_v4(),
            company_id,
            name: metric.name.clone().unwrap_or_default(),
            value: metric.value.unwrap_or(0.0),
            unit: metric.unit.clone(),
            date,
        }
    }
}
