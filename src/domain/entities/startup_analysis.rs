use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// Structured analysis of one upload. Every field is optional: the AI output
/// is partial by nature, and the fallback builder only fills a few fields.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StartupAnalysis {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub company: Option<CompanyProfile>,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub founders: Vec<Founder>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pitch_deck: Option<PitchDeck>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub financial_model: Option<FinancialModel>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub go_to_market: Option<GoToMarket>,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub metrics: Vec<Metric>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vc_fit_report: Option<Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CompanyProfile {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub industry: Option<String>,
    #[serde(default)]
    pub sub_industry: Option<String>,
    #[serde(default)]
    pub country: Option<String>,
    #[serde(default)]
    pub region: Option<String>,
    #[serde(default)]
    pub stage: Option<String>,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub valuation_target: Option<f64>,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub funding_goal: Option<f64>,
    #[serde(default, deserialize_with = "lenient_i32")]
    pub incorporation_year: Option<i32>,
    #[serde(default)]
    pub pitch_deck_summary: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Founder {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub linkedin_url: Option<String>,
    #[serde(default)]
    pub education_history: Option<Value>,
    #[serde(default, deserialize_with = "lenient_i32")]
    pub years_domain_experience: Option<i32>,
    #[serde(default, deserialize_with = "lenient_string_list")]
    pub technical_skills: Vec<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub achievements: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PitchDeck {
    #[serde(default)]
    pub core_problem: Option<String>,
    #[serde(default)]
    pub core_solution: Option<String>,
    #[serde(default)]
    pub customer_segment: Option<String>,
    #[serde(default)]
    pub product_summary_md: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FinancialModel {
    #[serde(default, deserialize_with = "lenient_f64")]
    pub monthly_revenue: Option<f64>,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub burn_rate: Option<f64>,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub ltv_cac_ratio: Option<f64>,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub runway_months: Option<f64>,
    #[serde(default)]
    pub revenue_model_notes: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GoToMarket {
    #[serde(default, deserialize_with = "lenient_string_list")]
    pub channels: Vec<String>,
    #[serde(default)]
    pub notes_md: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Metric {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub value: Option<f64>,
    #[serde(default)]
    pub unit: Option<String>,
}

fn has_text(value: &Option<String>) -> bool {
    value.as_deref().is_some_and(|s| !s.trim().is_empty())
}

impl StartupAnalysis {
    /// True when nothing worth persisting was extracted. An empty analysis
    /// must be replaced by the fallback before it reaches the database.
    pub fn is_empty(&self) -> bool {
        let company_named = self
            .company
            .as_ref()
            .is_some_and(|c| has_text(&c.name) || has_text(&c.pitch_deck_summary));

        let vc_fit = self.vc_fit_report.as_ref().is_some_and(|report| match report {
            Value::Null => false,
            Value::Object(map) => !map.is_empty(),
            Value::Array(items) => !items.is_empty(),
            Value::String(s) => !s.trim().is_empty(),
            _ => true,
        });

        !(company_named
            || !self.founders.is_empty()
            || !self.metrics.is_empty()
            || self.pitch_deck.as_ref().is_some_and(PitchDeck::has_any_field)
            || self
                .financial_model
                .as_ref()
                .is_some_and(FinancialModel::has_any_field)
            || vc_fit
            || self.go_to_market.as_ref().is_some_and(GoToMarket::has_any_field))
    }

    /// Child records that need a company row to hang off.
    pub fn has_dependent_records(&self) -> bool {
        !self.founders.is_empty()
            || !self.metrics.is_empty()
            || self.pitch_deck.as_ref().is_some_and(PitchDeck::has_any_field)
            || self
                .financial_model
                .as_ref()
                .is_some_and(FinancialModel::has_any_field)
    }
}

impl CompanyProfile {
    pub fn has_any_field(&self) -> bool {
        has_text(&self.name)
            || has_text(&self.industry)
            || has_text(&self.sub_industry)
            || has_text(&self.country)
            || has_text(&self.region)
            || has_text(&self.stage)
            || self.valuation_target.is_some()
            || self.funding_goal.is_some()
            || self.incorporation_year.is_some()
            || has_text(&self.pitch_deck_summary)
    }
}

impl PitchDeck {
    pub fn has_any_field(&self) -> bool {
        has_text(&self.core_problem)
            || has_text(&self.core_solution)
            || has_text(&self.customer_segment)
            || has_text(&self.product_summary_md)
    }
}

impl FinancialModel {
    pub fn has_any_field(&self) -> bool {
        self.monthly_revenue.is_some()
            || self.burn_rate.is_some()
            || self.ltv_cac_ratio.is_some()
            || self.runway_months.is_some()
            || has_text(&self.revenue_model_notes)
    }
}

impl GoToMarket {
    pub fn has_any_field(&self) -> bool {
        !self.channels.is_empty() || has_text(&self.notes_md)
    }
}

/// Parses numbers the way founders write them: `$1,200`, `35%`, ` 42 `.
pub fn parse_numeric(raw: &str) -> Option<f64> {
    let cleaned: String = raw
        .chars()
        .filter(|c| !matches!(c, '$' | ',' | '%') && !c.is_whitespace())
        .collect();

    if cleaned.is_empty() {
        return None;
    }

    cleaned.parse::<f64>().ok().filter(|n| n.is_finite())
}

fn value_to_f64(value: Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => parse_numeric(&s),
        _ => None,
    }
}

fn lenient_f64<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.and_then(value_to_f64))
}

fn lenient_i32<'de, D>(deserializer: D) -> Result<Option<i32>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value
        .and_then(value_to_f64)
        .filter(|n| *n >= i32::MIN as f64 && *n <= i32::MAX as f64)
        .map(|n| n.round() as i32))
}

fn lenient_string_list<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    let items = match value {
        Some(Value::Array(items)) => items
            .into_iter()
            .filter_map(|item| match item {
                Value::String(s) => Some(s),
                Value::Null => None,
                other => Some(other.to_string()),
            })
            .collect(),
        Some(Value::String(s)) => s.split(',').map(|part| part.trim().to_string()).collect(),
        _ => Vec::new(),
    };

    Ok(items.into_iter().filter(|s| !s.is_empty()).collect())
}

fn lenient_text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(Value::String(s)) => Some(s),
        Some(Value::Array(items)) => {
            let parts: Vec<String> = items
                .into_iter()
                .filter_map(|item| match item {
                    Value::String(s) => Some(s),
                    Value::Null => None,
                    other => Some(other.to_string()),
                })
                .collect();
            (!parts.is_empty()).then(|| parts.join("; "))
        }
        Some(Value::Null) | None => None,
        Some(other) => Some(other.to_string()),
    })
}

fn null_as_empty<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Ok(Option::<Vec<T>>::deserialize(deserializer)?.unwrap_or_default())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_default_analysis_is_empty() {
        assert!(StartupAnalysis::default().is_empty());
    }

    #[test]
    fn test_company_without_name_or_summary_is_empty() {
        let analysis = StartupAnalysis {
            company: Some(CompanyProfile {
                industry: Some("Fintech".to_string()),
                ..Default::default()
            }),
            ..Default::default()
        };
        assert!(analysis.is_empty());
    }

    #[test]
    fn test_any_meaningful_section_makes_it_non_empty() {
        let named = StartupAnalysis {
            company: Some(CompanyProfile {
                name: Some("Acme".to_string()),
                ..Default::default()
            }),
            ..Default::default()
        };
        assert!(!named.is_empty());

        let with_metric = StartupAnalysis {
            metrics: vec![Metric::default()],
            ..Default::default()
        };
        assert!(!with_metric.is_empty());

        let with_gtm = StartupAnalysis {
            go_to_market: Some(GoToMarket {
                channels: vec!["outbound".to_string()],
                notes_md: None,
            }),
            ..Default::default()
        };
        assert!(!with_gtm.is_empty());

        let with_report = StartupAnalysis {
            vc_fit_report: Some(json!({"score": 7})),
            ..Default::default()
        };
        assert!(!with_report.is_empty());
    }

    #[test]
    fn test_blank_sections_stay_empty() {
        let analysis = StartupAnalysis {
            pitch_deck: Some(PitchDeck {
                core_problem: Some("   ".to_string()),
                ..Default::default()
            }),
            financial_model: Some(FinancialModel::default()),
            vc_fit_report: Some(json!({})),
            ..Default::default()
        };
        assert!(analysis.is_empty());
    }

    #[test]
    fn test_deserializes_sparse_ai_output() {
        let analysis: StartupAnalysis = serde_json::from_value(json!({
            "company": {"name": "Acme", "funding_goal": "$1,500,000", "incorporation_year": "2021"},
            "founders": null,
            "metrics": [{"name": "MRR", "value": "12,000", "unit": "USD"}],
            "go_to_market": {"channels": "SEO, partnerships"}
        }))
        .unwrap();

        let company = analysis.company.unwrap();
        assert_eq!(company.funding_goal, Some(1_500_000.0));
        assert_eq!(company.incorporation_year, Some(2021));
        assert!(analysis.founders.is_empty());
        assert_eq!(analysis.metrics[0].value, Some(12_000.0));
        assert_eq!(
            analysis.go_to_market.unwrap().channels,
            vec!["SEO", "partnerships"]
        );
    }

    #[test]
    fn test_founder_lenient_fields() {
        let founder: Founder = serde_json::from_value(json!({
            "name": "Ada",
            "years_domain_experience": 7.6,
            "technical_skills": ["rust", null, "ml"],
            "achievements": ["YC W21", "Exited a startup"]
        }))
        .unwrap();

        assert_eq!(founder.years_domain_experience, Some(8));
        assert_eq!(founder.technical_skills, vec!["rust", "ml"]);
        assert_eq!(
            founder.achievements.as_deref(),
            Some("YC W21; Exited a startup")
        );
    }

    #[test]
    fn test_parse_numeric() {
        assert_eq!(parse_numeric("$1,200"), Some(1200.0));
        assert_eq!(parse_numeric(" 35% "), Some(35.0));
        assert_eq!(parse_numeric("-4.5"), Some(-4.5));
        assert_eq!(parse_numeric("n/a"), None);
        assert_eq!(parse_numeric(""), None);
    }
}
