use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, warn};

use crate::application::ports::completion_provider::{
    CompletionError, CompletionProvider, CompletionRequest,
};
use crate::application::ports::content_extractor::ExtractedContent;
use crate::domain::entities::StartupAnalysis;
use crate::domain::value_objects::FileMetadata;

pub const SYSTEM_PROMPT: &str = r#"You are an analyst for venture capital investors. Extract structured startup information from the material the user provides.

Respond with a single JSON object and nothing else. Use exactly these fields and omit anything the material does not support:
{
  "company": {
    "name": string, "industry": string, "sub_industry": string, "country": string,
    "region": string, "stage": string, "valuation_target": number, "funding_goal": number,
    "incorporation_year": number, "pitch_deck_summary": string
  },
  "founders": [{
    "name": string, "linkedin_url": string, "education_history": array,
    "years_domain_experience": number, "technical_skills": [string], "achievements": string
  }],
  "pitch_deck": {
    "core_problem": string, "core_solution": string, "customer_segment": string,
    "product_summary_md": string
  },
  "financial_model": {
    "monthly_revenue": number, "burn_rate": number, "ltv_cac_ratio": number,
    "runway_months": number, "revenue_model_notes": string
  },
  "go_to_market": { "channels": [string], "notes_md": string },
  "metrics": [{ "name": string, "value": number, "unit": string }]
}

Monetary values are in USD. Do not invent data."#;

/// Metadata keys that duplicate the content itself and are not sent.
const BULKY_METADATA_KEYS: &[&str] = &["rows", "sample_rows", "full_text", "ocr_text"];

#[derive(Debug, Error)]
pub enum AnalysisError {
    #[error("AI analysis request failed: {0}")]
    RequestFailed(#[from] CompletionError),
}

#[derive(Debug, Clone)]
pub struct AnalysisConfig {
    pub model: String,
    pub temperature: f32,
    pub max_tokens: u32,
    pub max_content_chars: usize,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            model: "gpt-4o-mini".to_string(),
            temperature: 0.1,
            max_tokens: 2000,
            max_content_chars: 12_000,
        }
    }
}

pub struct AnalysisRequester {
    provider: Arc<dyn CompletionProvider>,
    config: AnalysisConfig,
}

impl AnalysisRequester {
    pub fn new(provider: Arc<dyn CompletionProvider>, config: AnalysisConfig) -> Self {
        Self { provider, config }
    }

    /// Asks the completion service for a structured analysis. Transport
    /// failures are errors; unusable output is an empty analysis.
    pub async fn analyze(
        &self,
        content: &ExtractedContent,
    ) -> Result<StartupAnalysis, AnalysisError> {
        let request = CompletionRequest {
            system_prompt: SYSTEM_PROMPT.to_string(),
            user_content: self.build_user_content(content),
            model: self.config.model.clone(),
            temperature: self.config.temperature,
            max_tokens: self.config.max_tokens,
        };

        debug!(
            model = %request.model,
            kind = %content.kind,
            chars = request.user_content.len(),
            "requesting startup analysis"
        );

        let text = self.provider.complete(request).await?;
        Ok(parse_analysis(&text))
    }

    fn build_user_content(&self, content: &ExtractedContent) -> String {
        let body: String = content
            .content
            .chars()
            .take(self.config.max_content_chars)
            .collect();

        format!(
            "Content type: {}\nMetadata: {}\n\nContent:\n{}",
            content.kind,
            metadata_summary(&content.metadata),
            body
        )
    }
}

/// Strict JSON parse of the model output. Anything that is not a JSON object
/// matching the analysis schema yields an empty analysis.
pub fn parse_analysis(text: &str) -> StartupAnalysis {
    let value: serde_json::Value = match serde_json::from_str(text.trim()) {
        Ok(value) => value,
        Err(e) => {
            warn!(error = %e, "AI response is not valid JSON");
            return StartupAnalysis::default();
        }
    };

    if !value.is_object() {
        warn!("AI response is JSON but not an object");
        return StartupAnalysis::default();
    }

    serde_json::from_value(value).unwrap_or_else(|e| {
        warn!(error = %e, "AI response does not match the analysis schema");
        StartupAnalysis::default()
    })
}

fn metadata_summary(metadata: &FileMetadata) -> String {
    let mut entries: Vec<(&String, &serde_json::Value)> = metadata
        .properties()
        .iter()
        .filter(|(key, _)| !BULKY_METADATA_KEYS.contains(&key.as_str()))
        .collect();
    entries.sort_by(|a, b| a.0.cmp(b.0));

    let object: serde_json::Map<String, serde_json::Value> = entries
        .into_iter()
        .map(|(k, v)| (k.clone(), v.clone()))
        .collect();

    serde_json::Value::Object(object).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::testing::StaticCompletionProvider;
    use crate::domain::value_objects::ContentKind;

    fn text_content(text: &str) -> ExtractedContent {
        let mut metadata = FileMetadata::new();
        metadata.set_word_count(text.split_whitespace().count());
        metadata.set_property("full_text", serde_json::Value::from(text));
        ExtractedContent {
            kind: ContentKind::Txt,
            content: text.to_string(),
            metadata,
        }
    }

    #[tokio::test]
    async fn test_parses_structured_response() {
        let provider = Arc::new(StaticCompletionProvider::replying(
            r#"{"company": {"name": "Acme Robotics", "stage": "Seed"}, "metrics": [{"name": "MRR", "value": 12000, "unit": "USD"}]}"#,
        ));
        let requester = AnalysisRequester::new(provider.clone(), AnalysisConfig::default());

        let analysis = requester.analyze(&text_content("Acme builds robots")).await.unwrap();

        assert_eq!(
            analysis.company.unwrap().name.as_deref(),
            Some("Acme Robotics")
        );
        assert_eq!(analysis.metrics.len(), 1);
        assert_eq!(provider.call_count(), 1);
    }

    #[tokio::test]
    async fn test_non_json_response_is_empty_analysis() {
        let provider = Arc::new(StaticCompletionProvider::replying(
            "Sure! Here is the analysis you asked for.",
        ));
        let requester = AnalysisRequester::new(provider, AnalysisConfig::default());

        let analysis = requester.analyze(&text_content("hello")).await.unwrap();
        assert!(analysis.is_empty());
        assert_eq!(analysis, StartupAnalysis::default());
    }

    #[tokio::test]
    async fn test_transport_failure_is_an_error() {
        let provider = Arc::new(StaticCompletionProvider::failing(
            CompletionError::RateLimitExceeded,
        ));
        let requester = AnalysisRequester::new(provider, AnalysisConfig::default());

        let result = requester.analyze(&text_content("hello")).await;
        assert!(matches!(
            result,
            Err(AnalysisError::RequestFailed(CompletionError::RateLimitExceeded))
        ));
    }

    #[tokio::test]
    async fn test_request_shape() {
        let provider = Arc::new(StaticCompletionProvider::replying("{}"));
        let config = AnalysisConfig {
            max_content_chars: 5,
            ..Default::default()
        };
        let requester = AnalysisRequester::new(provider.clone(), config);

        requester.analyze(&text_content("abcdefghij")).await.unwrap();

        let request = provider.last_request().unwrap();
        assert_eq!(request.temperature, 0.1);
        assert_eq!(request.max_tokens, 2000);
        assert!(request.system_prompt.contains("\"pitch_deck_summary\""));
        assert!(request.user_content.contains("Content type: txt"));
        assert!(request.user_content.ends_with("abcde"));
        assert!(request.user_content.contains("\"word_count\":1"));
        assert!(!request.user_content.contains("full_text"));
    }

    #[test]
    fn test_parse_rejects_non_objects_and_schema_mismatch() {
        assert!(parse_analysis("[1, 2, 3]").is_empty());
        assert!(parse_analysis(r#"{"founders": "Ada"}"#).is_empty());
        assert!(parse_analysis("").is_empty());
    }
}
