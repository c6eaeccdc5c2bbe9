use crate::application::ports::content_extractor::ExtractedContent;
use crate::domain::entities::startup_analysis::parse_numeric;
use crate::domain::entities::{CompanyProfile, Metric, StartupAnalysis};
use crate::domain::value_objects::ContentKind;

pub const FALLBACK_COMPANY_NAME: &str = "Startup from Upload";

const MAX_SCANNED_ROWS: usize = 10;

const CURRENCY_KEYWORDS: &[&str] = &["revenue", "sales", "mrr", "arr"];
const RATE_KEYWORDS: &[&str] = &["growth", "conversion", "churn", "rate"];
const COUNT_KEYWORDS: &[&str] = &["user", "customer"];

/// Builds a minimal analysis straight from extracted content. Used when the
/// AI path fails or returns nothing usable, so it must never fail itself.
pub fn build_fallback_analysis(content: &ExtractedContent) -> StartupAnalysis {
    let company = CompanyProfile {
        name: Some(FALLBACK_COMPANY_NAME.to_string()),
        pitch_deck_summary: Some(format!(
            "Analysis of uploaded {} file containing {} words.",
            content.kind,
            content.word_count()
        )),
        ..Default::default()
    };

    let metrics = if content.kind == ContentKind::Csv {
        csv_metrics(content)
    } else {
        Vec::new()
    };

    StartupAnalysis {
        company: Some(company),
        metrics,
        ..Default::default()
    }
}

fn csv_metrics(content: &ExtractedContent) -> Vec<Metric> {
    let Some(rows) = content.metadata.rows() else {
        return Vec::new();
    };
    // Row maps are unordered; walk columns in header order for stable output.
    let headers = content.metadata.headers().unwrap_or_default();

    let mut metrics = Vec::new();
    for row in rows.iter().take(MAX_SCANNED_ROWS) {
        for header in &headers {
            let Some(unit) = metric_unit(header) else {
                continue;
            };
            let Some(value) = row.get(header).and_then(|raw| parse_numeric(raw)) else {
                continue;
            };

            metrics.push(Metric {
                name: Some(header.clone()),
                value: Some(value),
                unit: Some(unit.to_string()),
            });
        }
    }

    metrics
}

/// Unit for a column whose header names a KPI, `None` for other columns.
fn metric_unit(header: &str) -> Option<&'static str> {
    let header = header.to_lowercase();
    let has_any = |keywords: &[&str]| keywords.iter().any(|k| header.contains(k));

    if has_any(CURRENCY_KEYWORDS) {
        Some("USD")
    } else if has_any(RATE_KEYWORDS) {
        Some("%")
    } else if has_any(COUNT_KEYWORDS) {
        Some("count")
    } else {
        None
    }
}
