use async_trait::async_trait;
use serde::Serialize;
use thiserror::Error;
use uuid::Uuid;

pub const FEATURE_UPLOADS: &str = "uploads";

#[derive(Debug, Error)]
pub enum FeatureGateError {
    #[error("Feature gate unavailable: {0}")]
    Unavailable(String),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LimitCheck {
    pub allowed: bool,
    pub current_usage: i64,
    pub limit_value: i64,
    pub unlimited: bool,
}

impl LimitCheck {
    pub fn is_blocked(&self) -> bool {
        !self.allowed && !self.unlimited
    }
}

/// Subscription-backed usage limits per user and feature.
#[async_trait]
pub trait FeatureGate: Send + Sync {
    async fn check_limit(&self, user_id: Uuid, feature: &str)
    -> Result<LimitCheck, FeatureGateError>;

    async fn track_usage(
        &self,
        user_id: Uuid,
        feature: &str,
        increment: i64,
    ) -> Result<bool, FeatureGateError>;
}
