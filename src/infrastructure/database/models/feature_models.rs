use diesel::prelude::*;
use uuid::Uuid;

use crate::infrastructure::database::schema::{feature_limits, feature_usage};

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = feature_limits)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct FeatureLimitModel {
    pub user_id: Uuid,
    pub feature_name: String,
    pub limit_value: i64,
    pub unlimited: bool,
}

#[derive(Debug, Insertable)]
#[diesel(table_name = feature_usage)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct NewFeatureUsageModel {
    pub user_id: Uuid,
    pub feature_name: String,
    pub usage_count: i64,
}
