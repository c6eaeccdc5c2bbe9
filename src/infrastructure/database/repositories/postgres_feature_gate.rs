use async_trait::async_trait;
use diesel::prelude::*;
use tracing::debug;
use uuid::Uuid;

use crate::application::ports::feature_gate::{FeatureGate, FeatureGateError, LimitCheck};
use crate::infrastructure::database::models::{FeatureLimitModel, NewFeatureUsageModel};
use crate::infrastructure::database::schema::{feature_limits, feature_usage};
use crate::infrastructure::database::{DbPool, with_connection};

/// Usage limits stored next to the startup tables. Users without a
/// `feature_limits` row get `default_limit`.
pub struct PostgresFeatureGate {
    pool: DbPool,
    default_limit: i64,
}

impl PostgresFeatureGate {
    pub fn new(pool: DbPool, default_limit: i64) -> Self {
        Self {
            pool,
            default_limit,
        }
    }
}

fn gate_error(error: diesel::result::Error) -> FeatureGateError {
    FeatureGateError::Unavailable(error.to_string())
}

#[async_trait]
impl FeatureGate for PostgresFeatureGate {
    async fn check_limit(
        &self,
        user_id: Uuid,
        feature: &str,
    ) -> Result<LimitCheck, FeatureGateError> {
        let feature = feature.to_string();
        let default_limit = self.default_limit;

        with_connection(&self.pool, move |conn| {
            let limit = feature_limits::table
                .filter(feature_limits::user_id.eq(user_id))
                .filter(feature_limits::feature_name.eq(&feature))
                .select(FeatureLimitModel::as_select())
                .first(conn)
                .optional()
                .map_err(gate_error)?;

            let current_usage = feature_usage::table
                .filter(feature_usage::user_id.eq(user_id))
                .filter(feature_usage::feature_name.eq(&feature))
                .select(feature_usage::usage_count)
                .first::<i64>(conn)
                .optional()
                .map_err(gate_error)?
                .unwrap_or(0);

            let (limit_value, unlimited) = limit
                .map(|l| (l.limit_value, l.unlimited))
                .unwrap_or((default_limit, false));

            debug!(%user_id, feature = %feature, current_usage, limit_value, unlimited, "checked feature limit");

            Ok(LimitCheck {
                allowed: unlimited || current_usage < limit_value,
                current_usage,
                limit_value,
                unlimited,
            })
        })
        .await
    }

    async fn track_usage(
        &self,
        user_id: Uuid,
        feature: &str,
        increment: i64,
    ) -> Result<bool, FeatureGateError> {
        let row = NewFeatureUsageModel {
            user_id,
            feature_name: feature.to_string(),
            usage_count: increment,
        };

        with_connection(&self.pool, move |conn| {
            let updated = diesel::insert_into(feature_usage::table)
                .values(&row)
                .on_conflict((feature_usage::user_id, feature_usage::feature_name))
                .do_update()
                .set((
                    feature_usage::usage_count.eq(feature_usage::usage_count + increment),
                    feature_usage::updated_at.eq(diesel::dsl::now),
                ))
                .execute(conn)
                .map_err(gate_error)?;

            Ok(updated > 0)
        })
        .await
    }
}
