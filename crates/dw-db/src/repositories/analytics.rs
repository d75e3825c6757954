//! PostgreSQL implementation of AnalyticsRpc via the `get_community_analytics` function

use async_trait::async_trait;
use sqlx::types::Json;
use sqlx::PgPool;
use tracing::instrument;

use dw_core::analytics::CommunityAnalytics;
use dw_core::error::DomainError;
use dw_core::traits::{AnalyticsRpc, RepoResult};
use dw_core::value_objects::CommunityId;

use super::error::map_rpc_error;

/// Calls the server-side aggregation function
#[derive(Clone)]
pub struct PgAnalyticsRpc {
    pool: PgPool,
}

impl PgAnalyticsRpc {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl AnalyticsRpc for PgAnalyticsRpc {
    #[instrument(skip(self))]
    async fn community_analytics(
        &self,
        community_id: CommunityId,
        days_back: u32,
    ) -> RepoResult<CommunityAnalytics> {
        let days_back = i32::try_from(days_back)
            .map_err(|_| DomainError::ValidationError(format!("days_back out of range: {days_back}")))?;

        let (report,): (Option<Json<CommunityAnalytics>>,) =
            sqlx::query_as("SELECT get_community_analytics($1, $2)")
                .bind(community_id.into_inner())
                .bind(days_back)
                .fetch_one(&self.pool)
                .await
                .map_err(map_rpc_error)?;

        report
            .map(|Json(report)| report)
            .ok_or_else(|| DomainError::AnalyticsUnavailable("empty analytics payload".to_string()))
    }
}
