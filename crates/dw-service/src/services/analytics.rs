//! Community analytics service
//!
//! Asks the server-side aggregation first and, if that fails for any reason,
//! fetches the raw rows and joins them in memory.

use chrono::{DateTime, TimeDelta, Utc};
use tracing::{info, instrument, warn};

use dw_core::{rank_top_conversations, CommunityActivity, CommunityAnalytics, CommunityId, PostId};

use super::context::ServiceContext;
use super::error::{ServiceError, ServiceResult};

/// Where a report came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnalyticsSource {
    Rpc,
    Fallback,
}

/// Analytics service
pub struct AnalyticsService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> AnalyticsService<'a> {
    /// Create a new AnalyticsService
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// Report over the configured window
    pub async fn community_analytics(&self, community_id: CommunityId) -> ServiceResult<CommunityAnalytics> {
        let days_back = self.ctx.config().analytics_days_back;
        self.community_analytics_for(community_id, days_back)
            .await
            .map(|(report, _)| report)
    }

    /// Report over the last `days_back` days, with its source
    #[instrument(skip(self))]
    pub async fn community_analytics_for(
        &self,
        community_id: CommunityId,
        days_back: u32,
    ) -> ServiceResult<(CommunityAnalytics, AnalyticsSource)> {
        let since = window_start(days_back)?;
        let limit = self.ctx.config().top_conversations;

        match self
            .ctx
            .bounded(self.ctx.analytics_rpc().community_analytics(community_id, days_back))
            .await
        {
            Ok(mut report) => {
                report.top_conversations = rank_top_conversations(report.top_conversations, limit);
                info!(community_id = %community_id, posts = report.total_posts, "Analytics from RPC");
                return Ok((report, AnalyticsSource::Rpc));
            }
            Err(e) => {
                warn!(community_id = %community_id, error = %e, "Analytics RPC failed, aggregating locally");
            }
        }

        let activity = self.fetch_activity(community_id, since).await?;
        let report = activity.summarize(limit);
        info!(
            community_id = %community_id,
            posts = report.total_posts,
            members = report.total_members,
            "Analytics from fallback"
        );
        Ok((report, AnalyticsSource::Fallback))
    }

    async fn fetch_activity(
        &self,
        community_id: CommunityId,
        since: DateTime<Utc>,
    ) -> ServiceResult<CommunityActivity> {
        let repo = self.ctx.community_repo();

        let (posts, members) = tokio::try_join!(
            self.ctx.bounded(repo.posts_since(community_id, since)),
            self.ctx.bounded(repo.members(community_id)),
        )?;

        let post_ids: Vec<PostId> = posts.iter().map(|p| p.id).collect();
        let (comments, reactions) = tokio::try_join!(
            self.ctx.bounded(repo.comments_for_posts(&post_ids)),
            self.ctx.bounded(repo.reactions_for_posts(&post_ids)),
        )?;

        Ok(CommunityActivity {
            members,
            posts,
            comments,
            reactions,
        })
    }
}

/// Start of a window reaching `days_back` days into the past
fn window_start(days_back: u32) -> ServiceResult<DateTime<Utc>> {
    if days_back == 0 {
        return Err(ServiceError::validation("days_back must be positive"));
    }
    TimeDelta::try_days(i64::from(days_back))
        .and_then(|window| Utc::now().checked_sub_signed(window))
        .ok_or_else(|| ServiceError::validation(format!("days_back {days_back} is out of range")))
}
