//! PostgreSQL implementation of CommunityRepository
//!
//! Each method is a single plain query; the join happens in
//! [`dw_core::CommunityActivity::summarize`].

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use tracing::instrument;
use uuid::Uuid;

use dw_core::entities::{Comment, Membership, Post, ReactionRecord};
use dw_core::traits::{CommunityRepository, RepoResult};
use dw_core::value_objects::{CommunityId, PostId};

use crate::mappers::records_from_models;
use crate::models::{CommentModel, MembershipModel, PostModel, ReactionModel};

use super::error::map_db_error;

/// PostgreSQL implementation of CommunityRepository
#[derive(Clone)]
pub struct PgCommunityRepository {
    pool: PgPool,
}

impl PgCommunityRepository {
    /// Create a new PgCommunityRepository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn raw_ids(post_ids: &[PostId]) -> Vec<Uuid> {
    post_ids.iter().map(|id| id.into_inner()).collect()
}

#[async_trait]
impl CommunityRepository for PgCommunityRepository {
    #[instrument(skip(self))]
    async fn posts_since(&self, community_id: CommunityId, since: DateTime<Utc>) -> RepoResult<Vec<Post>> {
        let results = sqlx::query_as::<_, PostModel>(
            r#"
            SELECT id, community_id, author_id, title, post_type, view_count, created_at
            FROM posts
            WHERE community_id = $1 AND created_at >= $2
            ORDER BY created_at DESC
            "#,
        )
        .bind(community_id.into_inner())
        .bind(since)
        .fetch_all(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(results.into_iter().map(Post::from).collect())
    }

    #[instrument(skip(self, post_ids), fields(posts = post_ids.len()))]
    async fn comments_for_posts(&self, post_ids: &[PostId]) -> RepoResult<Vec<Comment>> {
        if post_ids.is_empty() {
            return Ok(Vec::new());
        }

        let results = sqlx::query_as::<_, CommentModel>(
            r#"
            SELECT id, post_id, author_id, created_at
            FROM comments
            WHERE post_id = ANY($1)
            "#,
        )
        .bind(raw_ids(post_ids))
        .fetch_all(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(results.into_iter().map(Comment::from).collect())
    }

    #[instrument(skip(self, post_ids), fields(posts = post_ids.len()))]
    async fn reactions_for_posts(&self, post_ids: &[PostId]) -> RepoResult<Vec<ReactionRecord>> {
        if post_ids.is_empty() {
            return Ok(Vec::new());
        }

        let results = sqlx::query_as::<_, ReactionModel>(
            r#"
            SELECT id, post_id, user_id, reaction_type, emoji, created_at
            FROM post_reactions
            WHERE post_id = ANY($1)
            "#,
        )
        .bind(raw_ids(post_ids))
        .fetch_all(&self.pool)
        .await
        .map_err(map_db_error)?;

        records_from_models(results)
    }

    #[instrument(skip(self))]
    async fn members(&self, community_id: CommunityId) -> RepoResult<Vec<Membership>> {
        let results = sqlx::query_as::<_, MembershipModel>(
            r#"
            SELECT community_id, user_id, joined_at
            FROM community_members
            WHERE community_id = $1
            "#,
        )
        .bind(community_id.into_inner())
        .fetch_all(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(results.into_iter().map(Membership::from).collect())
    }
}
