//! PostgreSQL implementation of ReactionRepository

use async_trait::async_trait;
use sqlx::PgPool;
use tracing::instrument;

use dw_core::entities::ReactionRecord;
use dw_core::error::DomainError;
use dw_core::traits::{ReactionRepository, RepoResult};
use dw_core::value_objects::{PostId, UserId};

use crate::mappers::{records_from_models, ReactionInsert};
use crate::models::ReactionModel;

use super::error::{map_db_error, map_fetch_error, map_unique_violation};

/// PostgreSQL implementation of ReactionRepository
#[derive(Clone)]
pub struct PgReactionRepository {
    pool: PgPool,
}

impl PgReactionRepository {
    /// Create a new PgReactionRepository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ReactionRepository for PgReactionRepository {
    #[instrument(skip(self))]
    async fn list_by_post(&self, post_id: PostId) -> RepoResult<Vec<ReactionRecord>> {
        let results = sqlx::query_as::<_, ReactionModel>(
            r#"
            SELECT id, post_id, user_id, reaction_type, emoji, created_at
            FROM post_reactions
            WHERE post_id = $1
            ORDER BY created_at
            "#,
        )
        .bind(post_id.into_inner())
        .fetch_all(&self.pool)
        .await
        .map_err(map_fetch_error)?;

        records_from_models(results)
    }

    #[instrument(skip(self))]
    async fn find(&self, post_id: PostId, user_id: UserId) -> RepoResult<Option<ReactionRecord>> {
        let result = sqlx::query_as::<_, ReactionModel>(
            r#"
            SELECT id, post_id, user_id, reaction_type, emoji, created_at
            FROM post_reactions
            WHERE post_id = $1 AND user_id = $2
            "#,
        )
        .bind(post_id.into_inner())
        .bind(user_id.into_inner())
        .fetch_optional(&self.pool)
        .await
        .map_err(map_fetch_error)?;

        result.map(ReactionRecord::try_from).transpose()
    }

    #[instrument(skip(self, record), fields(post_id = %record.post_id, user_id = %record.user_id))]
    async fn insert(&self, record: &ReactionRecord) -> RepoResult<()> {
        let row = ReactionInsert::new(record);

        sqlx::query(
            r#"
            INSERT INTO post_reactions (id, post_id, user_id, reaction_type, emoji, created_at)
            VALUES ($1, $2, $3, $4, $5, $6)
            "#,
        )
        .bind(row.id)
        .bind(row.post_id)
        .bind(row.user_id)
        .bind(row.reaction_type)
        .bind(row.emoji)
        .bind(record.created_at)
        .execute(&self.pool)
        .await
        .map_err(|e| map_unique_violation(e, || DomainError::ReactionAlreadyExists))?;

        Ok(())
    }

    #[instrument(skip(self, record), fields(post_id = %record.post_id, user_id = %record.user_id))]
    async fn upsert(&self, record: &ReactionRecord) -> RepoResult<()> {
        let row = ReactionInsert::new(record);

        sqlx::query(
            r#"
            INSERT INTO post_reactions (id, post_id, user_id, reaction_type, emoji, created_at)
            VALUES ($1, $2, $3, $4, $5, $6)
            ON CONFLICT (user_id, post_id) DO UPDATE
            SET reaction_type = EXCLUDED.reaction_type,
                emoji = EXCLUDED.emoji,
                created_at = EXCLUDED.created_at
            "#,
        )
        .bind(row.id)
        .bind(row.post_id)
        .bind(row.user_id)
        .bind(row.reaction_type)
        .bind(row.emoji)
        .bind(record.created_at)
        .execute(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(())
    }

    #[instrument(skip(self))]
    async fn delete(&self, post_id: PostId, user_id: UserId) -> RepoResult<bool> {
        let result = sqlx::query(
            r#"
            DELETE FROM post_reactions
            WHERE post_id = $1 AND user_id = $2
            "#,
        )
        .bind(post_id.into_inner())
        .bind(user_id.into_inner())
        .execute(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(result.rows_affected() > 0)
    }
}
