//! Glyph cache backed by Redis.

use async_trait::async_trait;

use dw_core::traits::{GlyphCache, RepoResult};
use dw_core::value_objects::{PostId, UserId};

use crate::pool::{CachedGlyph, RedisPool};

/// Redis-backed [`GlyphCache`]
///
/// Entry expiry follows the pool's `glyph_ttl_seconds`.
#[derive(Debug, Clone)]
pub struct RedisGlyphCache {
    pool: RedisPool,
}

impl RedisGlyphCache {
    #[must_use]
    pub fn new(pool: RedisPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl GlyphCache for RedisGlyphCache {
    async fn get(&self, post_id: PostId, user_id: UserId) -> RepoResult<Option<String>> {
        let entry = self.pool.read_glyph(post_id, user_id).await?;
        Ok(entry.map(|e| e.glyph))
    }

    async fn set(&self, post_id: PostId, user_id: UserId, glyph: &str) -> RepoResult<()> {
        self.pool
            .write_glyph(post_id, user_id, &CachedGlyph::new(glyph))
            .await?;
        tracing::debug!(post_id = %post_id, user_id = %user_id, glyph = %glyph, "Cached glyph");
        Ok(())
    }

    async fn clear(&self, post_id: PostId, user_id: UserId) -> RepoResult<()> {
        let removed = self.pool.drop_glyph(post_id, user_id).await?;
        tracing::debug!(post_id = %post_id, user_id = %user_id, removed, "Cleared cached glyph");
        Ok(())
    }
}
