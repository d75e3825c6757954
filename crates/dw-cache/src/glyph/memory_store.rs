//! In-process glyph cache.

use std::sync::Arc;

use async_trait::async_trait;
use dashmap::DashMap;

use dw_core::traits::{GlyphCache, RepoResult};
use dw_core::value_objects::{PostId, UserId};

/// DashMap-backed [`GlyphCache`]; clones share entries
#[derive(Debug, Clone, Default)]
pub struct MemoryGlyphCache {
    entries: Arc<DashMap<(PostId, UserId), String>>,
}

impl MemoryGlyphCache {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of cached entries
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Synchronous peek, for assertions and snapshots
    #[must_use]
    pub fn peek(&self, post_id: PostId, user_id: UserId) -> Option<String> {
        self.entries.get(&(post_id, user_id)).map(|e| e.value().clone())
    }
}

#[async_trait]
impl GlyphCache for MemoryGlyphCache {
    async fn get(&self, post_id: PostId, user_id: UserId) -> RepoResult<Option<String>> {
        Ok(self.peek(post_id, user_id))
    }

    async fn set(&self, post_id: PostId, user_id: UserId, glyph: &str) -> RepoResult<()> {
        self.entries.insert((post_id, user_id), glyph.to_string());
        Ok(())
    }

    async fn clear(&self, post_id: PostId, user_id: UserId) -> RepoResult<()> {
        self.entries.remove(&(post_id, user_id));
        Ok(())
    }
}
