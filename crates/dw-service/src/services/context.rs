//! Service context - dependency container for services
//!
//! Holds the repositories, the glyph cache, the notifier, engagement settings
//! and the shared write slots.

use std::future::Future;
use std::sync::Arc;

use dw_cache::{MemoryGlyphCache, RedisGlyphCache, RedisPool};
use dw_common::EngagementConfig;
use dw_core::traits::{
    AnalyticsRpc, CommunityRepository, GlyphCache, PostRepository, ReactionRepository, RepoResult,
};
use dw_core::DomainError;
use dw_db::{
    MemoryStore, PgAnalyticsRpc, PgCommunityRepository, PgPool, PgPostRepository,
    PgReactionRepository,
};

use super::error::{ServiceError, ServiceResult};
use super::notifier::{Notifier, TracingNotifier};
use super::sequencing::WriteSlots;

/// Service context containing all dependencies
///
/// Cheap to clone; every dependency sits behind an `Arc`.
#[derive(Clone)]
pub struct ServiceContext {
    // Repositories
    reaction_repo: Arc<dyn ReactionRepository>,
    post_repo: Arc<dyn PostRepository>,
    community_repo: Arc<dyn CommunityRepository>,
    analytics_rpc: Arc<dyn AnalyticsRpc>,

    // Local cache
    glyph_cache: Arc<dyn GlyphCache>,

    notifier: Arc<dyn Notifier>,
    config: EngagementConfig,
    write_slots: Arc<WriteSlots>,
}

impl ServiceContext {
    /// Create a new service context with all dependencies
    pub fn new(
        reaction_repo: Arc<dyn ReactionRepository>,
        post_repo: Arc<dyn PostRepository>,
        community_repo: Arc<dyn CommunityRepository>,
        analytics_rpc: Arc<dyn AnalyticsRpc>,
        glyph_cache: Arc<dyn GlyphCache>,
        notifier: Arc<dyn Notifier>,
        config: EngagementConfig,
    ) -> Self {
        Self {
            reaction_repo,
            post_repo,
            community_repo,
            analytics_rpc,
            glyph_cache,
            notifier,
            config,
            write_slots: Arc::new(WriteSlots::new()),
        }
    }

    /// Wire the PostgreSQL repositories, and Redis for the glyph cache when
    /// configured, otherwise an in-process cache
    pub fn postgres(
        pool: PgPool,
        redis: Option<RedisPool>,
        notifier: Arc<dyn Notifier>,
        config: EngagementConfig,
    ) -> Self {
        let glyph_cache: Arc<dyn GlyphCache> = match redis {
            Some(redis_pool) => Arc::new(RedisGlyphCache::new(redis_pool)),
            None => Arc::new(MemoryGlyphCache::new()),
        };

        Self::new(
            Arc::new(PgReactionRepository::new(pool.clone())),
            Arc::new(PgPostRepository::new(pool.clone())),
            Arc::new(PgCommunityRepository::new(pool.clone())),
            Arc::new(PgAnalyticsRpc::new(pool)),
            glyph_cache,
            notifier,
            config,
        )
    }

    /// Back every port with one in-memory store
    pub fn in_memory(
        store: MemoryStore,
        cache: MemoryGlyphCache,
        notifier: Arc<dyn Notifier>,
        config: EngagementConfig,
    ) -> Self {
        let store = Arc::new(store);
        Self::new(
            store.clone(),
            store.clone(),
            store.clone(),
            store,
            Arc::new(cache),
            notifier,
            config,
        )
    }

    // === Repositories ===

    /// Get the reaction repository
    pub fn reaction_repo(&self) -> &dyn ReactionRepository {
        self.reaction_repo.as_ref()
    }

    /// Get the post repository
    pub fn post_repo(&self) -> &dyn PostRepository {
        self.post_repo.as_ref()
    }

    /// Get the community repository
    pub fn community_repo(&self) -> &dyn CommunityRepository {
        self.community_repo.as_ref()
    }

    /// Get the analytics RPC client
    pub fn analytics_rpc(&self) -> &dyn AnalyticsRpc {
        self.analytics_rpc.as_ref()
    }

    // === Cache ===

    /// Get the glyph cache
    pub fn glyph_cache(&self) -> &dyn GlyphCache {
        self.glyph_cache.as_ref()
    }

    // === Engagement ===

    pub fn notifier(&self) -> &dyn Notifier {
        self.notifier.as_ref()
    }

    pub fn config(&self) -> &EngagementConfig {
        &self.config
    }

    pub fn write_slots(&self) -> &WriteSlots {
        &self.write_slots
    }

    /// Await a store call, failing with `DomainError::Timeout` past the
    /// configured write timeout
    pub async fn bounded<T, F>(&self, call: F) -> RepoResult<T>
    where
        F: Future<Output = RepoResult<T>>,
    {
        let limit = self.config.write_timeout();
        match tokio::time::timeout(limit, call).await {
            Ok(result) => result,
            Err(_) => Err(DomainError::Timeout {
                millis: limit.as_millis() as u64,
            }),
        }
    }
}

impl std::fmt::Debug for ServiceContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ServiceContext")
            .field("repositories", &"...")
            .field("glyph_cache", &"...")
            .field("config", &self.config)
            .field("write_slots", &self.write_slots.len())
            .finish()
    }
}

/// Builder for creating ServiceContext with custom configuration
pub struct ServiceContextBuilder {
    reaction_repo: Option<Arc<dyn ReactionRepository>>,
    post_repo: Option<Arc<dyn PostRepository>>,
    community_repo: Option<Arc<dyn CommunityRepository>>,
    analytics_rpc: Option<Arc<dyn AnalyticsRpc>>,
    glyph_cache: Option<Arc<dyn GlyphCache>>,
    notifier: Option<Arc<dyn Notifier>>,
    config: EngagementConfig,
}

impl ServiceContextBuilder {
    pub fn new() -> Self {
        Self {
            reaction_repo: None,
            post_repo: None,
            community_repo: None,
            analytics_rpc: None,
            glyph_cache: None,
            notifier: None,
            config: EngagementConfig::default(),
        }
    }

    pub fn reaction_repo(mut self, repo: Arc<dyn ReactionRepository>) -> Self {
        self.reaction_repo = Some(repo);
        self
    }

    pub fn post_repo(mut self, repo: Arc<dyn PostRepository>) -> Self {
        self.post_repo = Some(repo);
        self
    }

    pub fn community_repo(mut self, repo: Arc<dyn CommunityRepository>) -> Self {
        self.community_repo = Some(repo);
        self
    }

    pub fn analytics_rpc(mut self, rpc: Arc<dyn AnalyticsRpc>) -> Self {
        self.analytics_rpc = Some(rpc);
        self
    }

    pub fn glyph_cache(mut self, cache: Arc<dyn GlyphCache>) -> Self {
        self.glyph_cache = Some(cache);
        self
    }

    /// Defaults to [`TracingNotifier`]
    pub fn notifier(mut self, notifier: Arc<dyn Notifier>) -> Self {
        self.notifier = Some(notifier);
        self
    }

    pub fn config(mut self, config: EngagementConfig) -> Self {
        self.config = config;
        self
    }

    /// Build the ServiceContext
    ///
    /// # Errors
    /// Returns `ServiceError::Validation` if any required dependency is missing
    pub fn build(self) -> ServiceResult<ServiceContext> {
        if self.config.write_timeout_ms == 0 {
            return Err(ServiceError::validation("write_timeout_ms must be positive"));
        }

        Ok(ServiceContext::new(
            self.reaction_repo.ok_or_else(|| ServiceError::validation("reaction_repo is required"))?,
            self.post_repo.ok_or_else(|| ServiceError::validation("post_repo is required"))?,
            self.community_repo.ok_or_else(|| ServiceError::validation("community_repo is required"))?,
            self.analytics_rpc.ok_or_else(|| ServiceError::validation("analytics_rpc is required"))?,
            self.glyph_cache.ok_or_else(|| ServiceError::validation("glyph_cache is required"))?,
            self.notifier.unwrap_or_else(|| Arc::new(TracingNotifier)),
            self.config,
        ))
    }
}

impl Default for ServiceContextBuilder {
    fn default() -> Self {
        Self::new()
    }
}
