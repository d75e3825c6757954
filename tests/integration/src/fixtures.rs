//! Test fixtures
//!
//! A `TestWorld` is one community with one post, backed by the in-memory
//! store and cache, with fault-injecting wrappers in front of both.

use std::sync::Arc;

use dw_cache::MemoryGlyphCache;
use dw_common::EngagementConfig;
use dw_core::{AnalyticsRpc, CommunityId, Membership, Post, UserId};
use dw_db::MemoryStore;
use dw_service::{ReactionController, ServiceContext, ServiceContextBuilder};

use crate::helpers::{FlakyGlyphCache, FlakyReactionRepository, RecordingNotifier};

/// Store, cache and notifier shared by every controller in a test
pub struct TestWorld {
    pub store: MemoryStore,
    pub cache: MemoryGlyphCache,
    pub reactions: Arc<FlakyReactionRepository>,
    pub glyphs: Arc<FlakyGlyphCache>,
    pub notifier: Arc<RecordingNotifier>,
    pub community: CommunityId,
    pub post: Post,
    pub ctx: ServiceContext,
}

/// Builder for [`TestWorld`]
#[derive(Default)]
pub struct TestWorldBuilder {
    config: EngagementConfig,
    gated: bool,
    analytics_rpc: Option<Arc<dyn AnalyticsRpc>>,
}

impl TestWorldBuilder {
    pub fn write_timeout_ms(mut self, millis: u64) -> Self {
        self.config.write_timeout_ms = millis;
        self
    }

    pub fn top_conversations(mut self, limit: usize) -> Self {
        self.config.top_conversations = limit;
        self
    }

    /// Hold every reaction write until the test adds permits
    pub fn gated(mut self) -> Self {
        self.gated = true;
        self
    }

    pub fn analytics_rpc(mut self, rpc: Arc<dyn AnalyticsRpc>) -> Self {
        self.analytics_rpc = Some(rpc);
        self
    }

    /// Returns the world and, when gated, the semaphore holding writes
    pub fn build(self) -> (TestWorld, Option<Arc<tokio::sync::Semaphore>>) {
        let store = MemoryStore::new();
        let cache = MemoryGlyphCache::new();

        let community = CommunityId::generate();
        let author = UserId::generate();
        store.add_member(Membership::new(community, author));
        let post = Post::new(community, author, "Welcome to the new intranet", "announcement");
        store.add_post(post.clone());

        let (reactions, gate) = if self.gated {
            let (repo, gate) = FlakyReactionRepository::gated(store.clone());
            (Arc::new(repo), Some(gate))
        } else {
            (Arc::new(FlakyReactionRepository::new(store.clone())), None)
        };
        let glyphs = Arc::new(FlakyGlyphCache::new(cache.clone()));
        let notifier = RecordingNotifier::new();
        let analytics_rpc = self
            .analytics_rpc
            .unwrap_or_else(|| Arc::new(store.clone()) as Arc<dyn AnalyticsRpc>);

        let ctx = ServiceContextBuilder::new()
            .reaction_repo(reactions.clone())
            .post_repo(Arc::new(store.clone()))
            .community_repo(Arc::new(store.clone()))
            .analytics_rpc(analytics_rpc)
            .glyph_cache(glyphs.clone())
            .notifier(notifier.clone())
            .config(self.config)
            .build()
            .expect("test context should build");

        let world = TestWorld {
            store,
            cache,
            reactions,
            glyphs,
            notifier,
            community,
            post,
            ctx,
        };
        (world, gate)
    }
}

impl TestWorld {
    pub fn builder() -> TestWorldBuilder {
        TestWorldBuilder::default()
    }

    /// World with default configuration
    pub fn new() -> Self {
        Self::builder().build().0
    }

    /// A new community member
    pub fn member(&self) -> UserId {
        let user = UserId::generate();
        self.store.add_member(Membership::new(self.community, user));
        user
    }

    /// Controller for `user` on the world's post
    pub fn controller(&self, user: UserId) -> ReactionController {
        ReactionController::new(self.ctx.clone(), self.post.id, user)
    }

    /// Controller for a new member, already loaded from the store
    pub async fn loaded_controller(&self) -> ReactionController {
        let controller = self.controller(self.member());
        controller.load().await.expect("initial load should succeed");
        controller
    }
}

impl Default for TestWorld {
    fn default() -> Self {
        Self::new()
    }
}
