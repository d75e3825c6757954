//! Repository traits (ports) - define the interface for data access
//!
//! These traits follow the Repository pattern from Domain-Driven Design.
//! The domain layer defines what it needs, and the infrastructure layer
//! provides the implementation.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::analytics::CommunityAnalytics;
use crate::entities::{Comment, Membership, Post, ReactionRecord};
use crate::error::DomainError;
use crate::value_objects::{CommunityId, PostId, UserId};

/// Result type for repository operations
pub type RepoResult<T> = Result<T, DomainError>;

// ============================================================================
// Reaction Repository
// ============================================================================

/// Remote store of reaction rows, unique on `(user_id, post_id)`
#[async_trait]
pub trait ReactionRepository: Send + Sync {
    /// Get all reactions for a post
    ///
    /// Transport or auth failures surface as `DomainError::ReactionFetch`.
    async fn list_by_post(&self, post_id: PostId) -> RepoResult<Vec<ReactionRecord>>;

    /// Find a member's reaction on a post
    async fn find(&self, post_id: PostId, user_id: UserId) -> RepoResult<Option<ReactionRecord>>;

    /// Insert a reaction
    ///
    /// Fails with `DomainError::ReactionAlreadyExists` if the member already
    /// has a reaction on the post.
    async fn insert(&self, record: &ReactionRecord) -> RepoResult<()>;

    /// Insert or replace the member's reaction on the post
    async fn upsert(&self, record: &ReactionRecord) -> RepoResult<()>;

    /// Remove the member's reaction. Removing a missing row is not an error;
    /// returns whether a row was deleted.
    async fn delete(&self, post_id: PostId, user_id: UserId) -> RepoResult<bool>;
}

// ============================================================================
// Post Repository
// ============================================================================

#[async_trait]
pub trait PostRepository: Send + Sync {
    /// Check that a post still exists
    async fn exists(&self, post_id: PostId) -> RepoResult<bool>;

    /// Find post by ID
    async fn find_by_id(&self, post_id: PostId) -> RepoResult<Option<Post>>;
}

// ============================================================================
// Community Repository
// ============================================================================

/// Raw community activity, read for the client-side analytics fallback
#[async_trait]
pub trait CommunityRepository: Send + Sync {
    /// Posts in a community created at or after `since`, newest first
    async fn posts_since(&self, community_id: CommunityId, since: DateTime<Utc>) -> RepoResult<Vec<Post>>;

    /// Comments on any of the given posts
    async fn comments_for_posts(&self, post_ids: &[PostId]) -> RepoResult<Vec<Comment>>;

    /// Reactions on any of the given posts
    async fn reactions_for_posts(&self, post_ids: &[PostId]) -> RepoResult<Vec<ReactionRecord>>;

    /// All members of a community
    async fn members(&self, community_id: CommunityId) -> RepoResult<Vec<Membership>>;
}

// ============================================================================
// Analytics RPC
// ============================================================================

/// Server-side aggregation endpoint
#[async_trait]
pub trait AnalyticsRpc: Send + Sync {
    /// Pre-aggregated statistics for a community
    ///
    /// Returns `DomainError::AnalyticsUnavailable` when the endpoint is not
    /// deployed; callers fall back to [`CommunityRepository`].
    async fn community_analytics(
        &self,
        community_id: CommunityId,
        days_back: u32,
    ) -> RepoResult<CommunityAnalytics>;
}

// ============================================================================
// Glyph Cache
// ============================================================================

/// Device-local store of the glyph each member last chose per post
///
/// A restoration hint only; the reaction store is authoritative.
#[async_trait]
pub trait GlyphCache: Send + Sync {
    async fn get(&self, post_id: PostId, user_id: UserId) -> RepoResult<Option<String>>;

    async fn set(&self, post_id: PostId, user_id: UserId, glyph: &str) -> RepoResult<()>;

    async fn clear(&self, post_id: PostId, user_id: UserId) -> RepoResult<()>;

    /// Write `glyph`, or clear the entry when `None`
    async fn restore(&self, post_id: PostId, user_id: UserId, glyph: Option<&str>) -> RepoResult<()> {
        match glyph {
            Some(glyph) => self.set(post_id, user_id, glyph).await,
            None => self.clear(post_id, user_id).await,
        }
    }
}
