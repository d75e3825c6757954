//! In-process backend
//!
//! Implements the same ports as the PostgreSQL repositories against a single
//! locked state, including the `(user_id, post_id)` uniqueness of reactions.
//! Used by tests and by local runs without a database.

use std::collections::HashSet;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use parking_lot::RwLock;

use dw_core::analytics::CommunityAnalytics;
use dw_core::entities::{Comment, Membership, Post, ReactionRecord};
use dw_core::error::DomainError;
use dw_core::traits::{
    AnalyticsRpc, CommunityRepository, PostRepository, ReactionRepository, RepoResult,
};
use dw_core::value_objects::{CommunityId, PostId, UserId};

#[derive(Debug, Default)]
struct State {
    posts: Vec<Post>,
    comments: Vec<Comment>,
    members: Vec<Membership>,
    reactions: Vec<ReactionRecord>,
}

/// Shared in-memory store; clones see the same data
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    state: Arc<RwLock<State>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_post(&self, post: Post) {
        self.state.write().posts.push(post);
    }

    /// Remove a post along with its comments and reactions
    pub fn remove_post(&self, post_id: PostId) -> bool {
        let mut state = self.state.write();
        let before = state.posts.len();
        state.posts.retain(|p| p.id != post_id);
        state.comments.retain(|c| c.post_id != post_id);
        state.reactions.retain(|r| r.post_id != post_id);
        state.posts.len() != before
    }

    pub fn add_comment(&self, comment: Comment) {
        self.state.write().comments.push(comment);
    }

    pub fn add_member(&self, membership: Membership) {
        let mut state = self.state.write();
        let duplicate = state
            .members
            .iter()
            .any(|m| m.community_id == membership.community_id && m.user_id == membership.user_id);
        if !duplicate {
            state.members.push(membership);
        }
    }

    /// Seed a reaction row directly, bypassing the insert path
    pub fn seed_reaction(&self, record: ReactionRecord) -> RepoResult<()> {
        let mut state = self.state.write();
        insert_unique(&mut state.reactions, record)
    }

    /// Snapshot of every reaction row
    pub fn reactions(&self) -> Vec<ReactionRecord> {
        self.state.read().reactions.clone()
    }

    fn ensure_post(state: &State, post_id: PostId) -> RepoResult<()> {
        if state.posts.iter().any(|p| p.id == post_id) {
            Ok(())
        } else {
            Err(DomainError::PostNotFound(post_id))
        }
    }
}

fn insert_unique(reactions: &mut Vec<ReactionRecord>, record: ReactionRecord) -> RepoResult<()> {
    if reactions
        .iter()
        .any(|r| r.post_id == record.post_id && r.user_id == record.user_id)
    {
        return Err(DomainError::ReactionAlreadyExists);
    }
    reactions.push(record);
    Ok(())
}

#[async_trait]
impl ReactionRepository for MemoryStore {
    async fn list_by_post(&self, post_id: PostId) -> RepoResult<Vec<ReactionRecord>> {
        let state = self.state.read();
        let mut rows: Vec<ReactionRecord> = state
            .reactions
            .iter()
            .filter(|r| r.post_id == post_id)
            .cloned()
            .collect();
        rows.sort_by_key(|r| r.created_at);
        Ok(rows)
    }

    async fn find(&self, post_id: PostId, user_id: UserId) -> RepoResult<Option<ReactionRecord>> {
        let state = self.state.read();
        Ok(state
            .reactions
            .iter()
            .find(|r| r.post_id == post_id && r.user_id == user_id)
            .cloned())
    }

    async fn insert(&self, record: &ReactionRecord) -> RepoResult<()> {
        let mut state = self.state.write();
        Self::ensure_post(&state, record.post_id)?;
        insert_unique(&mut state.reactions, record.clone())
    }

    async fn upsert(&self, record: &ReactionRecord) -> RepoResult<()> {
        let mut state = self.state.write();
        Self::ensure_post(&state, record.post_id)?;
        match state
            .reactions
            .iter_mut()
            .find(|r| r.post_id == record.post_id && r.user_id == record.user_id)
        {
            Some(existing) => {
                existing.reaction_type = record.reaction_type;
                existing.glyph.clone_from(&record.glyph);
                existing.created_at = record.created_at;
            }
            None => state.reactions.push(record.clone()),
        }
        Ok(())
    }

    async fn delete(&self, post_id: PostId, user_id: UserId) -> RepoResult<bool> {
        let mut state = self.state.write();
        let before = state.reactions.len();
        state
            .reactions
            .retain(|r| !(r.post_id == post_id && r.user_id == user_id));
        Ok(state.reactions.len() != before)
    }
}

#[async_trait]
impl PostRepository for MemoryStore {
    async fn exists(&self, post_id: PostId) -> RepoResult<bool> {
        Ok(self.state.read().posts.iter().any(|p| p.id == post_id))
    }

    async fn find_by_id(&self, post_id: PostId) -> RepoResult<Option<Post>> {
        Ok(self.state.read().posts.iter().find(|p| p.id == post_id).cloned())
    }
}

#[async_trait]
impl CommunityRepository for MemoryStore {
    async fn posts_since(&self, community_id: CommunityId, since: DateTime<Utc>) -> RepoResult<Vec<Post>> {
        let state = self.state.read();
        let mut posts: Vec<Post> = state
            .posts
            .iter()
            .filter(|p| p.community_id == community_id && p.created_at >= since)
            .cloned()
            .collect();
        posts.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(posts)
    }

    async fn comments_for_posts(&self, post_ids: &[PostId]) -> RepoResult<Vec<Comment>> {
        let wanted: HashSet<&PostId> = post_ids.iter().collect();
        let state = self.state.read();
        Ok(state
            .comments
            .iter()
            .filter(|c| wanted.contains(&c.post_id))
            .cloned()
            .collect())
    }

    async fn reactions_for_posts(&self, post_ids: &[PostId]) -> RepoResult<Vec<ReactionRecord>> {
        let wanted: HashSet<&PostId> = post_ids.iter().collect();
        let state = self.state.read();
        Ok(state
            .reactions
            .iter()
            .filter(|r| wanted.contains(&r.post_id))
            .cloned()
            .collect())
    }

    async fn members(&self, community_id: CommunityId) -> RepoResult<Vec<Membership>> {
        let state = self.state.read();
        Ok(state
            .members
            .iter()
            .filter(|m| m.community_id == community_id)
            .cloned()
            .collect())
    }
}

/// The in-process backend has no server-side aggregation
#[async_trait]
impl AnalyticsRpc for MemoryStore {
    async fn community_analytics(
        &self,
        _community_id: CommunityId,
        _days_back: u32,
    ) -> RepoResult<CommunityAnalytics> {
        Err(DomainError::AnalyticsUnavailable(
            "get_community_analytics is not available in memory".to_string(),
        ))
    }
}
