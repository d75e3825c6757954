//! Community analytics rollups
//!
//! The report shape is shared by the server-side RPC and the client-side
//! fallback; [`CommunityActivity::summarize`] is the fallback's in-memory join.

use std::collections::{BTreeMap, HashMap, HashSet};

use serde::{Deserialize, Serialize};

use crate::entities::{Comment, Membership, Post, ReactionRecord};
use crate::value_objects::{PostId, UserId};

/// Maximum number of top conversations in a report
pub const DEFAULT_TOP_CONVERSATIONS: usize = 10;

/// Engagement statistics for one community over a time window
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommunityAnalytics {
    pub total_members: u64,
    pub engaged_members: u64,
    pub total_posts: u64,
    pub posts_by_type: BTreeMap<String, u64>,
    pub total_views: u64,
    pub total_reactions: u64,
    pub total_comments: u64,
    pub questions_asked: u64,
    pub questions_answered: u64,
    #[serde(default)]
    pub funnel: EngagementFunnel,
    pub top_conversations: Vec<TopConversation>,
}

/// Distinct members reaching each engagement stage
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EngagementFunnel {
    pub members: u64,
    pub reacted: u64,
    pub commented: u64,
    pub posted: u64,
}

/// A post ranked by activity
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TopConversation {
    pub post_id: PostId,
    pub title: String,
    pub post_type: String,
    pub reactions: u64,
    pub comments: u64,
}

impl TopConversation {
    /// Ranking score
    #[inline]
    pub fn score(&self) -> u64 {
        self.reactions + self.comments
    }
}

/// Sort by `reactions + comments` descending and keep the first `limit`
///
/// The sort is stable, so ties keep their incoming order.
pub fn rank_top_conversations(mut items: Vec<TopConversation>, limit: usize) -> Vec<TopConversation> {
    items.sort_by(|a, b| b.score().cmp(&a.score()));
    items.truncate(limit);
    items
}

/// Raw rows fetched separately for the client-side join
#[derive(Debug, Clone, Default)]
pub struct CommunityActivity {
    pub members: Vec<Membership>,
    /// Newest first
    pub posts: Vec<Post>,
    pub comments: Vec<Comment>,
    pub reactions: Vec<ReactionRecord>,
}

impl CommunityActivity {
    /// Join the rows into a report
    pub fn summarize(&self, top_limit: usize) -> CommunityAnalytics {
        let post_ids: HashSet<PostId> = self.posts.iter().map(|p| p.id).collect();

        let mut reactions_per_post: HashMap<PostId, u64> = HashMap::new();
        let mut reactors: HashSet<UserId> = HashSet::new();
        let mut total_reactions = 0;
        for reaction in self.reactions.iter().filter(|r| post_ids.contains(&r.post_id)) {
            *reactions_per_post.entry(reaction.post_id).or_default() += 1;
            reactors.insert(reaction.user_id);
            total_reactions += 1;
        }

        let mut comments_per_post: HashMap<PostId, u64> = HashMap::new();
        let mut commenters: HashSet<UserId> = HashSet::new();
        let mut total_comments = 0;
        for comment in self.comments.iter().filter(|c| post_ids.contains(&c.post_id)) {
            *comments_per_post.entry(comment.post_id).or_default() += 1;
            commenters.insert(comment.author_id);
            total_comments += 1;
        }

        let posters: HashSet<UserId> = self.posts.iter().map(|p| p.author_id).collect();
        let members: HashSet<UserId> = self.members.iter().map(|m| m.user_id).collect();

        let count_members = |users: &HashSet<UserId>| users.intersection(&members).count() as u64;
        let engaged: HashSet<UserId> = reactors
            .iter()
            .chain(commenters.iter())
            .chain(posters.iter())
            .copied()
            .collect();

        let mut posts_by_type: BTreeMap<String, u64> = BTreeMap::new();
        let mut questions_asked = 0;
        let mut questions_answered = 0;
        let mut conversations = Vec::with_capacity(self.posts.len());

        for post in &self.posts {
            *posts_by_type.entry(post.post_type.clone()).or_default() += 1;

            let comments = comments_per_post.get(&post.id).copied().unwrap_or(0);
            if post.is_question() {
                questions_asked += 1;
                if comments > 0 {
                    questions_answered += 1;
                }
            }

            conversations.push(TopConversation {
                post_id: post.id,
                title: post.title.clone(),
                post_type: post.post_type.clone(),
                reactions: reactions_per_post.get(&post.id).copied().unwrap_or(0),
                comments,
            });
        }

        CommunityAnalytics {
            total_members: members.len() as u64,
            engaged_members: count_members(&engaged),
            total_posts: self.posts.len() as u64,
            posts_by_type,
            total_views: self.posts.iter().map(|p| p.view_count).sum(),
            total_reactions,
            total_comments,
            questions_asked,
            questions_answered,
            funnel: EngagementFunnel {
                members: members.len() as u64,
                reacted: count_members(&reactors),
                commented: count_members(&commenters),
                posted: count_members(&posters),
            },
            top_conversations: rank_top_conversations(conversations, top_limit),
        }
    }
}
