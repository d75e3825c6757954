//! Community entities - posts, comments and memberships

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::value_objects::{CommentId, CommunityId, PostId, UserId};

/// Community post
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Post {
    pub id: PostId,
    pub community_id: CommunityId,
    pub author_id: UserId,
    pub title: String,
    /// Free-form type tag (`discussion`, `announcement`, `question`, ...)
    pub post_type: String,
    pub view_count: u64,
    pub created_at: DateTime<Utc>,
}

impl Post {
    /// Create a new Post
    pub fn new(
        community_id: CommunityId,
        author_id: UserId,
        title: impl Into<String>,
        post_type: impl Into<String>,
    ) -> Self {
        Self {
            id: PostId::generate(),
            community_id,
            author_id,
            title: title.into(),
            post_type: post_type.into(),
            view_count: 0,
            created_at: Utc::now(),
        }
    }

    /// Naive question detection: the title contains a question mark
    #[inline]
    pub fn is_question(&self) -> bool {
        self.title.contains('?')
    }
}

/// Comment on a post
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Comment {
    pub id: CommentId,
    pub post_id: PostId,
    pub author_id: UserId,
    pub created_at: DateTime<Utc>,
}

impl Comment {
    pub fn new(post_id: PostId, author_id: UserId) -> Self {
        Self {
            id: CommentId::generate(),
            post_id,
            author_id,
            created_at: Utc::now(),
        }
    }
}

/// Community membership
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Membership {
    pub community_id: CommunityId,
    pub user_id: UserId,
    pub joined_at: DateTime<Utc>,
}

impl Membership {
    pub fn new(community_id: CommunityId, user_id: UserId) -> Self {
        Self {
            community_id,
            user_id,
            joined_at: Utc::now(),
        }
    }
}
