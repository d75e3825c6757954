//! Post, comment and membership entity <-> model mappers

use dw_core::entities::{Comment, Membership, Post};
use dw_core::value_objects::{CommentId, CommunityId, PostId, UserId};

use crate::models::{CommentModel, MembershipModel, PostModel};

/// Convert PostModel to Post entity
impl From<PostModel> for Post {
    fn from(model: PostModel) -> Self {
        Post {
            id: PostId::new(model.id),
            community_id: CommunityId::new(model.community_id),
            author_id: UserId::new(model.author_id),
            title: model.title,
            post_type: model.post_type,
            view_count: u64::try_from(model.view_count).unwrap_or(0),
            created_at: model.created_at,
        }
    }
}

/// Convert CommentModel to Comment entity
impl From<CommentModel> for Comment {
    fn from(model: CommentModel) -> Self {
        Comment {
            id: CommentId::new(model.id),
            post_id: PostId::new(model.post_id),
            author_id: UserId::new(model.author_id),
            created_at: model.created_at,
        }
    }
}

/// Convert MembershipModel to Membership entity
impl From<MembershipModel> for Membership {
    fn from(model: MembershipModel) -> Self {
        Membership {
            community_id: CommunityId::new(model.community_id),
            user_id: UserId::new(model.user_id),
            joined_at: model.joined_at,
        }
    }
}
