//! # dw-core
//!
//! Domain layer for Digital Workspace community engagement: the reaction
//! catalog, reaction and community entities, the engagement state machine,
//! analytics rollups, domain events and repository traits.
//! This crate has zero dependencies on infrastructure (database, cache, etc.).

pub mod analytics;
pub mod engagement;
pub mod entities;
pub mod error;
pub mod events;
pub mod traits;
pub mod value_objects;

// Re-export commonly used types at crate root
pub use analytics::{
    rank_top_conversations, CommunityActivity, CommunityAnalytics, EngagementFunnel,
    TopConversation, DEFAULT_TOP_CONVERSATIONS,
};
pub use engagement::{EngagementState, ReactionIntent, ReactionPhase, Transition, WriteOp};
pub use entities::{AggregateCounts, Comment, Membership, Post, ReactionRecord, UserSelection};
pub use error::DomainError;
pub use events::DomainEvent;
pub use traits::{
    AnalyticsRpc, CommunityRepository, GlyphCache, PostRepository, ReactionRepository, RepoResult,
};
pub use value_objects::{
    glyph_for, kind_for, label_for, CommentId, CommunityId, IdParseError, PostId, ReactionId,
    ReactionKind, StoredReactionType, UserId,
};
