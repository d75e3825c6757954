//! Value objects - immutable types that represent domain concepts

mod ids;
mod reaction_kind;

pub use ids::{CommentId, CommunityId, IdParseError, PostId, ReactionId, UserId};
pub use reaction_kind::{
    glyph_for, kind_for, label_for, ParseReactionKindError, ReactionKind, StoredReactionType,
};
