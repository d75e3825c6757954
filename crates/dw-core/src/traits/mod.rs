//! Repository traits (ports)

mod repositories;

pub use repositories::{
    AnalyticsRpc, CommunityRepository, GlyphCache, PostRepository, ReactionRepository, RepoResult,
};
