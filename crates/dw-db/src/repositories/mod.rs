//! Repository implementations
//!
//! PostgreSQL implementations of the repository traits defined in dw-core.
//! Each repository handles database operations for a specific domain entity.

mod analytics;
mod community;
mod error;
mod post;
mod reaction;

pub use analytics::PgAnalyticsRpc;
pub use community::PgCommunityRepository;
pub use post::PgPostRepository;
pub use reaction::PgReactionRepository;
