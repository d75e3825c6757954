//! Database models - SQLx-compatible structs for PostgreSQL tables

mod community;
mod reaction;

pub use community::{CommentModel, MembershipModel, PostModel};
pub use reaction::ReactionModel;
