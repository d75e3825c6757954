//! Domain entities - core business objects

mod community;
mod reaction;

pub use community::{Comment, Membership, Post};
pub use reaction::{AggregateCounts, ReactionRecord, UserSelection};
