//! Data transfer objects
//!
//! Serializable views of controller state for whatever renders them.

pub mod responses;

pub use responses::{
    ApiResponse, CurrentReactionResponse, ReactionCountResponse, ReactionSummaryResponse,
};
