//! Entity to model mappers
//!
//! This module provides conversions between domain entities (dw-core) and database models.
//! - `From<Model> for Entity` / `TryFrom`: Convert database rows to domain objects
//! - `*Insert` structs: Prepare entity data for database operations

mod community;
mod reaction;

pub use reaction::{records_from_models, ReactionInsert};
