//! # dw-db
//!
//! Database layer implementing the dw-core ports with PostgreSQL via SQLx.
//!
//! ## Overview
//!
//! This crate provides:
//!
//! - Connection pool management and migrations
//! - Database models with SQLx `FromRow` derives
//! - Entity ↔ Model mappers
//! - PostgreSQL repositories for reactions, posts and community activity
//! - The `get_community_analytics` RPC client
//! - [`MemoryStore`], an in-process backend with the same constraints
//!
//! ## Usage
//!
//! ```rust,ignore
//! use dw_db::{create_pool, PgReactionRepository, PoolConfig};
//! use dw_core::traits::ReactionRepository;
//!
//! async fn example(config: &dw_common::AppConfig) -> Result<(), Box<dyn std::error::Error>> {
//!     let pool = create_pool(&PoolConfig::from(&config.database)).await?;
//!     let reactions = PgReactionRepository::new(pool);
//!
//!     // Use the repository...
//!     Ok(())
//! }
//! ```

pub mod mappers;
pub mod memory;
pub mod models;
pub mod pool;
pub mod repositories;

// Re-export commonly used types
pub use memory::MemoryStore;
pub use pool::{create_pool, run_migrations, PgPool, PoolConfig};
pub use repositories::{
    PgAnalyticsRpc, PgCommunityRepository, PgPostRepository, PgReactionRepository,
};
