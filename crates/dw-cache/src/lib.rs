//! # dw-cache
//!
//! Glyph cache: remembers the glyph each member last chose on each post so
//! the reaction bar can show it before the reaction store answers.
//!
//! ## Features
//!
//! - **Connection Pool**: deadpool-managed Redis pool that owns the
//!   `glyph:{post_id}:{user_id}` key layout and entry TTL
//! - **Redis store**: `GlyphCache` over the pool
//! - **Memory store**: DashMap-backed cache for single-process use
//!
//! ## Example
//!
//! ```ignore
//! use dw_cache::{RedisGlyphCache, RedisPool};
//!
//! let pool = RedisPool::from_config(&redis_config)?;
//! let cache = RedisGlyphCache::new(pool);
//! cache.set(post_id, user_id, "🎉").await?;
//! ```

pub mod glyph;
pub mod pool;

pub use glyph::{MemoryGlyphCache, RedisGlyphCache};
pub use pool::{glyph_key, CachedGlyph, RedisPool, RedisPoolConfig, RedisPoolError, RedisResult};
