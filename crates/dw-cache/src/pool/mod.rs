//! Redis connection pool module.
//!
//! Provides connection pooling for Redis using deadpool-redis.

mod redis_pool;

pub use redis_pool::{glyph_key, CachedGlyph, RedisPool, RedisPoolConfig, RedisPoolError, RedisResult};
