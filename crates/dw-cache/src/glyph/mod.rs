//! Glyph cache implementations.

mod memory_store;
mod redis_store;

pub use memory_store::MemoryGlyphCache;
pub use redis_store::RedisGlyphCache;
