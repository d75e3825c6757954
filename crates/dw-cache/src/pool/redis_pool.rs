//! Pooled Redis connections for the glyph cache.
//!
//! Each `(post, member)` pair owns one key, `glyph:{post_id}:{user_id}`,
//! holding a JSON [`CachedGlyph`]. The pool knows that layout so callers
//! deal in ids and glyphs, never in raw keys or strings.

use chrono::Utc;
use deadpool_redis::{Config, Connection, Pool, Runtime};
use redis::AsyncCommands;
use serde::{Deserialize, Serialize};

use dw_core::error::DomainError;
use dw_core::value_objects::{PostId, UserId};

/// Key prefix for cached glyphs
const GLYPH_PREFIX: &str = "glyph:";

/// Redis pool configuration
#[derive(Debug, Clone)]
pub struct RedisPoolConfig {
    /// Redis connection URL (e.g., `redis://localhost:6379`)
    pub url: String,
    pub max_connections: usize,
    /// Expiry for glyph entries; `None` keeps them until overwritten
    pub glyph_ttl_seconds: Option<u64>,
}

impl From<&dw_common::RedisConfig> for RedisPoolConfig {
    fn from(config: &dw_common::RedisConfig) -> Self {
        Self {
            url: config.url.clone(),
            max_connections: config.max_connections as usize,
            glyph_ttl_seconds: config.glyph_ttl_seconds,
        }
    }
}

/// Error type for glyph cache traffic
#[derive(Debug, thiserror::Error)]
pub enum RedisPoolError {
    #[error("Failed to create Redis pool: {0}")]
    Build(String),

    #[error("No Redis connection available: {0}")]
    Checkout(#[from] deadpool_redis::PoolError),

    #[error("Redis command error: {0}")]
    Command(#[from] redis::RedisError),

    #[error("Unreadable glyph entry at {key}: {source}")]
    Entry {
        key: String,
        #[source]
        source: serde_json::Error,
    },
}

impl From<RedisPoolError> for DomainError {
    fn from(err: RedisPoolError) -> Self {
        DomainError::CacheError(err.to_string())
    }
}

/// Result type for Redis pool operations
pub type RedisResult<T> = Result<T, RedisPoolError>;

/// Stored glyph entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CachedGlyph {
    pub glyph: String,
    /// Unix epoch seconds
    pub cached_at: i64,
}

impl CachedGlyph {
    #[must_use]
    pub fn new(glyph: impl Into<String>) -> Self {
        Self {
            glyph: glyph.into(),
            cached_at: Utc::now().timestamp(),
        }
    }

    fn encode(&self, key: &str) -> RedisResult<String> {
        serde_json::to_string(self).map_err(|source| RedisPoolError::Entry {
            key: key.to_string(),
            source,
        })
    }

    fn decode(key: &str, raw: &str) -> RedisResult<Self> {
        serde_json::from_str(raw).map_err(|source| RedisPoolError::Entry {
            key: key.to_string(),
            source,
        })
    }
}

/// Redis key holding the glyph `user_id` last chose on `post_id`
#[must_use]
pub fn glyph_key(post_id: PostId, user_id: UserId) -> String {
    format!("{GLYPH_PREFIX}{post_id}:{user_id}")
}

/// Host part of a Redis URL, credentials dropped
fn redact(url: &str) -> &str {
    url.rsplit('@').next().unwrap_or(url)
}

/// Managed Redis connection pool
#[derive(Clone)]
pub struct RedisPool {
    pool: Pool,
    glyph_ttl_seconds: Option<u64>,
}

impl std::fmt::Debug for RedisPool {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RedisPool")
            .field("status", &self.pool.status())
            .field("glyph_ttl_seconds", &self.glyph_ttl_seconds)
            .finish()
    }
}

impl RedisPool {
    pub fn new(config: RedisPoolConfig) -> RedisResult<Self> {
        let pool = Config::from_url(&config.url)
            .builder()
            .map_err(|e| RedisPoolError::Build(e.to_string()))?
            .max_size(config.max_connections)
            .runtime(Runtime::Tokio1)
            .build()
            .map_err(|e| RedisPoolError::Build(e.to_string()))?;

        tracing::info!(
            url = %redact(&config.url),
            max_connections = config.max_connections,
            glyph_ttl_seconds = ?config.glyph_ttl_seconds,
            "Redis pool created"
        );

        Ok(Self {
            pool,
            glyph_ttl_seconds: config.glyph_ttl_seconds,
        })
    }

    pub fn from_config(config: &dw_common::RedisConfig) -> RedisResult<Self> {
        Self::new(RedisPoolConfig::from(config))
    }

    pub fn glyph_ttl_seconds(&self) -> Option<u64> {
        self.glyph_ttl_seconds
    }

    async fn checkout(&self) -> RedisResult<Connection> {
        Ok(self.pool.get().await?)
    }

    /// Round trip to the server
    pub async fn ping(&self) -> RedisResult<()> {
        let mut conn = self.checkout().await?;
        redis::cmd("PING").query_async::<String>(&mut conn).await?;
        Ok(())
    }

    pub async fn read_glyph(&self, post_id: PostId, user_id: UserId) -> RedisResult<Option<CachedGlyph>> {
        let key = glyph_key(post_id, user_id);
        let mut conn = self.checkout().await?;
        let raw: Option<String> = conn.get(&key).await?;
        raw.map(|raw| CachedGlyph::decode(&key, &raw)).transpose()
    }

    /// Overwrite the pair's entry, applying the configured TTL
    pub async fn write_glyph(&self, post_id: PostId, user_id: UserId, entry: &CachedGlyph) -> RedisResult<()> {
        let key = glyph_key(post_id, user_id);
        let payload = entry.encode(&key)?;
        let mut conn = self.checkout().await?;

        match self.glyph_ttl_seconds {
            Some(ttl) => conn.set_ex::<_, _, ()>(&key, payload, ttl).await?,
            None => conn.set::<_, _, ()>(&key, payload).await?,
        }
        Ok(())
    }

    /// Returns whether an entry existed
    pub async fn drop_glyph(&self, post_id: PostId, user_id: UserId) -> RedisResult<bool> {
        let mut conn = self.checkout().await?;
        let deleted: i32 = conn.del(glyph_key(post_id, user_id)).await?;
        Ok(deleted > 0)
    }
}
