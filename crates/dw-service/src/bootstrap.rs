//! Startup wiring
//!
//! Turns an [`AppConfig`] into a ready [`ServiceContext`] backed by
//! PostgreSQL and, when configured, Redis.

use std::path::Path;
use std::sync::Arc;

use dw_cache::RedisPool;
use dw_common::{try_init_tracing_with_config, AppConfig, TracingConfig};
use dw_db::{create_pool, run_migrations, PoolConfig};
use tracing::{info, warn};

use crate::services::{Notifier, ServiceContext, ServiceError, ServiceResult};

/// Install the tracing subscriber for the configured environment
///
/// A subscriber that is already installed is left in place.
pub fn init_telemetry(config: &AppConfig) {
    if let Err(e) = try_init_tracing_with_config(TracingConfig::for_environment(config.app.env)) {
        warn!(error = %e, "Tracing already initialized");
    }
}

/// Connect to the backing stores and build the service context
///
/// Migrations under `migrations` are applied before the context is returned.
pub async fn connect(
    config: &AppConfig,
    migrations: Option<&Path>,
    notifier: Arc<dyn Notifier>,
) -> ServiceResult<ServiceContext> {
    info!(app = %config.app.name, env = ?config.app.env, "Connecting to PostgreSQL...");
    let pool = create_pool(&PoolConfig::from(&config.database))
        .await
        .map_err(ServiceError::internal)?;

    if let Some(dir) = migrations {
        run_migrations(&pool, dir).await.map_err(ServiceError::internal)?;
        info!(dir = %dir.display(), "Migrations applied");
    }

    let redis = match &config.redis {
        Some(redis_config) => {
            let redis_pool = RedisPool::from_config(redis_config).map_err(ServiceError::internal)?;
            info!("Glyph cache backed by Redis");
            Some(redis_pool)
        }
        None => {
            info!("REDIS_URL not set, glyph cache stays in-process");
            None
        }
    };

    Ok(ServiceContext::postgres(pool, redis, notifier, config.engagement.clone()))
}
