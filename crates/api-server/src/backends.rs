//! Backend selection
//!
//! Picks the task store and cache from [`Config`]. The store is required;
//! the cache is optional and falls back to [`NoOpCache`].

use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;

use todo_core::cache::{redact_url, Cache, MemoryCache, NoOpCache, RedisCache};
use todo_core::task::{InMemoryTaskStore, PgStoreConfig, PgTaskStore, TaskStore};

use crate::config::{Config, MEMORY_URL};

pub const REDIS_CONNECT_TIMEOUT: Duration = Duration::from_secs(3);

/// The store is required; failing to reach it aborts startup.
///
/// The concrete [`PgTaskStore`] is returned alongside so the pool can be
/// closed on shutdown.
pub async fn connect_store(
    config: &Config,
) -> anyhow::Result<(Arc<dyn TaskStore>, Option<PgTaskStore>)> {
    if config.uses_memory_store() {
        tracing::warn!("Using in-memory task store, data will not survive a restart");
        return Ok((Arc::new(InMemoryTaskStore::new()), None));
    }

    let pg_config = PgStoreConfig {
        max_connections: config.db_max_connections,
        ..PgStoreConfig::new(&config.database_url)
    };
    let pg_store = PgTaskStore::connect(&pg_config)
        .await
        .context("Failed to connect to postgres")?;
    pg_store
        .ensure_schema()
        .await
        .context("Failed to prepare tasks table")?;

    Ok((Arc::new(pg_store.clone()), Some(pg_store)))
}

/// The cache is optional; any failure falls back to no caching
pub async fn connect_cache(config: &Config, connect_timeout: Duration) -> Arc<dyn Cache> {
    match config.redis_url.as_deref() {
        None => {
            tracing::warn!("REDIS_URL not set, caching disabled");
            Arc::new(NoOpCache::new())
        }
        Some(MEMORY_URL) => {
            tracing::info!("Using in-process cache");
            Arc::new(MemoryCache::new())
        }
        Some(url) => match RedisCache::connect(url, connect_timeout).await {
            Ok(cache) => {
                tracing::info!(url = %redact_url(url), "Connected to redis");
                Arc::new(cache)
            }
            Err(e) => {
                tracing::warn!(
                    url = %redact_url(url),
                    error = %e,
                    "Redis unavailable, continuing without cache"
                );
                Arc::new(NoOpCache::new())
            }
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // Nothing listens on port 1
    const DEAD_REDIS_URL: &str = "redis://127.0.0.1:1";
    const SHORT_TIMEOUT: Duration = Duration::from_millis(500);

    fn config_with_redis(redis_url: Option<&str>) -> Config {
        Config::from_lookup(|name| match name {
            "DATABASE_URL" => Some(MEMORY_URL.to_string()),
            "REDIS_URL" => redis_url.map(str::to_string),
            _ => None,
        })
        .unwrap()
    }

    #[tokio::test]
    async fn test_dead_redis_fails_to_connect() {
        let result = RedisCache::connect(DEAD_REDIS_URL, SHORT_TIMEOUT).await;
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn test_dead_redis_falls_back_to_noop() {
        let cache = connect_cache(&config_with_redis(Some(DEAD_REDIS_URL)), SHORT_TIMEOUT).await;
        assert_eq!(cache.provider_name(), "noop");
    }

    #[tokio::test]
    async fn test_unset_redis_url_disables_cache() {
        let cache = connect_cache(&config_with_redis(None), SHORT_TIMEOUT).await;
        assert_eq!(cache.provider_name(), "noop");
    }

    #[tokio::test]
    async fn test_memory_url_selects_in_process_cache() {
        let cache = connect_cache(&config_with_redis(Some(MEMORY_URL)), SHORT_TIMEOUT).await;
        assert_eq!(cache.provider_name(), "memory");
    }

    #[tokio::test]
    async fn test_memory_url_selects_in_process_store() {
        let (store, pg_store) = connect_store(&config_with_redis(None)).await.unwrap();
        assert!(pg_store.is_none());
        assert!(store.health_check().await.unwrap());
    }
}
