//! No-op cache provider
//!
//! Always misses, all writes succeed. Used when caching is disabled or
//! when Redis is unavailable at startup.

use std::time::Duration;

use async_trait::async_trait;

use super::error::CacheResult;
use super::traits::Cache;

#[derive(Debug, Clone, Default)]
pub struct NoOpCache;

impl NoOpCache {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl Cache for NoOpCache {
    async fn get(&self, _key: &str) -> CacheResult<Option<String>> {
        Ok(None)
    }

    async fn set(&self, _key: &str, _value: &str, _ttl: Duration) -> CacheResult<()> {
        Ok(())
    }

    async fn delete(&self, _key: &str) -> CacheResult<()> {
        Ok(())
    }

    async fn health_check(&self) -> CacheResult<bool> {
        Ok(true)
    }

    fn provider_name(&self) -> &'static str {
        "noop"
    }
}
