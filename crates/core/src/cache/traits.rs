//! Cache trait definition

use std::time::Duration;

use async_trait::async_trait;

use super::error::CacheResult;

/// Key-value cache with per-entry expiry
///
/// Values are serialized payloads; callers own the encoding. An absent or
/// expired key is `Ok(None)`, never an error.
#[async_trait]
pub trait Cache: Send + Sync {
    /// Get a value from the cache by key
    async fn get(&self, key: &str) -> CacheResult<Option<String>>;

    /// Set a value in the cache with a TTL
    async fn set(&self, key: &str, value: &str, ttl: Duration) -> CacheResult<()>;

    /// Delete a specific key from the cache
    async fn delete(&self, key: &str) -> CacheResult<()>;

    /// Check if the cache backend is healthy
    async fn health_check(&self) -> CacheResult<bool>;

    /// Get the name of the cache provider
    fn provider_name(&self) -> &'static str;
}
