//! In-process cache provider using Moka
//!
//! Bounded by entry count. Every entry carries the TTL it was written with;
//! moka's housekeeper drops expired entries in the background.

use std::time::{Duration, Instant};

use async_trait::async_trait;
use moka::Expiry;
use tracing::debug;

use super::error::CacheResult;
use super::traits::Cache;

/// Default number of entries held before the least useful ones are evicted
pub const DEFAULT_MAX_CAPACITY: u64 = 10_000;

/// Longest lifetime an entry may be given; larger TTLs are clamped
pub const MAX_ENTRY_TTL: Duration = Duration::from_secs(30 * 24 * 60 * 60);

#[derive(Debug, Clone)]
struct Entry {
    value: String,
    ttl: Duration,
}

/// Expires each entry after the TTL it was last written with
struct PerEntryTtl;

impl Expiry<String, Entry> for PerEntryTtl {
    fn expire_after_create(
        &self,
        _key: &String,
        entry: &Entry,
        _created_at: Instant,
    ) -> Option<Duration> {
        Some(entry.ttl)
    }

    fn expire_after_update(
        &self,
        _key: &String,
        entry: &Entry,
        _updated_at: Instant,
        _duration_until_expiry: Option<Duration>,
    ) -> Option<Duration> {
        Some(entry.ttl)
    }
}

#[derive(Clone)]
pub struct MemoryCache {
    cache: moka::future::Cache<String, Entry>,
}

impl std::fmt::Debug for MemoryCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MemoryCache")
            .field("max_capacity", &self.cache.policy().max_capacity())
            .field("entry_count", &self.cache.entry_count())
            .finish()
    }
}

impl Default for MemoryCache {
    fn default() -> Self {
        Self::with_capacity(DEFAULT_MAX_CAPACITY)
    }
}

impl MemoryCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(max_capacity: u64) -> Self {
        let cache = moka::future::Cache::builder()
            .max_capacity(max_capacity)
            .expire_after(PerEntryTtl)
            .build();

        debug!(max_capacity = max_capacity, "Moka in-memory cache created");

        Self { cache }
    }

    /// Whether a live entry exists for the key
    pub fn contains_key(&self, key: &str) -> bool {
        self.cache.contains_key(key)
    }

    /// Number of entries held once pending evictions have run
    pub async fn entry_count(&self) -> u64 {
        self.cache.run_pending_tasks().await;
        self.cache.entry_count()
    }
}

#[async_trait]
impl Cache for MemoryCache {
    async fn get(&self, key: &str) -> CacheResult<Option<String>> {
        let result = self.cache.get(key).await.map(|entry| entry.value);

        if result.is_some() {
            debug!(key = key, "Cache HIT (moka)");
        } else {
            debug!(key = key, "Cache MISS (moka)");
        }

        Ok(result)
    }

    async fn set(&self, key: &str, value: &str, ttl: Duration) -> CacheResult<()> {
        let ttl = ttl.min(MAX_ENTRY_TTL);
        self.cache
            .insert(
                key.to_string(),
                Entry {
                    value: value.to_string(),
                    ttl,
                },
            )
            .await;

        debug!(key = key, ttl_ms = ttl.as_millis() as u64, "Cache SET (moka)");
        Ok(())
    }

    async fn delete(&self, key: &str) -> CacheResult<()> {
        self.cache.invalidate(key).await;
        debug!(key = key, "Cache DEL (moka)");
        Ok(())
    }

    async fn health_check(&self) -> CacheResult<bool> {
        Ok(true)
    }

    fn provider_name(&self) -> &'static str {
        "memory"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_set_then_get() {
        let cache = MemoryCache::new();
        cache
            .set("task:1", r#"{"id":1}"#, Duration::from_secs(60))
            .await
            .unwrap();

        assert_eq!(
            cache.get("task:1").await.unwrap().as_deref(),
            Some(r#"{"id":1}"#)
        );
        assert!(cache.contains_key("task:1"));
    }

    #[tokio::test]
    async fn test_missing_key_is_none() {
        let cache = MemoryCache::new();
        assert_eq!(cache.get("absent").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_expired_entry_is_miss() {
        let cache = MemoryCache::new();
        cache
            .set("tasks:all", "[]", Duration::from_millis(20))
            .await
            .unwrap();

        tokio::time::sleep(Duration::from_millis(50)).await;

        assert_eq!(cache.get("tasks:all").await.unwrap(), None);
        assert!(!cache.contains_key("tasks:all"));
    }

    #[tokio::test]
    async fn test_expired_entries_are_reclaimed_without_reads() {
        let cache = MemoryCache::new();
        for id in 0..1000 {
            cache
                .set(&format!("task:{}", id), "{}", Duration::from_millis(1))
                .await
                .unwrap();
        }

        tokio::time::sleep(Duration::from_millis(20)).await;
        cache
            .set("task:live", "{}", Duration::from_secs(60))
            .await
            .unwrap();

        assert_eq!(cache.entry_count().await, 1);
    }

    #[tokio::test]
    async fn test_capacity_bounds_entry_count() {
        let cache = MemoryCache::with_capacity(10);
        for id in 0..100 {
            cache
                .set(&format!("task:{}", id), "{}", Duration::from_secs(60))
                .await
                .unwrap();
        }

        assert!(cache.entry_count().await <= 10);
    }

    #[tokio::test]
    async fn test_huge_ttl_is_clamped_not_a_panic() {
        let cache = MemoryCache::new();
        cache
            .set("task:1", "{}", Duration::from_secs(u64::MAX))
            .await
            .unwrap();

        assert_eq!(cache.get("task:1").await.unwrap().as_deref(), Some("{}"));
    }

    #[tokio::test]
    async fn test_delete_only_removes_named_key() {
        let cache = MemoryCache::new();
        let ttl = Duration::from_secs(60);
        cache.set("task:1", "a", ttl).await.unwrap();
        cache.set("task:2", "b", ttl).await.unwrap();

        cache.delete("task:1").await.unwrap();
        // Deleting an absent key is not an error
        cache.delete("task:9").await.unwrap();

        assert!(!cache.contains_key("task:1"));
        assert!(cache.contains_key("task:2"));
        assert_eq!(cache.entry_count().await, 1);
    }

    #[tokio::test]
    async fn test_set_overwrites_and_refreshes_ttl() {
        let cache = MemoryCache::new();
        cache.set("k", "old", Duration::from_millis(10)).await.unwrap();
        cache.set("k", "new", Duration::from_secs(60)).await.unwrap();

        tokio::time::sleep(Duration::from_millis(30)).await;
        assert_eq!(cache.get("k").await.unwrap().as_deref(), Some("new"));
    }
}
