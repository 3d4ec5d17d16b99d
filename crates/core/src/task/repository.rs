//! Cache-aside task repository
//!
//! Reads try the cache first and fall back to the store, populating the cache
//! on the way out. Writes go to the store first and only then invalidate the
//! affected cache keys. Cache failures are logged and never reach the caller.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{debug, warn};

use super::model::{NewTask, Task};
use super::store::TaskStore;
use crate::cache::{keys, Cache, CacheError, CacheResult};
use crate::{Error, Result};

/// Repository interface for task CRUD operations
#[async_trait]
pub trait TaskRepository: Send + Sync {
    /// Persist a new task and return it with its assigned id
    async fn create_task(&self, task: NewTask) -> Result<Task>;

    /// Get all tasks
    async fn get_tasks(&self) -> Result<Vec<Task>>;

    /// Get a task by ID
    async fn get_task_by_id(&self, id: i64) -> Result<Task>;

    /// Rewrite an existing task
    async fn update_task(&self, task: &Task) -> Result<()>;

    /// Delete a task by ID
    async fn delete_task(&self, id: i64) -> Result<()>;
}

/// Timing policy for [`CachedTaskRepository`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RepositoryConfig {
    /// Lifetime of every cache entry the repository writes
    pub cache_ttl: Duration,
    /// Deadline for a single store call
    pub store_timeout: Duration,
    /// Deadline for a single cache call
    pub cache_timeout: Duration,
}

impl Default for RepositoryConfig {
    fn default() -> Self {
        Self {
            cache_ttl: Duration::from_secs(300),
            store_timeout: Duration::from_secs(5),
            cache_timeout: Duration::from_millis(500),
        }
    }
}

/// Task repository that fronts a [`TaskStore`] with a [`Cache`]
pub struct CachedTaskRepository {
    store: Arc<dyn TaskStore>,
    cache: Arc<dyn Cache>,
    config: RepositoryConfig,
}

impl CachedTaskRepository {
    pub fn new(store: Arc<dyn TaskStore>, cache: Arc<dyn Cache>) -> Self {
        Self::with_config(store, cache, RepositoryConfig::default())
    }

    pub fn with_config(
        store: Arc<dyn TaskStore>,
        cache: Arc<dyn Cache>,
        config: RepositoryConfig,
    ) -> Self {
        Self {
            store,
            cache,
            config,
        }
    }

    /// Run a store call under the store deadline
    async fn store_call<T, F>(&self, op: &'static str, call: F) -> Result<T>
    where
        F: Future<Output = Result<T>> + Send,
    {
        tokio::time::timeout(self.config.store_timeout, call)
            .await
            .map_err(|_| {
                Error::Timeout(format!(
                    "store {} exceeded {}ms",
                    op,
                    self.config.store_timeout.as_millis()
                ))
            })?
    }

    /// Run a cache call under the cache deadline
    async fn cache_call<T, F>(&self, op: &'static str, call: F) -> CacheResult<T>
    where
        F: Future<Output = CacheResult<T>> + Send,
    {
        tokio::time::timeout(self.config.cache_timeout, call)
            .await
            .map_err(|_| {
                CacheError::Timeout(format!(
                    "cache {} exceeded {}ms",
                    op,
                    self.config.cache_timeout.as_millis()
                ))
            })?
    }

    /// Look a key up in the cache. Errors and undecodable payloads count as a miss.
    async fn read_cached<T: DeserializeOwned + Send>(&self, key: &str) -> Option<T> {
        let payload = match self.cache_call("get", self.cache.get(key)).await {
            Ok(Some(payload)) => payload,
            Ok(None) => return None,
            Err(e) => {
                warn!(key = key, error = %e, "cache read failed, falling back to store");
                return None;
            }
        };

        match serde_json::from_str(&payload) {
            Ok(value) => {
                debug!(key = key, "served from cache");
                Some(value)
            }
            Err(e) => {
                warn!(key = key, error = %e, "discarding undecodable cache entry");
                self.invalidate(key).await;
                None
            }
        }
    }

    /// Best-effort cache fill after a successful store read
    async fn populate<T: Serialize + Sync>(&self, key: &str, value: &T) {
        let result = match serde_json::to_string(value) {
            Ok(payload) => {
                self.cache_call("set", self.cache.set(key, &payload, self.config.cache_ttl))
                    .await
            }
            Err(e) => Err(CacheError::from(e)),
        };

        if let Err(e) = result {
            warn!(key = key, error = %e, "failed to cache value");
        }
    }

    /// Best-effort removal of a key after a successful store mutation
    async fn invalidate(&self, key: &str) {
        if let Err(e) = self.cache_call("delete", self.cache.delete(key)).await {
            warn!(key = key, error = %e, "failed to invalidate cache entry");
        }
    }
}

#[async_trait]
impl TaskRepository for CachedTaskRepository {
    async fn create_task(&self, task: NewTask) -> Result<Task> {
        let created = self.store_call("create", self.store.create(task)).await?;

        // No item key exists yet, only the list is stale.
        self.invalidate(keys::all_tasks()).await;

        Ok(created)
    }

    async fn get_tasks(&self) -> Result<Vec<Task>> {
        let key = keys::all_tasks();
        if let Some(tasks) = self.read_cached::<Vec<Task>>(key).await {
            return Ok(tasks);
        }

        let tasks = self.store_call("list", self.store.list()).await?;
        self.populate(key, &tasks).await;

        Ok(tasks)
    }

    async fn get_task_by_id(&self, id: i64) -> Result<Task> {
        let key = keys::task(id);
        if let Some(task) = self.read_cached::<Task>(&key).await {
            return Ok(task);
        }

        let task = self.store_call("get", self.store.get(id)).await?;
        self.populate(&key, &task).await;

        Ok(task)
    }

    async fn update_task(&self, task: &Task) -> Result<()> {
        self.store_call("update", self.store.update(task)).await?;

        self.invalidate(&keys::task(task.id)).await;
        self.invalidate(keys::all_tasks()).await;

        Ok(())
    }

    async fn delete_task(&self, id: i64) -> Result<()> {
        self.store_call("delete", self.store.delete(id)).await?;

        self.invalidate(&keys::task(id)).await;
        self.invalidate(keys::all_tasks()).await;

        Ok(())
    }
}
