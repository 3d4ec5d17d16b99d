//! Application state

use std::sync::Arc;

use todo_core::cache::Cache;
use todo_core::service::TaskService;
use todo_core::task::{CachedTaskRepository, RepositoryConfig, TaskStore};

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    task_service: TaskService,
    store: Arc<dyn TaskStore>,
    cache: Arc<dyn Cache>,
}

impl AppState {
    /// Wire the repository and service over the given backends
    pub fn new(
        store: Arc<dyn TaskStore>,
        cache: Arc<dyn Cache>,
        config: RepositoryConfig,
    ) -> Self {
        let repo =
            CachedTaskRepository::with_config(Arc::clone(&store), Arc::clone(&cache), config);
        let task_service = TaskService::new(Arc::new(repo));

        Self {
            inner: Arc::new(AppStateInner {
                task_service,
                store,
                cache,
            }),
        }
    }

    /// State over in-process backends
    #[cfg(test)]
    pub fn in_memory() -> Self {
        Self::new(
            Arc::new(todo_core::task::InMemoryTaskStore::new()),
            Arc::new(todo_core::cache::MemoryCache::new()),
            RepositoryConfig::default(),
        )
    }

    pub fn task_service(&self) -> &TaskService {
        &self.inner.task_service
    }

    pub fn store(&self) -> &Arc<dyn TaskStore> {
        &self.inner.store
    }

    pub fn cache(&self) -> &Arc<dyn Cache> {
        &self.inner.cache
    }
}
