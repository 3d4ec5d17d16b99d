//! In-memory task storage implementation
//!
//! Keeps tasks in a map guarded by an async lock. Nothing survives a restart.

use std::collections::BTreeMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use super::model::{NewTask, Task};
use super::store::TaskStore;
use crate::{Error, Result};

#[derive(Default)]
struct Inner {
    next_id: i64,
    tasks: BTreeMap<i64, Task>,
}

/// Task store backed by process memory
#[derive(Default)]
pub struct InMemoryTaskStore {
    inner: RwLock<Inner>,
}

impl InMemoryTaskStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl TaskStore for InMemoryTaskStore {
    async fn create(&self, task: NewTask) -> Result<Task> {
        let mut inner = self.inner.write().await;
        inner.next_id += 1;
        let task = task.with_id(inner.next_id);
        inner.tasks.insert(task.id, task.clone());
        Ok(task)
    }

    async fn list(&self) -> Result<Vec<Task>> {
        let inner = self.inner.read().await;
        Ok(inner.tasks.values().cloned().collect())
    }

    async fn get(&self, id: i64) -> Result<Task> {
        let inner = self.inner.read().await;
        inner.tasks.get(&id).cloned().ok_or(Error::TaskNotFound(id))
    }

    async fn update(&self, task: &Task) -> Result<()> {
        let mut inner = self.inner.write().await;
        match inner.tasks.get_mut(&task.id) {
            Some(existing) => {
                *existing = task.clone();
                Ok(())
            }
            None => Err(Error::TaskNotFound(task.id)),
        }
    }

    async fn delete(&self, id: i64) -> Result<()> {
        let mut inner = self.inner.write().await;
        inner
            .tasks
            .remove(&id)
            .map(|_| ())
            .ok_or(Error::TaskNotFound(id))
    }

    async fn health_check(&self) -> Result<bool> {
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_create_assigns_increasing_ids() {
        let store = InMemoryTaskStore::new();

        let first = store.create(NewTask::new("Task 1")).await.unwrap();
        let second = store.create(NewTask::new("Task 2")).await.unwrap();

        assert_eq!(first.id, 1);
        assert_eq!(second.id, 2);
        assert!(!second.completed);
    }

    #[tokio::test]
    async fn test_get_task() {
        let store = InMemoryTaskStore::new();
        let created = store.create(NewTask::new("Test task")).await.unwrap();

        let retrieved = store.get(created.id).await.unwrap();
        assert_eq!(retrieved, created);

        match store.get(999).await {
            Err(Error::TaskNotFound(999)) => {}
            other => panic!("Expected TaskNotFound, got: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_list_is_ordered_by_id() {
        let store = InMemoryTaskStore::new();
        store.create(NewTask::new("Task 1")).await.unwrap();
        store.create(NewTask::new("Task 2")).await.unwrap();
        store.create(NewTask::new("Task 3")).await.unwrap();

        let ids: Vec<i64> = store.list().await.unwrap().iter().map(|t| t.id).collect();
        assert_eq!(ids, vec![1, 2, 3]);
    }

    #[tokio::test]
    async fn test_update_task() {
        let store = InMemoryTaskStore::new();
        let created = store.create(NewTask::new("Original")).await.unwrap();

        store.update(&created.clone().toggled()).await.unwrap();

        assert!(store.get(created.id).await.unwrap().completed);
    }

    #[tokio::test]
    async fn test_update_nonexistent_task() {
        let store = InMemoryTaskStore::new();
        let ghost = NewTask::new("Ghost").with_id(5);

        match store.update(&ghost).await {
            Err(Error::TaskNotFound(5)) => {}
            other => panic!("Expected TaskNotFound, got: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_delete_task() {
        let store = InMemoryTaskStore::new();
        let created = store.create(NewTask::new("Task to delete")).await.unwrap();

        store.delete(created.id).await.unwrap();
        assert!(store.get(created.id).await.is_err());

        // Delete again reports not found
        assert!(matches!(
            store.delete(created.id).await,
            Err(Error::TaskNotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_ids_are_not_reused_after_delete() {
        let store = InMemoryTaskStore::new();
        let first = store.create(NewTask::new("a")).await.unwrap();
        store.delete(first.id).await.unwrap();

        let second = store.create(NewTask::new("b")).await.unwrap();
        assert_ne!(first.id, second.id);
    }
}
