//! Task store trait
//!
//! Defines the interface to the authoritative task storage.

use async_trait::async_trait;

use super::model::{NewTask, Task};
use crate::Result;

/// Durable storage for tasks
///
/// `get`, `update` and `delete` fail with [`crate::Error::TaskNotFound`] when
/// no row matches the id, so callers can tell a missing task from a broken
/// backend.
#[async_trait]
pub trait TaskStore: Send + Sync {
    /// Insert a task and return it with its store-assigned id
    async fn create(&self, task: NewTask) -> Result<Task>;

    /// Get all tasks, ordered by id
    async fn list(&self) -> Result<Vec<Task>>;

    /// Get a task by ID
    async fn get(&self, id: i64) -> Result<Task>;

    /// Rewrite every column of an existing task
    async fn update(&self, task: &Task) -> Result<()>;

    /// Delete a task by ID
    async fn delete(&self, id: i64) -> Result<()>;

    /// Check that the backend is reachable
    async fn health_check(&self) -> Result<bool>;
}
