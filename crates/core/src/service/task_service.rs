//! Task use cases
//!
//! Thin orchestration over [`TaskRepository`]. Caching lives in the
//! repository, not here.

use std::sync::Arc;

use tracing::{error, info};

use crate::task::{NewTask, Task, TaskRepository};
use crate::Result;

#[derive(Clone)]
pub struct TaskService {
    repo: Arc<dyn TaskRepository>,
}

impl TaskService {
    pub fn new(repo: Arc<dyn TaskRepository>) -> Self {
        Self { repo }
    }

    /// Validate and persist a new task
    pub async fn create_task(&self, title: impl Into<String>) -> Result<Task> {
        let task = NewTask::new(title);
        info!(title = %task.title, "creating new task");

        task.validate()?;

        let created = self.repo.create_task(task).await.inspect_err(|e| {
            error!(error = %e, "failed to create task");
        })?;

        info!(id = created.id, "task created successfully");
        Ok(created)
    }

    pub async fn get_tasks(&self) -> Result<Vec<Task>> {
        info!("getting all tasks");

        let tasks = self.repo.get_tasks().await.inspect_err(|e| {
            error!(error = %e, "failed to get tasks");
        })?;

        info!(count = tasks.len(), "tasks retrieved successfully");
        Ok(tasks)
    }

    pub async fn get_task_by_id(&self, id: i64) -> Result<Task> {
        info!(id, "getting task by id");

        let task = self.repo.get_task_by_id(id).await.inspect_err(|e| {
            error!(id, error = %e, "failed to get task by id");
        })?;

        info!(id, "task retrieved successfully");
        Ok(task)
    }

    /// Flip `completed` and write the task back
    ///
    /// Read-modify-write without a conditional update: two concurrent toggles
    /// of the same task can both read the same state, so the task ends up
    /// flipped once.
    pub async fn open_close_task(&self, id: i64) -> Result<Task> {
        info!(id, "toggling task");

        let task = self.repo.get_task_by_id(id).await.inspect_err(|e| {
            error!(id, error = %e, "failed to get task by id");
        })?;

        let toggled = task.toggled();
        self.repo.update_task(&toggled).await.inspect_err(|e| {
            error!(id, error = %e, "failed to update task");
        })?;

        info!(id, completed = toggled.completed, "task updated successfully");
        Ok(toggled)
    }

    pub async fn remove_task(&self, id: i64) -> Result<()> {
        info!(id, "removing task");

        self.repo.delete_task(id).await.inspect_err(|e| {
            error!(id, error = %e, "failed to remove task");
        })?;

        info!(id, "task removed successfully");
        Ok(())
    }
}
