//! Task model definitions

use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// A persisted task
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Task {
    pub id: i64,
    pub title: String,
    pub completed: bool,
}

impl Task {
    /// Return the task with `completed` flipped
    pub fn toggled(mut self) -> Self {
        self.completed = !self.completed;
        self
    }
}

/// A task that has not been assigned an id by the store yet.
/// Tasks always start open.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewTask {
    pub title: String,
}

impl NewTask {
    /// Create a new, open task with the given title
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
        }
    }

    /// Reject tasks that cannot be persisted
    pub fn validate(&self) -> Result<()> {
        if self.title.trim().is_empty() {
            return Err(Error::InvalidInput("title is required".to_string()));
        }
        Ok(())
    }

    /// Attach the store-assigned id
    pub fn with_id(self, id: i64) -> Task {
        Task {
            id,
            title: self.title,
            completed: false,
        }
    }
}
