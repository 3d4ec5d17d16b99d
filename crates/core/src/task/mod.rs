//! Task module
//!
//! This module contains the task entity, its storage backends and the
//! cache-aside repository in front of them.

mod memory_store;
mod model;
mod pg_store;
mod repository;
mod store;

pub use memory_store::InMemoryTaskStore;
pub use model::*;
pub use pg_store::{PgStoreConfig, PgTaskStore};
pub use repository::{CachedTaskRepository, RepositoryConfig, TaskRepository};
pub use store::TaskStore;
