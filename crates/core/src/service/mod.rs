//! Service module
//!
//! Use-case orchestration over the task repository.

mod task_service;

pub use task_service::TaskService;
