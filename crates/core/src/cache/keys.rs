//! Cache key scheme for tasks
//!
//! The list key contains no `task:` prefix so it can never collide with an
//! item key.

pub const ALL_TASKS_KEY: &str = "tasks:all";
pub const TASK_KEY_PREFIX: &str = "task:";

/// Key holding the full task list
pub fn all_tasks() -> &'static str {
    ALL_TASKS_KEY
}

/// Key holding a single task
pub fn task(id: i64) -> String {
    format!("{}{}", TASK_KEY_PREFIX, id)
}
