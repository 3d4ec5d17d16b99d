//! PostgreSQL task storage implementation
//!
//! Talks to a single `tasks` table through a `sqlx` connection pool.

use std::time::Duration;

use async_trait::async_trait;
use sqlx::postgres::{PgPool, PgPoolOptions};
use tracing::info;

use super::model::{NewTask, Task};
use super::store::TaskStore;
use crate::{Error, Result};

const CREATE_TASKS_TABLE: &str = r#"
CREATE TABLE IF NOT EXISTS tasks (
    id BIGSERIAL PRIMARY KEY,
    title TEXT NOT NULL,
    completed BOOLEAN NOT NULL DEFAULT FALSE
)
"#;

/// New tasks are always inserted open
const INSERT_TASK: &str = r#"
INSERT INTO tasks (title, completed)
VALUES ($1, FALSE)
RETURNING id, title, completed
"#;

/// Connection settings for [`PgTaskStore`]
#[derive(Debug, Clone)]
pub struct PgStoreConfig {
    pub url: String,
    pub max_connections: u32,
    pub acquire_timeout: Duration,
}

impl PgStoreConfig {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            max_connections: 10,
            acquire_timeout: Duration::from_secs(5),
        }
    }
}

/// Task store backed by PostgreSQL
#[derive(Clone)]
pub struct PgTaskStore {
    pool: PgPool,
}

impl std::fmt::Debug for PgTaskStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PgTaskStore")
            .field("pool", &"PgPool")
            .finish()
    }
}

impl PgTaskStore {
    /// Open a pool and verify the database answers
    pub async fn connect(config: &PgStoreConfig) -> Result<Self> {
        info!(max_connections = config.max_connections, "Connecting to postgres");

        let pool = PgPoolOptions::new()
            .max_connections(config.max_connections)
            .acquire_timeout(config.acquire_timeout)
            .connect(&config.url)
            .await?;

        sqlx::query("SELECT 1").execute(&pool).await?;

        info!("Connected to postgres");
        Ok(Self { pool })
    }

    /// Create the `tasks` table if it does not exist yet
    pub async fn ensure_schema(&self) -> Result<()> {
        sqlx::query(CREATE_TASKS_TABLE).execute(&self.pool).await?;
        Ok(())
    }

    /// Wait for checked-out connections to return and close the pool
    pub async fn close(&self) {
        self.pool.close().await;
    }
}

/// Map a zero affected-row count to not-found
fn expect_affected(rows_affected: u64, id: i64) -> Result<()> {
    if rows_affected == 0 {
        return Err(Error::TaskNotFound(id));
    }
    Ok(())
}

#[async_trait]
impl TaskStore for PgTaskStore {
    async fn create(&self, task: NewTask) -> Result<Task> {
        let created = sqlx::query_as::<_, Task>(INSERT_TASK)
            .bind(&task.title)
            .fetch_one(&self.pool)
            .await?;

        Ok(created)
    }

    async fn list(&self) -> Result<Vec<Task>> {
        let tasks = sqlx::query_as::<_, Task>(
            r#"
            SELECT id, title, completed
            FROM tasks
            ORDER BY id
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(tasks)
    }

    async fn get(&self, id: i64) -> Result<Task> {
        sqlx::query_as::<_, Task>(
            r#"
            SELECT id, title, completed
            FROM tasks
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or(Error::TaskNotFound(id))
    }

    async fn update(&self, task: &Task) -> Result<()> {
        let result = sqlx::query(
            r#"
            UPDATE tasks
            SET title = $1, completed = $2
            WHERE id = $3
            "#,
        )
        .bind(&task.title)
        .bind(task.completed)
        .bind(task.id)
        .execute(&self.pool)
        .await?;

        expect_affected(result.rows_affected(), task.id)
    }

    async fn delete(&self, id: i64) -> Result<()> {
        let result = sqlx::query("DELETE FROM tasks WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        expect_affected(result.rows_affected(), id)
    }

    async fn health_check(&self) -> Result<bool> {
        let one: i32 = sqlx::query_scalar("SELECT 1").fetch_one(&self.pool).await?;
        Ok(one == 1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_rows_is_not_found() {
        match expect_affected(0, 12) {
            Err(Error::TaskNotFound(12)) => {}
            other => panic!("Expected TaskNotFound, got: {:?}", other),
        }
        assert!(expect_affected(1, 12).is_ok());
    }

    #[test]
    fn test_default_pool_settings() {
        let config = PgStoreConfig::new("postgres://localhost/todo");
        assert_eq!(config.max_connections, 10);
        assert_eq!(config.acquire_timeout, Duration::from_secs(5));
    }

    #[test]
    fn test_schema_matches_task_columns() {
        for column in ["id BIGSERIAL PRIMARY KEY", "title TEXT NOT NULL", "completed BOOLEAN"] {
            assert!(CREATE_TASKS_TABLE.contains(column), "missing {}", column);
        }
    }

    #[test]
    fn test_insert_binds_only_the_title() {
        assert!(INSERT_TASK.contains("VALUES ($1, FALSE)"));
        assert!(!INSERT_TASK.contains("$2"));
    }
}
