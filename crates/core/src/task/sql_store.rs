//! Relational task storage implementation
//!
//! Stores tasks in a single SQLite table keyed by an auto-assigned
//! integer id. Every write is a single `RETURNING` statement, so the
//! value handed back is the post-commit row.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use std::str::FromStr;

use super::model::{NewTask, Task, TaskPatch};
use super::repository::TaskRepository;
use crate::{Error, Result};

const SCHEMA: &str = "CREATE TABLE IF NOT EXISTS task (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    description TEXT NOT NULL,
    is_completed BOOLEAN NOT NULL DEFAULT 0,
    created_at TEXT NOT NULL
)";

/// SQLite-backed task store
pub struct SqliteTaskStore {
    pool: SqlitePool,
}

#[derive(sqlx::FromRow)]
struct TaskRow {
    id: i64,
    description: String,
    is_completed: bool,
    created_at: DateTime<Utc>,
}

impl From<TaskRow> for Task {
    fn from(row: TaskRow) -> Self {
        Self {
            id: row.id.to_string(),
            description: row.description,
            is_completed: row.is_completed,
            created_at: row.created_at,
        }
    }
}

impl SqliteTaskStore {
    /// Open a store from a `sqlite:` connection URL, creating the
    /// database file and table if they don't exist yet.
    pub async fn connect(url: &str) -> Result<Self> {
        let options = SqliteConnectOptions::from_str(url)?.create_if_missing(true);
        let pool = SqlitePoolOptions::new().connect_with(options).await?;
        tracing::debug!("Connected to SQLite database at {}", url);
        Self::new(pool).await
    }

    /// Wrap an existing pool, ensuring the schema is in place.
    pub async fn new(pool: SqlitePool) -> Result<Self> {
        sqlx::query(SCHEMA).execute(&pool).await?;
        Ok(Self { pool })
    }

    fn parse_id(id: &str) -> Result<i64> {
        id.parse().map_err(|_| Error::InvalidId(id.to_string()))
    }
}

#[async_trait]
impl TaskRepository for SqliteTaskStore {
    async fn get_task(&self, id: &str) -> Result<Option<Task>> {
        let id = Self::parse_id(id)?;
        let row = sqlx::query_as::<_, TaskRow>(
            "SELECT id, description, is_completed, created_at FROM task WHERE id = ?",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row.map(Task::from))
    }

    async fn get_tasks(&self) -> Result<Vec<Task>> {
        let rows = sqlx::query_as::<_, TaskRow>(
            "SELECT id, description, is_completed, created_at FROM task ORDER BY id",
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(rows.into_iter().map(Task::from).collect())
    }

    async fn create_task(&self, new: NewTask) -> Result<Task> {
        let row = sqlx::query_as::<_, TaskRow>(
            "INSERT INTO task (description, is_completed, created_at) VALUES (?, 0, ?)
             RETURNING id, description, is_completed, created_at",
        )
        .bind(new.description)
        .bind(Utc::now())
        .fetch_one(&self.pool)
        .await?;
        Ok(row.into())
    }

    async fn update_task(&self, id: &str, patch: TaskPatch) -> Result<Task> {
        let task_id = Self::parse_id(id)?;
        // COALESCE keeps the stored value for absent fields, so an
        // explicitly empty description still goes through.
        let row = sqlx::query_as::<_, TaskRow>(
            "UPDATE task
             SET description = COALESCE(?, description),
                 is_completed = COALESCE(?, is_completed)
             WHERE id = ?
             RETURNING id, description, is_completed, created_at",
        )
        .bind(patch.description)
        .bind(patch.is_completed)
        .bind(task_id)
        .fetch_optional(&self.pool)
        .await?;
        row.map(Task::from)
            .ok_or_else(|| Error::TaskNotFound(id.to_string()))
    }

    async fn delete_task(&self, id: &str) -> Result<Task> {
        let task_id = Self::parse_id(id)?;
        let row = sqlx::query_as::<_, TaskRow>(
            "DELETE FROM task WHERE id = ?
             RETURNING id, description, is_completed, created_at",
        )
        .bind(task_id)
        .fetch_optional(&self.pool)
        .await?;
        row.map(Task::from)
            .ok_or_else(|| Error::TaskNotFound(id.to_string()))
    }
}
