/// Task model and database operations
///
/// Tasks are the core entity of TaskFlow. Each task is owned by exactly one
/// user; every operation in this module takes the owning `user_id` and bakes
/// it into the `WHERE` clause, so a query can never observe or mutate
/// another user's rows even if a caller bug slips past the authorization
/// gate.
///
/// # Schema
///
/// ```sql
/// CREATE TABLE tasks (
///     id BIGSERIAL PRIMARY KEY,
///     user_id TEXT NOT NULL REFERENCES users(id) ON DELETE CASCADE,
///     title VARCHAR(200) NOT NULL,
///     description VARCHAR(1000),
///     is_completed BOOLEAN NOT NULL DEFAULT FALSE,
///     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
///     updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
/// );
///
/// CREATE INDEX idx_tasks_user_id ON tasks(user_id);
/// ```
///
/// # Example
///
/// ```no_run
/// use taskflow_shared::models::task::{CreateTask, Task};
/// use sqlx::PgPool;
///
/// # async fn example(pool: PgPool) -> Result<(), sqlx::Error> {
/// let task = Task::create(&pool, "user-id", CreateTask {
///     title: "Buy milk".to_string(),
///     description: None,
/// }).await?;
///
/// assert!(!task.is_completed);
///
/// let toggled = Task::toggle_completed(&pool, task.id, "user-id").await?;
/// assert!(toggled.unwrap().is_completed);
/// # Ok(())
/// # }
/// ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;

/// Maximum title length in characters
pub const TITLE_MAX_CHARS: usize = 200;

/// Maximum description length in characters
pub const DESCRIPTION_MAX_CHARS: usize = 1000;

/// Task model
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Task {
    /// Unique task ID (server-generated, auto-increment)
    pub id: i64,

    /// Owning user ID (foreign key to users)
    pub user_id: String,

    /// Task title (1-200 characters)
    pub title: String,

    /// Optional task details (up to 1000 characters)
    pub description: Option<String>,

    /// Completion status
    pub is_completed: bool,

    /// Creation timestamp
    pub created_at: DateTime<Utc>,

    /// Last modification timestamp (touched on every mutation)
    pub updated_at: DateTime<Utc>,
}

/// Input for creating a new task
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateTask {
    /// Task title
    pub title: String,

    /// Optional task details
    pub description: Option<String>,
}

/// Input for updating an existing task (partial update)
///
/// `None` fields keep their current value.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateTask {
    /// New title
    pub title: Option<String>,

    /// New description
    pub description: Option<String>,

    /// New completion status
    pub is_completed: Option<bool>,
}

impl Task {
    /// Creates a new task for the given user
    ///
    /// The server is authoritative for `id`, `is_completed` (false) and the
    /// timestamps; the returned row carries the generated values.
    pub async fn create(
        pool: &PgPool,
        user_id: &str,
        data: CreateTask,
    ) -> Result<Self, sqlx::Error> {
        let task = sqlx::query_as::<_, Task>(
            r#"
            INSERT INTO tasks (user_id, title, description)
            VALUES ($1, $2, $3)
            RETURNING id, user_id, title, description, is_completed, created_at, updated_at
            "#,
        )
        .bind(user_id)
        .bind(data.title)
        .bind(data.description)
        .fetch_one(pool)
        .await?;

        Ok(task)
    }

    /// Lists all tasks owned by a user, newest first
    pub async fn list_for_user(pool: &PgPool, user_id: &str) -> Result<Vec<Self>, sqlx::Error> {
        let tasks = sqlx::query_as::<_, Task>(
            r#"
            SELECT id, user_id, title, description, is_completed, created_at, updated_at
            FROM tasks
            WHERE user_id = $1
            ORDER BY created_at DESC, id DESC
            "#,
        )
        .bind(user_id)
        .fetch_all(pool)
        .await?;

        Ok(tasks)
    }

    /// Finds a task by id, scoped to its owner
    ///
    /// Returns `None` both for nonexistent ids and for ids owned by another
    /// user; callers cannot distinguish the two, which keeps foreign ids
    /// unprobeable.
    pub async fn find_by_id_and_user(
        pool: &PgPool,
        id: i64,
        user_id: &str,
    ) -> Result<Option<Self>, sqlx::Error> {
        let task = sqlx::query_as::<_, Task>(
            r#"
            SELECT id, user_id, title, description, is_completed, created_at, updated_at
            FROM tasks
            WHERE id = $1 AND user_id = $2
            "#,
        )
        .bind(id)
        .bind(user_id)
        .fetch_optional(pool)
        .await?;

        Ok(task)
    }

    /// Applies a partial update to a task, scoped to its owner
    ///
    /// `None` fields are left unchanged (COALESCE). A `Some` description
    /// replaces the current one; clearing a description is done by sending
    /// an empty string. Returns `None` if the task does not exist under this
    /// owner.
    pub async fn update(
        pool: &PgPool,
        id: i64,
        user_id: &str,
        data: UpdateTask,
    ) -> Result<Option<Self>, sqlx::Error> {
        let task = sqlx::query_as::<_, Task>(
            r#"
            UPDATE tasks
            SET title = COALESCE($3, title),
                description = COALESCE($4, description),
                is_completed = COALESCE($5, is_completed),
                updated_at = NOW()
            WHERE id = $1 AND user_id = $2
            RETURNING id, user_id, title, description, is_completed, created_at, updated_at
            "#,
        )
        .bind(id)
        .bind(user_id)
        .bind(data.title)
        .bind(data.description)
        .bind(data.is_completed)
        .fetch_optional(pool)
        .await?;

        Ok(task)
    }

    /// Flips the completion flag, scoped to the owner
    ///
    /// A single SQL statement, so two racing toggles serialize in the
    /// database and toggling twice always restores the original state.
    pub async fn toggle_completed(
        pool: &PgPool,
        id: i64,
        user_id: &str,
    ) -> Result<Option<Self>, sqlx::Error> {
        let task = sqlx::query_as::<_, Task>(
            r#"
            UPDATE tasks
            SET is_completed = NOT is_completed,
                updated_at = NOW()
            WHERE id = $1 AND user_id = $2
            RETURNING id, user_id, title, description, is_completed, created_at, updated_at
            "#,
        )
        .bind(id)
        .bind(user_id)
        .fetch_optional(pool)
        .await?;

        Ok(task)
    }

    /// Deletes a task, scoped to the owner
    ///
    /// Returns `true` if a row was removed.
    pub async fn delete(pool: &PgPool, id: i64, user_id: &str) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM tasks WHERE id = $1 AND user_id = $2")
            .bind(id)
            .bind(user_id)
            .execute(pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Counts tasks owned by a user
    pub async fn count_for_user(pool: &PgPool, user_id: &str) -> Result<i64, sqlx::Error> {
        let count: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM tasks WHERE user_id = $1")
            .bind(user_id)
            .fetch_one(pool)
            .await?;

        Ok(count.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_update_task_default_changes_nothing() {
        let update = UpdateTask::default();
        assert!(update.title.is_none());
        assert!(update.description.is_none());
        assert!(update.is_completed.is_none());
    }

    #[test]
    fn test_task_serialization_shape() {
        let task = Task {
            id: 42,
            user_id: "user-1".to_string(),
            title: "Buy milk".to_string(),
            description: None,
            is_completed: false,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };

        let json = serde_json::to_value(&task).unwrap();
        assert_eq!(json["id"], 42);
        assert_eq!(json["user_id"], "user-1");
        assert_eq!(json["title"], "Buy milk");
        assert_eq!(json["description"], serde_json::Value::Null);
        assert_eq!(json["is_completed"], false);
    }

    #[test]
    fn test_limits_match_contract() {
        assert_eq!(TITLE_MAX_CHARS, 200);
        assert_eq!(DESCRIPTION_MAX_CHARS, 1000);
    }

    // Database-backed CRUD and isolation tests live in taskflow-api/tests
    // and require a running PostgreSQL instance.
}
