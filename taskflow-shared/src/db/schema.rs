/// Startup schema setup
///
/// TaskFlow creates its tables at server startup, idempotently, instead of
/// shipping a migration directory. The schema is small enough (two tables)
/// that `CREATE TABLE IF NOT EXISTS` is the whole story; the foreign key
/// from `tasks.user_id` to `users.id` carries the user-isolation invariant
/// into the database itself, and `ON DELETE CASCADE` removes a user's tasks
/// with the user.
///
/// # Example
///
/// ```no_run
/// use taskflow_shared::db::pool::{create_pool, DatabaseConfig};
/// use taskflow_shared::db::schema::create_tables;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let pool = create_pool(DatabaseConfig {
///     url: std::env::var("DATABASE_URL")?,
///     ..Default::default()
/// }).await?;
///
/// create_tables(&pool).await?;
/// # Ok(())
/// # }
/// ```

use sqlx::PgPool;
use tracing::info;

const CREATE_USERS: &str = r#"
CREATE TABLE IF NOT EXISTS users (
    id TEXT PRIMARY KEY,
    email TEXT NOT NULL UNIQUE,
    name TEXT NOT NULL,
    password_hash TEXT NOT NULL,
    created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
)
"#;

const CREATE_TASKS: &str = r#"
CREATE TABLE IF NOT EXISTS tasks (
    id BIGSERIAL PRIMARY KEY,
    user_id TEXT NOT NULL REFERENCES users(id) ON DELETE CASCADE,
    title VARCHAR(200) NOT NULL,
    description VARCHAR(1000),
    is_completed BOOLEAN NOT NULL DEFAULT FALSE,
    created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
)
"#;

const CREATE_TASKS_USER_INDEX: &str =
    "CREATE INDEX IF NOT EXISTS idx_tasks_user_id ON tasks(user_id)";

/// Creates all tables and indexes if they do not exist
///
/// Safe to call on every startup.
///
/// # Errors
///
/// Returns an error if any DDL statement fails
pub async fn create_tables(pool: &PgPool) -> Result<(), sqlx::Error> {
    info!("Ensuring database schema");

    sqlx::query(CREATE_USERS).execute(pool).await?;
    sqlx::query(CREATE_TASKS).execute(pool).await?;
    sqlx::query(CREATE_TASKS_USER_INDEX).execute(pool).await?;

    info!("Database schema ready");
    Ok(())
}

/// Drops all tables; test support only
///
/// Order matters: tasks references users.
pub async fn drop_tables(pool: &PgPool) -> Result<(), sqlx::Error> {
    sqlx::query("DROP TABLE IF EXISTS tasks").execute(pool).await?;
    sqlx::query("DROP TABLE IF EXISTS users").execute(pool).await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ddl_carries_isolation_constraints() {
        assert!(CREATE_TASKS.contains("REFERENCES users(id)"));
        assert!(CREATE_TASKS.contains("ON DELETE CASCADE"));
        assert!(CREATE_USERS.contains("UNIQUE"));
    }

    #[test]
    fn test_ddl_carries_length_limits() {
        assert!(CREATE_TASKS.contains("VARCHAR(200)"));
        assert!(CREATE_TASKS.contains("VARCHAR(1000)"));
    }
}
