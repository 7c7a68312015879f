//! Database connection and schema
//!
//! SQLite through sqlx. The schema is created at startup; uniqueness of
//! username and email is enforced here with case-insensitive unique columns,
//! the store-level guarantee the advisory pre-checks in the user store lean
//! on.

use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use std::str::FromStr;
use tracing::info;
use vestibule_core::{VestibuleError, VestibuleResult};

const SCHEMA: &str = r#"
    CREATE TABLE IF NOT EXISTS users (
        id TEXT PRIMARY KEY,
        username TEXT NOT NULL UNIQUE COLLATE NOCASE,
        email TEXT NOT NULL UNIQUE COLLATE NOCASE,
        password TEXT NOT NULL,
        features TEXT NOT NULL DEFAULT '[]',
        created_at TEXT NOT NULL,
        updated_at TEXT NOT NULL
    );

    CREATE TABLE IF NOT EXISTS sessions (
        id TEXT PRIMARY KEY,
        token TEXT NOT NULL UNIQUE,
        user_id TEXT NOT NULL REFERENCES users(id),
        expires_at TEXT NOT NULL,
        created_at TEXT NOT NULL,
        updated_at TEXT NOT NULL
    );

    CREATE TABLE IF NOT EXISTS user_activation_tokens (
        id TEXT PRIMARY KEY,
        user_id TEXT NOT NULL REFERENCES users(id),
        used_at TEXT,
        expires_at TEXT NOT NULL,
        created_at TEXT NOT NULL,
        updated_at TEXT NOT NULL
    );

    CREATE INDEX IF NOT EXISTS idx_sessions_token ON sessions(token);
    CREATE INDEX IF NOT EXISTS idx_activation_tokens_user ON user_activation_tokens(user_id);
"#;

/// Open a connection pool with foreign keys enforced
pub async fn connect(database_url: &str) -> VestibuleResult<SqlitePool> {
    let options = SqliteConnectOptions::from_str(database_url)
        .map_err(|e| VestibuleError::storage("Invalid database URL", Some(Box::new(e))))?
        .create_if_missing(true)
        .foreign_keys(true);

    SqlitePoolOptions::new()
        .max_connections(5)
        .connect_with(options)
        .await
        .map_err(|e| VestibuleError::storage("Failed to connect to database", Some(Box::new(e))))
}

/// Create all tables and indexes if they do not exist yet
pub async fn prepare_database(pool: &SqlitePool) -> VestibuleResult<()> {
    sqlx::raw_sql(SCHEMA)
        .execute(pool)
        .await
        .map_err(|e| VestibuleError::storage("Failed to create schema", Some(Box::new(e))))?;

    info!("database schema ready");
    Ok(())
}

/// Wrap an unexpected sqlx failure into the generic storage error
pub(crate) fn storage_error(err: sqlx::Error) -> VestibuleError {
    VestibuleError::storage("Database operation failed", Some(Box::new(err)))
}

pub(crate) fn is_unique_violation(err: &sqlx::Error) -> bool {
    matches!(
        err,
        sqlx::Error::Database(db) if db.kind() == sqlx::error::ErrorKind::UniqueViolation
    )
}

pub(crate) fn is_foreign_key_violation(err: &sqlx::Error) -> bool {
    matches!(
        err,
        sqlx::Error::Database(db) if db.kind() == sqlx::error::ErrorKind::ForeignKeyViolation
    )
}
