//! Database setup and initialization.
//!
//! Entry points call [`setup_database`] with the resolved database path; the
//! file and schema are created on first use.

use std::path::Path;

use anyhow::Result;
use sqlx::{SqlitePool, sqlite::SqliteConnectOptions};

/// Open the mapping database at `db_path`, creating file and schema on
/// first use.
///
/// # Errors
///
/// Returns an error if the database file cannot be opened or created, or if
/// schema creation fails.
pub async fn setup_database(db_path: &Path) -> Result<SqlitePool> {
    // The default location lives under a data dir that may not exist yet
    if let Some(parent) = db_path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    let pool = SqlitePool::connect_with(
        SqliteConnectOptions::new()
            .filename(db_path)
            .create_if_missing(true),
    )
    .await?;

    create_schema(&pool).await?;

    Ok(pool)
}

/// In-memory database with the production schema, for tests.
#[cfg(any(test, feature = "test-utils"))]
pub async fn setup_test_database() -> Result<SqlitePool> {
    let pool = SqlitePool::connect("sqlite::memory:").await?;
    create_schema(&pool).await?;
    Ok(pool)
}

/// Create the `routes` table and its indexes. Idempotent; everything is
/// IF NOT EXISTS.
async fn create_schema(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS routes (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            path TEXT NOT NULL UNIQUE,
            target_url TEXT NOT NULL,
            is_enabled INTEGER NOT NULL DEFAULT 0,
            description TEXT,
            created_at TEXT NOT NULL DEFAULT (datetime('now')),
            updated_at TEXT NOT NULL DEFAULT (datetime('now'))
        )
        "#,
    )
    .execute(pool)
    .await?;

    // The reconciler polls for enabled rows every tick
    sqlx::query("CREATE INDEX IF NOT EXISTS idx_routes_enabled ON routes(is_enabled)")
        .execute(pool)
        .await?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_setup_creates_file_and_schema() {
        let dir = tempfile::tempdir().unwrap();
        let db_path = dir.path().join("nested").join("portico.db");

        let pool = setup_database(&db_path).await.unwrap();
        assert!(db_path.exists());

        // Schema is queryable
        let count: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM routes")
            .fetch_one(&pool)
            .await
            .unwrap();
        assert_eq!(count.0, 0);
    }

    #[tokio::test]
    async fn test_setup_is_idempotent() {
        let pool = setup_test_database().await.unwrap();
        create_schema(&pool).await.unwrap();
        create_schema(&pool).await.unwrap();
    }
}
