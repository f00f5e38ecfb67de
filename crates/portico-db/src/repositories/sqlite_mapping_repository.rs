//! `SQLite` implementation of the mapping store.
//!
//! Rows live in the `routes` table; `path` carries a UNIQUE constraint so
//! two records can never claim the same prefix. Timestamps are written by
//! `SQLite` (`datetime('now')`) and parsed back to `DateTime<Utc>`.

use async_trait::async_trait;
use chrono::{DateTime, TimeZone, Utc};
use sqlx::SqlitePool;

use portico_core::domain::{Mapping, MappingUpdate, NewMapping};
use portico_core::ports::{MappingStore, RepositoryError};

/// `SQLite` implementation of the mapping store.
pub struct SqliteMappingRepository {
    pool: SqlitePool,
}

impl SqliteMappingRepository {
    /// Create a new `SQLite` mapping repository.
    pub const fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[derive(sqlx::FromRow)]
struct MappingRow {
    id: i64,
    path: String,
    target_url: String,
    is_enabled: bool,
    description: Option<String>,
    created_at: String,
    updated_at: String,
}

/// Parse a datetime string from `SQLite` to a `DateTime<Utc>`.
fn parse_datetime(s: &str) -> DateTime<Utc> {
    // `SQLite` stores datetime as "YYYY-MM-DD HH:MM:SS" format
    chrono::NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S")
        .map(|dt| Utc.from_utc_datetime(&dt))
        .unwrap_or_else(|_| Utc::now())
}

fn row_to_mapping(row: MappingRow) -> Mapping {
    Mapping {
        id: row.id,
        path: row.path,
        target_url: row.target_url,
        is_enabled: row.is_enabled,
        description: row.description,
        created_at: parse_datetime(&row.created_at),
        updated_at: parse_datetime(&row.updated_at),
    }
}

/// Map `SQLx` errors to `RepositoryError`.
fn map_sqlx_error(e: sqlx::Error) -> RepositoryError {
    let msg = e.to_string();
    if msg.contains("UNIQUE constraint failed") && msg.contains("path") {
        return RepositoryError::AlreadyExists("a mapping with this path already exists".to_string());
    }
    if msg.contains("constraint failed") {
        return RepositoryError::Constraint(msg);
    }
    RepositoryError::Storage(msg)
}

#[async_trait]
impl MappingStore for SqliteMappingRepository {
    async fn list(&self) -> Result<Vec<Mapping>, RepositoryError> {
        let rows = sqlx::query_as::<_, MappingRow>(
            r#"
            SELECT id, path, target_url, is_enabled, description, created_at, updated_at
            FROM routes ORDER BY id ASC
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .map_err(map_sqlx_error)?;

        Ok(rows.into_iter().map(row_to_mapping).collect())
    }

    async fn list_enabled(&self) -> Result<Vec<Mapping>, RepositoryError> {
        // id order mirrors registration order; the dispatch table preserves
        // it and the router picks the first match in that order.
        let rows = sqlx::query_as::<_, MappingRow>(
            r#"
            SELECT id, path, target_url, is_enabled, description, created_at, updated_at
            FROM routes WHERE is_enabled = 1 ORDER BY id ASC
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .map_err(map_sqlx_error)?;

        Ok(rows.into_iter().map(row_to_mapping).collect())
    }

    async fn get(&self, id: i64) -> Result<Mapping, RepositoryError> {
        let row = sqlx::query_as::<_, MappingRow>(
            r#"
            SELECT id, path, target_url, is_enabled, description, created_at, updated_at
            FROM routes WHERE id = ?
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_sqlx_error)?
        .ok_or_else(|| RepositoryError::NotFound(id.to_string()))?;

        Ok(row_to_mapping(row))
    }

    async fn create(&self, mapping: &NewMapping) -> Result<Mapping, RepositoryError> {
        let result = sqlx::query(
            "INSERT INTO routes (path, target_url, is_enabled, description) VALUES (?, ?, ?, ?)",
        )
        .bind(&mapping.path)
        .bind(&mapping.target_url)
        .bind(mapping.is_enabled)
        .bind(&mapping.description)
        .execute(&self.pool)
        .await
        .map_err(map_sqlx_error)?;

        self.get(result.last_insert_rowid()).await
    }

    async fn update(&self, id: i64, update: &MappingUpdate) -> Result<Mapping, RepositoryError> {
        // Merge in Rust rather than building dynamic SQL: fetch, overlay the
        // present fields, write everything back.
        let current = self.get(id).await?;
        if update.is_empty() {
            return Ok(current);
        }

        let path = update.path.as_ref().unwrap_or(&current.path);
        let target_url = update.target_url.as_ref().unwrap_or(&current.target_url);
        let is_enabled = update.is_enabled.unwrap_or(current.is_enabled);
        let description = update.description.clone().or(current.description);

        sqlx::query(
            r#"
            UPDATE routes
            SET path = ?, target_url = ?, is_enabled = ?, description = ?,
                updated_at = datetime('now')
            WHERE id = ?
            "#,
        )
        .bind(path)
        .bind(target_url)
        .bind(is_enabled)
        .bind(description)
        .bind(id)
        .execute(&self.pool)
        .await
        .map_err(map_sqlx_error)?;

        self.get(id).await
    }

    async fn delete(&self, id: i64) -> Result<(), RepositoryError> {
        let result = sqlx::query("DELETE FROM routes WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(map_sqlx_error)?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound(id.to_string()));
        }

        Ok(())
    }
}
