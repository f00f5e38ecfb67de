//! Composition utilities for wiring the `SQLite` mapping store.
//!
//! Construction only; no domain logic.

use std::sync::Arc;

use sqlx::SqlitePool;

use portico_core::ports::MappingStore;

use crate::repositories::SqliteMappingRepository;

/// Build the mapping store from a pool, trait-object-wrapped for adapters.
pub fn mapping_store(pool: SqlitePool) -> Arc<dyn MappingStore> {
    Arc::new(SqliteMappingRepository::new(pool))
}

/// In-memory database plus store accessors, for downstream crates' tests.
#[cfg(any(test, feature = "test-utils"))]
pub struct TestDb {
    pool: SqlitePool,
}

#[cfg(any(test, feature = "test-utils"))]
impl TestDb {
    pub async fn new() -> anyhow::Result<Self> {
        let pool = crate::setup::setup_test_database().await?;
        Ok(Self { pool })
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// The mapping store backed by this test database.
    pub fn store(&self) -> Arc<dyn MappingStore> {
        mapping_store(self.pool.clone())
    }
}
