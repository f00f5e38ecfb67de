//! Composition root for the CLI adapter.
//!
//! The `SQLite` pool is opened here and handed out as the `MappingStore`
//! trait object; command handlers receive the composed `CliContext` and
//! never touch the pool directly.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Result;

use portico_core::paths::database_path;
use portico_core::ports::MappingStore;
use portico_db::{mapping_store, setup_database};

/// Resolved settings the CLI boots with.
#[derive(Debug, Clone)]
pub struct CliConfig {
    /// Path of the `SQLite` mapping database.
    pub db_path: PathBuf,
}

impl CliConfig {
    /// Resolve the database path: an explicit `--db` override wins,
    /// otherwise the default location under the data root.
    pub fn resolve(db_override: Option<PathBuf>) -> Result<Self> {
        let db_path = match db_override {
            Some(path) => path,
            None => database_path()?,
        };
        Ok(Self { db_path })
    }
}

/// Everything a command handler needs, wired once at startup.
pub struct CliContext {
    /// Mapping persistence, shared by every command.
    pub store: Arc<dyn MappingStore>,
}

/// Bootstrap the CLI application: open (or create) the database and wire
/// the mapping store.
pub async fn bootstrap(config: CliConfig) -> Result<CliContext> {
    let pool = setup_database(&config.db_path).await?;
    let store = mapping_store(pool);
    Ok(CliContext { store })
}

/// Bootstrap with a custom store (for tests).
pub fn bootstrap_with(store: Arc<dyn MappingStore>) -> CliContext {
    CliContext { store }
}
