//! Data-directory resolution for portico.
//!
//! Provides the canonical location of the mapping database. No interactive
//! I/O here; adapters decide how to surface failures.

use std::env;
use std::fs;
use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur during path resolution.
#[derive(Debug, Error)]
pub enum PathError {
    /// Could not determine the system data directory.
    #[error("Cannot determine system data directory")]
    NoDataDir,

    /// Failed to create a directory.
    #[error("Failed to create directory {path}: {reason}")]
    CreateFailed { path: PathBuf, reason: String },
}

/// Root directory for application data.
///
/// Resolution order:
/// 1. `PORTICO_DATA_DIR` environment variable
/// 2. System data directory (e.g., `~/.local/share/portico`)
///
/// The directory is created if it doesn't exist.
pub fn data_root() -> Result<PathBuf, PathError> {
    let root = match env::var("PORTICO_DATA_DIR") {
        Ok(path) => PathBuf::from(path),
        Err(_) => dirs::data_local_dir()
            .ok_or(PathError::NoDataDir)?
            .join("portico"),
    };

    if !root.exists() {
        fs::create_dir_all(&root).map_err(|e| PathError::CreateFailed {
            path: root.clone(),
            reason: e.to_string(),
        })?;
    }

    Ok(root)
}

/// Path to the mapping database file, `portico.db` under [`data_root`].
pub fn database_path() -> Result<PathBuf, PathError> {
    Ok(data_root()?.join("portico.db"))
}
