//! Port definitions (trait abstractions) for external systems.
//!
//! Ports define the interfaces the core expects from infrastructure. They
//! contain no implementation details and use only domain types.
//!
//! # Design Rules
//!
//! - No `sqlx` types in any signature
//! - Traits are minimal and CRUD-focused

pub mod mapping_store;

use thiserror::Error;

pub use mapping_store::MappingStore;

#[cfg(any(test, feature = "test-utils"))]
pub use mapping_store::MockMappingStore;

/// Errors surfaced by repository implementations.
///
/// Implementations map their backend's failures into these variants so the
/// rest of the system never sees driver-specific error types.
#[derive(Debug, Error)]
pub enum RepositoryError {
    /// The requested record was not found.
    #[error("Not found: {0}")]
    NotFound(String),

    /// A record with the same unique key already exists.
    #[error("Already exists: {0}")]
    AlreadyExists(String),

    /// Storage backend error (database, filesystem, etc.).
    #[error("Storage error: {0}")]
    Storage(String),

    /// A constraint was violated (e.g., NOT NULL, CHECK).
    #[error("Constraint violation: {0}")]
    Constraint(String),
}
