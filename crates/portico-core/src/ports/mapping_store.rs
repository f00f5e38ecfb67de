//! Mapping store trait definition.
//!
//! This port is the boundary between the gateway and mapping persistence.
//! The reconciliation loop consumes only [`MappingStore::list_enabled`]; the
//! admin surface uses the full CRUD set.

use async_trait::async_trait;

use super::RepositoryError;
use crate::domain::{Mapping, MappingUpdate, NewMapping};

/// Repository for mapping persistence operations.
#[cfg_attr(any(test, feature = "test-utils"), mockall::automock)]
#[async_trait]
pub trait MappingStore: Send + Sync {
    /// List all mappings, enabled or not, in registration (id) order.
    async fn list(&self) -> Result<Vec<Mapping>, RepositoryError>;

    /// List only enabled mappings, in registration (id) order.
    ///
    /// Registration order matters: the dispatch table preserves it, and the
    /// router picks the first matching entry in table order.
    async fn list_enabled(&self) -> Result<Vec<Mapping>, RepositoryError>;

    /// Get a mapping by its database ID.
    ///
    /// Returns `Err(RepositoryError::NotFound)` if the mapping doesn't exist.
    async fn get(&self, id: i64) -> Result<Mapping, RepositoryError>;

    /// Insert a new mapping and return it with its assigned ID.
    ///
    /// Returns `Err(RepositoryError::AlreadyExists)` if a mapping with the
    /// same `path` already exists.
    async fn create(&self, mapping: &NewMapping) -> Result<Mapping, RepositoryError>;

    /// Apply a partial update and return the updated mapping.
    ///
    /// Returns `Err(RepositoryError::NotFound)` if the mapping doesn't exist.
    async fn update(&self, id: i64, update: &MappingUpdate) -> Result<Mapping, RepositoryError>;

    /// Delete a mapping by its database ID.
    ///
    /// Returns `Err(RepositoryError::NotFound)` if the mapping doesn't exist.
    async fn delete(&self, id: i64) -> Result<(), RepositoryError>;
}
