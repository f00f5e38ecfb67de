//! Core domain types and port definitions for portico.
//!
//! This crate holds everything the gateway's adapters share: the persisted
//! mapping record types, the immutable dispatch table plus its atomically
//! swappable publication handle, the `MappingStore` port, and data-directory
//! resolution. It depends on no HTTP or database machinery.

#![deny(unused_crate_dependencies)]

pub mod dispatch;
pub mod domain;
pub mod paths;
pub mod ports;

// Re-export commonly used types for convenience
pub use dispatch::{DefaultEntry, DispatchEntry, DispatchHandle, DispatchTable, Selection};
pub use domain::{Mapping, MappingUpdate, NewMapping, ValidationError};
pub use paths::{PathError, data_root, database_path};
pub use ports::{MappingStore, RepositoryError};

#[cfg(any(test, feature = "test-utils"))]
pub use ports::MockMappingStore;
