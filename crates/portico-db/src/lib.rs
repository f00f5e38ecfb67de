//! `SQLite` mapping store implementation for portico.
//!
//! Provides [`setup_database`] for opening/initializing the database and
//! [`SqliteMappingRepository`], the `MappingStore` implementation the
//! gateway and CLI are wired with. All SQL lives in this crate; the port
//! signatures never expose `sqlx` types.

#![deny(unsafe_code)]

pub mod factory;
pub mod repositories;
pub mod setup;

pub use factory::mapping_store;
pub use repositories::SqliteMappingRepository;
pub use setup::setup_database;

#[cfg(any(test, feature = "test-utils"))]
pub use factory::TestDb;
#[cfg(any(test, feature = "test-utils"))]
pub use setup::setup_test_database;
