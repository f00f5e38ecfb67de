//! Mapping domain types.
//!
//! - `Mapping` - a persisted mapping rule with ID and timestamps
//! - `NewMapping` - a mapping to be inserted (no ID yet)
//! - `MappingUpdate` - partial update; absent fields keep their value

mod mapping;

pub use mapping::{Mapping, MappingUpdate, NewMapping, ValidationError};
