//! Subcommands for managing mapping records.
//!
//! These commands write through the same `MappingStore` port as the HTTP
//! admin API; a running gateway picks the changes up on its next refresh
//! cycle.

use clap::Subcommand;

/// Mapping management subcommands.
#[derive(Subcommand)]
pub enum RoutesCommand {
    /// List all mapping records, enabled or not
    List,

    /// Add a mapping record (staged disabled unless --enable is given)
    Add {
        /// Path prefix requests must start with (e.g. "/v1/products")
        path: String,

        /// Absolute URL of the upstream (e.g. "http://internal:8080/products")
        target_url: String,

        /// Operator-facing note, not used by dispatch
        #[arg(short, long)]
        description: Option<String>,

        /// Enable the mapping immediately instead of staging it
        #[arg(long)]
        enable: bool,
    },

    /// Enable a mapping so it takes traffic from the next refresh on
    Enable {
        /// ID of the mapping
        id: i64,
    },

    /// Disable a mapping without deleting it
    Disable {
        /// ID of the mapping
        id: i64,
    },

    /// Delete a mapping record
    Remove {
        /// ID of the mapping
        id: i64,
    },
}
