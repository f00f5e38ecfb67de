//! Command-line interface for the portico gateway.
//!
//! `portico serve` boots the whole system: mapping store, initial
//! reconciliation, the background refresh loop, and the HTTP server. The
//! `portico routes` subcommands manage mapping records through the same
//! store port the HTTP admin API uses.

#![deny(unsafe_code)]

pub mod bootstrap;
pub mod commands;
pub mod handlers;
pub mod parser;
pub mod presentation;
pub mod routes_commands;

// Re-export primary types for convenient access
pub use bootstrap::{CliConfig, CliContext, bootstrap, bootstrap_with};
pub use commands::Commands;
pub use parser::Cli;
pub use routes_commands::RoutesCommand;
