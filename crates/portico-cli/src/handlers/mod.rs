//! Command handlers.
//!
//! Handlers follow the canonical pattern:
//! - Signature: `pub async fn execute(ctx: &CliContext, ...) -> Result<()>`
//! - Thin wrappers that validate CLI-specific input, call the mapping store
//!   or start the gateway, and format output for the terminal.
//!
//! Handlers should NOT access the database pool directly or contain
//! dispatch logic.

pub mod routes;
pub mod serve;
