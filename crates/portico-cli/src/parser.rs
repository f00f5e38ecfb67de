//! Root CLI parser: global options plus subcommand dispatch.

use std::path::PathBuf;

use clap::Parser;

use crate::commands::Commands;

/// Top-level argument structure for the `portico` binary.
#[derive(Parser)]
#[command(name = "portico")]
#[command(about = "Dynamic path-prefix HTTP gateway with persisted mappings")]
#[command(version)]
pub struct Cli {
    /// Override the mapping database path for this invocation
    #[arg(long = "db", global = true, value_name = "PATH")]
    pub db: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}
