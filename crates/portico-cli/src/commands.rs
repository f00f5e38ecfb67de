//! Main commands enum and primary subcommands.

use std::net::IpAddr;

use clap::Subcommand;
use url::Url;

use crate::routes_commands::RoutesCommand;

/// Available commands for the portico gateway.
#[derive(Subcommand)]
pub enum Commands {
    /// Run the gateway: proxy entry point and admin API on one port
    Serve {
        /// Host to bind to
        #[arg(long, default_value = "127.0.0.1")]
        host: IpAddr,

        /// Port to listen on
        #[arg(short, long, default_value = "3001")]
        port: u16,

        /// Upstream that receives every request no mapping claims
        #[arg(long, value_name = "URL")]
        default_upstream: Url,

        /// Seconds between reconciliation passes against the mapping store
        #[arg(long, default_value = "300")]
        refresh_secs: u64,

        /// Seconds before an upstream call is abandoned as failed
        #[arg(long, default_value = "30")]
        upstream_timeout_secs: u64,
    },

    /// Manage persisted mapping records
    Routes {
        #[command(subcommand)]
        command: RoutesCommand,
    },
}
