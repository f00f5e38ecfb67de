//! Serve command handler: run the gateway until interrupted.

use std::net::IpAddr;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use tokio::net::TcpListener;
use tokio_util::sync::CancellationToken;
use tracing::warn;
use url::Url;

use portico_core::dispatch::{DefaultEntry, DispatchHandle, DispatchTable};
use portico_gateway::reconcile::Reconciler;
use portico_gateway::{GatewayConfig, GatewayState, serve};

use crate::bootstrap::CliContext;

/// Options for the serve command, straight from the parsed CLI.
pub struct ServeArgs {
    pub host: IpAddr,
    pub port: u16,
    pub default_upstream: Url,
    pub refresh_secs: u64,
    pub upstream_timeout_secs: u64,
}

/// Execute the serve command.
///
/// Order matters here: one reconciliation pass runs before the listener
/// starts accepting so the very first request already sees a populated
/// table, and the listener is bound before the background loop spawns so
/// bind failures surface immediately.
pub async fn execute(ctx: &CliContext, args: ServeArgs) -> Result<()> {
    let mut config = GatewayConfig::new(args.default_upstream);
    config.host = args.host;
    config.port = args.port;
    config.refresh_interval = Duration::from_secs(args.refresh_secs);
    config.upstream_timeout = Duration::from_secs(args.upstream_timeout_secs);
    config.validate()?;

    let default_entry = DefaultEntry::new(config.default_upstream.clone());
    let dispatch = Arc::new(DispatchHandle::new(DispatchTable::empty(
        default_entry.clone(),
    )));

    // A store failure on the first pass is a warning, not a startup abort;
    // the loop self-heals once the store is reachable again.
    let mut reconciler = Reconciler::new(
        Arc::clone(&ctx.store),
        Arc::clone(&dispatch),
        default_entry,
        config.fetch_timeout,
    );
    if let Err(error) = reconciler.run_once().await {
        warn!(%error, "initial reconciliation failed; starting with the default-only table");
    }

    let listener = TcpListener::bind(config.bind_addr()).await?;
    let addr = listener.local_addr()?;

    let reconciler_handle = reconciler.spawn(config.refresh_interval);

    let state = GatewayState::new(&config, Arc::clone(&ctx.store), dispatch)?;
    let cancel = CancellationToken::new();
    let server = tokio::spawn(serve(listener, state, cancel.clone()));

    println!("portico gateway listening on http://{addr}");
    println!("Default upstream: {}", config.default_upstream);
    println!("Admin API:        http://{addr}/api/routes");
    println!("Refresh interval: {}s", config.refresh_interval.as_secs());
    println!("Press Ctrl+C to stop");

    tokio::signal::ctrl_c().await?;
    println!("\nShutting down...");

    cancel.cancel();
    reconciler_handle.shutdown().await;
    server.await??;

    Ok(())
}
