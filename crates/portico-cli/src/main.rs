//! Binary entry point.
//!
//! Wiring happens once, through bootstrap; command dispatch routes to
//! handlers which delegate to the mapping store or the gateway.

use clap::Parser;

use portico_cli::{Cli, CliConfig, Commands, bootstrap, handlers};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::fmt::init();

    // Load environment variables
    dotenvy::dotenv().ok();

    // Parse CLI arguments
    let cli = Cli::parse();

    let Some(command) = cli.command else {
        // No command provided - show help
        use clap::CommandFactory;
        Cli::command().print_help()?;
        return Ok(());
    };

    // Bootstrap the CLI context (composition root)
    let config = CliConfig::resolve(cli.db)?;
    let ctx = bootstrap(config).await?;

    match command {
        Commands::Serve {
            host,
            port,
            default_upstream,
            refresh_secs,
            upstream_timeout_secs,
        } => {
            let args = handlers::serve::ServeArgs {
                host,
                port,
                default_upstream,
                refresh_secs,
                upstream_timeout_secs,
            };
            handlers::serve::execute(&ctx, args).await?;
        }
        Commands::Routes { command } => {
            handlers::routes::execute(&ctx, command).await?;
        }
    }

    Ok(())
}
