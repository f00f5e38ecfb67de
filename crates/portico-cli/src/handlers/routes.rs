//! Route management command handlers.
//!
//! Thin wrappers over the `MappingStore` port; a running gateway sees the
//! changes on its next refresh cycle.

use anyhow::Result;

use portico_core::domain::{MappingUpdate, NewMapping};

use crate::bootstrap::CliContext;
use crate::presentation::{enabled_marker, print_separator, truncate};
use crate::routes_commands::RoutesCommand;

/// Dispatch a `routes` subcommand.
pub async fn execute(ctx: &CliContext, command: RoutesCommand) -> Result<()> {
    match command {
        RoutesCommand::List => list(ctx).await,
        RoutesCommand::Add {
            path,
            target_url,
            description,
            enable,
        } => add(ctx, path, target_url, description, enable).await,
        RoutesCommand::Enable { id } => set_enabled(ctx, id, true).await,
        RoutesCommand::Disable { id } => set_enabled(ctx, id, false).await,
        RoutesCommand::Remove { id } => remove(ctx, id).await,
    }
}

async fn list(ctx: &CliContext) -> Result<()> {
    let mappings = ctx.store.list().await?;

    if mappings.is_empty() {
        println!("No mappings found.");
        println!("Use 'portico routes add <PATH> <TARGET_URL>' to add your first mapping.");
        return Ok(());
    }

    println!("Found {} mapping(s):\n", mappings.len());
    println!(
        "{:<4} {:<8} {:<28} {:<40} Description",
        "ID", "Enabled", "Path", "Target"
    );
    print_separator(100);

    for mapping in mappings {
        println!(
            "{:<4} {:<8} {:<28} {:<40} {}",
            mapping.id,
            enabled_marker(mapping.is_enabled),
            truncate(&mapping.path, 27),
            truncate(&mapping.target_url, 39),
            mapping.description.as_deref().unwrap_or("--"),
        );
    }

    Ok(())
}

async fn add(
    ctx: &CliContext,
    path: String,
    target_url: String,
    description: Option<String>,
    enable: bool,
) -> Result<()> {
    let new_mapping = NewMapping {
        path,
        target_url,
        is_enabled: enable,
        description,
    };
    new_mapping.validate()?;

    let created = ctx.store.create(&new_mapping).await?;
    println!(
        "Added mapping {}: {} -> {}",
        created.id, created.path, created.target_url
    );
    if created.is_enabled {
        println!("Enabled; takes traffic from the gateway's next refresh on.");
    } else {
        println!(
            "Staged disabled; run 'portico routes enable {}' to activate it.",
            created.id
        );
    }
    Ok(())
}

async fn set_enabled(ctx: &CliContext, id: i64, enabled: bool) -> Result<()> {
    let update = MappingUpdate {
        is_enabled: Some(enabled),
        ..MappingUpdate::default()
    };
    let updated = ctx.store.update(id, &update).await?;
    println!(
        "Mapping {} ({}) is now {}",
        updated.id,
        updated.path,
        if updated.is_enabled {
            "enabled"
        } else {
            "disabled"
        }
    );
    Ok(())
}

async fn remove(ctx: &CliContext, id: i64) -> Result<()> {
    ctx.store.delete(id).await?;
    println!("Removed mapping {id}");
    Ok(())
}
