//! Integration tests for the routes subcommands.
//!
//! Commands run against an in-memory database through the same store port
//! the gateway uses; assertions read the store back rather than parsing
//! terminal output.

use portico_cli::handlers::routes;
use portico_cli::routes_commands::RoutesCommand;
use portico_cli::{CliContext, bootstrap_with};
use portico_db::TestDb;

async fn make_ctx() -> CliContext {
    let db = TestDb::new().await.unwrap();
    bootstrap_with(db.store())
}

fn add_command(path: &str, target_url: &str, enable: bool) -> RoutesCommand {
    RoutesCommand::Add {
        path: path.to_string(),
        target_url: target_url.to_string(),
        description: None,
        enable,
    }
}

#[tokio::test]
async fn add_stages_mapping_disabled_by_default() {
    let ctx = make_ctx().await;

    routes::execute(&ctx, add_command("/v1/products", "http://internal/products", false))
        .await
        .unwrap();

    let mappings = ctx.store.list().await.unwrap();
    assert_eq!(mappings.len(), 1);
    assert_eq!(mappings[0].path, "/v1/products");
    assert!(!mappings[0].is_enabled);
}

#[tokio::test]
async fn add_with_enable_flag_activates_immediately() {
    let ctx = make_ctx().await;

    routes::execute(&ctx, add_command("/v1", "http://internal/v1", true))
        .await
        .unwrap();

    let mappings = ctx.store.list().await.unwrap();
    assert!(mappings[0].is_enabled);
}

#[tokio::test]
async fn add_rejects_invalid_target_url() {
    let ctx = make_ctx().await;

    let result = routes::execute(&ctx, add_command("/v1", "not a url", false)).await;
    assert!(result.is_err());
    assert!(ctx.store.list().await.unwrap().is_empty());
}

#[tokio::test]
async fn add_rejects_path_without_leading_slash() {
    let ctx = make_ctx().await;

    let result = routes::execute(&ctx, add_command("v1", "http://internal/v1", false)).await;
    assert!(result.is_err());
}

#[tokio::test]
async fn enable_then_disable_round_trip() {
    let ctx = make_ctx().await;
    routes::execute(&ctx, add_command("/v1", "http://internal/v1", false))
        .await
        .unwrap();
    let id = ctx.store.list().await.unwrap()[0].id;

    routes::execute(&ctx, RoutesCommand::Enable { id })
        .await
        .unwrap();
    assert_eq!(ctx.store.list_enabled().await.unwrap().len(), 1);

    routes::execute(&ctx, RoutesCommand::Disable { id })
        .await
        .unwrap();
    assert!(ctx.store.list_enabled().await.unwrap().is_empty());
}

#[tokio::test]
async fn enable_unknown_id_fails() {
    let ctx = make_ctx().await;
    let result = routes::execute(&ctx, RoutesCommand::Enable { id: 42 }).await;
    assert!(result.is_err());
}

#[tokio::test]
async fn remove_deletes_the_record() {
    let ctx = make_ctx().await;
    routes::execute(&ctx, add_command("/v1", "http://internal/v1", true))
        .await
        .unwrap();
    let id = ctx.store.list().await.unwrap()[0].id;

    routes::execute(&ctx, RoutesCommand::Remove { id })
        .await
        .unwrap();
    assert!(ctx.store.list().await.unwrap().is_empty());

    let result = routes::execute(&ctx, RoutesCommand::Remove { id }).await;
    assert!(result.is_err());
}

#[tokio::test]
async fn list_runs_on_empty_and_populated_stores() {
    let ctx = make_ctx().await;
    routes::execute(&ctx, RoutesCommand::List).await.unwrap();

    routes::execute(&ctx, add_command("/v1", "http://internal/v1", true))
        .await
        .unwrap();
    routes::execute(&ctx, RoutesCommand::List).await.unwrap();
}
