//! Axum HTTP server for the gateway.
//!
//! One listening port, two surfaces: the reserved `/api` paths carry the
//! admin CRUD routes and the health endpoint; every other path and method
//! falls through to the proxy handler, which consults the published
//! dispatch table and forwards to the selected upstream.

use std::sync::Arc;

use axum::{
    Router,
    body::Bytes,
    extract::State,
    http::{HeaderMap, Method, Uri},
    response::Response,
    routing::{get, put},
};
use reqwest::Client;
use tokio::net::TcpListener;
use tokio_util::sync::CancellationToken;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::info;

use portico_core::dispatch::DispatchHandle;
use portico_core::ports::MappingStore;

use crate::admin;
use crate::config::GatewayConfig;
use crate::forward::forward_request;

/// Shared application state for the gateway server.
#[derive(Clone)]
pub struct GatewayState {
    /// Pooled HTTP client for upstream calls.
    client: Client,
    /// The published dispatch table; one atomic load per proxied request.
    dispatch: Arc<DispatchHandle>,
    /// Mapping persistence, used by the admin surface only.
    store: Arc<dyn MappingStore>,
}

impl GatewayState {
    /// Build the state, including the outbound client with the configured
    /// connect and total-request timeouts.
    pub fn new(
        config: &GatewayConfig,
        store: Arc<dyn MappingStore>,
        dispatch: Arc<DispatchHandle>,
    ) -> anyhow::Result<Self> {
        let client = Client::builder()
            .connect_timeout(config.connect_timeout)
            .timeout(config.upstream_timeout)
            .pool_max_idle_per_host(10)
            .build()?;

        Ok(Self {
            client,
            dispatch,
            store,
        })
    }

    pub(crate) fn store(&self) -> &Arc<dyn MappingStore> {
        &self.store
    }
}

/// Admin routes, mounted under `/api` by [`build_router`].
///
/// An unregistered method on a registered path answers 405 here; it is
/// never proxied to an upstream that has no idea about it.
fn admin_routes() -> Router<GatewayState> {
    // The admin surface is driven from browser clients, hence the
    // permissive CORS. The proxy surface relays CORS headers untouched.
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/routes", get(admin::list).post(admin::create))
        .route("/routes/{id}", put(admin::update).delete(admin::remove))
        .route("/health", get(health_check))
        .layer(cors)
}

/// Create the gateway router: admin surface under `/api`, proxy fallback
/// for everything else.
///
/// Axum 0.8 uses brace syntax for path parameters: `{id}`.
pub fn build_router(state: GatewayState) -> Router {
    Router::new()
        .nest("/api", admin_routes())
        .fallback(proxy_request)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Start the gateway with a pre-bound listener.
///
/// Runs until the cancellation token is triggered. Callers bind the
/// listener first so bind failures surface before any background work
/// starts.
pub async fn serve(
    listener: TcpListener,
    state: GatewayState,
    cancel: CancellationToken,
) -> anyhow::Result<()> {
    let addr = listener.local_addr()?;
    info!("gateway listening on {addr}");

    let app = build_router(state);

    axum::serve(listener, app)
        .with_graceful_shutdown(cancel.cancelled_owned())
        .await?;

    info!("gateway shut down");
    Ok(())
}

/// Catch-all handler: every request outside `/api` lands here.
///
/// One atomic table load, one first-match-wins selection, then the
/// forwarder does the rest. Selection never fails; the default entry
/// claims whatever no mapping does.
async fn proxy_request(
    State(state): State<GatewayState>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    let table = state.dispatch.load();
    let selection = table.select(uri.path());
    forward_request(
        &state.client,
        selection,
        method,
        uri.path(),
        uri.query(),
        &headers,
        body,
    )
    .await
}

/// Health check endpoint.
async fn health_check() -> &'static str {
    "OK"
}

#[cfg(test)]
mod tests {
    use axum::response::IntoResponse;

    use super::*;

    #[tokio::test]
    async fn test_health_check() {
        let response = health_check().await.into_response();
        assert_eq!(response.status(), axum::http::StatusCode::OK);
    }
}
