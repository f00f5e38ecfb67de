//! Admin API handlers: CRUD over persisted mapping records.
//!
//! Handlers are thin wrappers over the `MappingStore` port: validate the
//! operator's input, call the store, wrap the result in the `{ "data": .. }`
//! envelope. Changes land in the dispatch table on the next reconciliation
//! pass, not immediately.

use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use serde::Serialize;

use portico_core::domain::{Mapping, MappingUpdate, NewMapping};

use crate::error::HttpError;
use crate::server::GatewayState;

/// Response envelope for admin payloads.
#[derive(Debug, Serialize)]
pub struct Envelope<T> {
    pub data: T,
}

/// List all mapping records, enabled or not.
pub async fn list(
    State(state): State<GatewayState>,
) -> Result<Json<Envelope<Vec<Mapping>>>, HttpError> {
    let data = state.store().list().await?;
    Ok(Json(Envelope { data }))
}

/// Create a mapping record. New records default to disabled.
pub async fn create(
    State(state): State<GatewayState>,
    Json(req): Json<NewMapping>,
) -> Result<(StatusCode, Json<Envelope<Mapping>>), HttpError> {
    req.validate()?;
    let data = state.store().create(&req).await?;
    Ok((StatusCode::CREATED, Json(Envelope { data })))
}

/// Apply a partial update to a mapping record.
pub async fn update(
    State(state): State<GatewayState>,
    Path(id): Path<i64>,
    Json(req): Json<MappingUpdate>,
) -> Result<Json<Envelope<Mapping>>, HttpError> {
    req.validate()?;
    let data = state.store().update(id, &req).await?;
    Ok(Json(Envelope { data }))
}

/// Delete a mapping record.
pub async fn remove(
    State(state): State<GatewayState>,
    Path(id): Path<i64>,
) -> Result<StatusCode, HttpError> {
    state.store().delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
