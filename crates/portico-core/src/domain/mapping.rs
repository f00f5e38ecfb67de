//! Mapping record types.
//!
//! The wire shape is camelCase (`targetUrl`, `isEnabled`) because the admin
//! API and its clients exchange records in that form; the Rust fields stay
//! snake_case.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use url::Url;

/// A persisted mapping rule: requests whose path starts with `path` are
/// forwarded to `target_url`, with the prefix stripped.
///
/// Only records with `is_enabled == true` participate in dispatch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Mapping {
    /// Database ID (always present for persisted records).
    pub id: i64,

    /// Path prefix a request must start with to match. Unique across records.
    pub path: String,

    /// Absolute URL of the upstream this prefix forwards to.
    pub target_url: String,

    /// Whether this record participates in dispatch.
    pub is_enabled: bool,

    /// Operator-facing note; never consulted by dispatch logic.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A mapping to be inserted. New records default to disabled so an operator
/// can stage a mapping before it starts taking traffic.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewMapping {
    pub path: String,
    pub target_url: String,
    #[serde(default)]
    pub is_enabled: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// Partial update for an existing mapping. `None` fields are left untouched.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MappingUpdate {
    pub path: Option<String>,
    pub target_url: Option<String>,
    pub is_enabled: Option<bool>,
    pub description: Option<String>,
}

impl MappingUpdate {
    /// True when the update carries no changes at all.
    pub fn is_empty(&self) -> bool {
        self.path.is_none()
            && self.target_url.is_none()
            && self.is_enabled.is_none()
            && self.description.is_none()
    }
}

/// Validation failures for operator-supplied mapping fields.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("path cannot be empty")]
    EmptyPath,

    #[error("path must start with '/': {0}")]
    RelativePath(String),

    #[error("targetUrl is not a valid absolute URL: {0}")]
    InvalidTargetUrl(String),
}

fn validate_path(path: &str) -> Result<(), ValidationError> {
    if path.is_empty() {
        return Err(ValidationError::EmptyPath);
    }
    if !path.starts_with('/') {
        return Err(ValidationError::RelativePath(path.to_string()));
    }
    Ok(())
}

fn validate_target_url(raw: &str) -> Result<(), ValidationError> {
    Url::parse(raw).map_err(|e| ValidationError::InvalidTargetUrl(format!("{raw}: {e}")))?;
    Ok(())
}

impl NewMapping {
    /// Check the fields an operator supplies at creation time.
    ///
    /// The dispatch table builder re-checks `target_url` when it builds
    /// entries; records can predate this validation.
    pub fn validate(&self) -> Result<(), ValidationError> {
        validate_path(&self.path)?;
        validate_target_url(&self.target_url)
    }
}

impl MappingUpdate {
    /// Check whichever fields the update actually carries.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if let Some(path) = &self.path {
            validate_path(path)?;
        }
        if let Some(target_url) = &self.target_url {
            validate_target_url(target_url)?;
        }
        Ok(())
    }
}
