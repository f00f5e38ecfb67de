//! Request forwarding to upstream services.
//!
//! This module rewrites the matched request for its upstream (prefix strip
//! for mapped entries, path passthrough for the default), stamps the marker
//! `User-Agent`, and relays the upstream response back with streaming
//! support. A request that cannot reach its upstream answers `502` with a
//! body naming the failure kind; the gateway never retries.

use axum::{
    body::Body,
    http::{header, HeaderMap, Method, StatusCode},
    response::{IntoResponse, Response},
};
use bytes::Bytes;
use futures_util::TryStreamExt;
use reqwest::Client;
use serde::Serialize;
use thiserror::Error;
use tracing::{debug, error};
use url::Url;

use portico_core::Selection;

use crate::config::MARKER_USER_AGENT;

/// Hop-by-hop headers, stripped in both directions.
const HOP_BY_HOP_HEADERS: &[&str] = &[
    "connection",
    "keep-alive",
    "proxy-authenticate",
    "proxy-authorization",
    "te",
    "trailers",
    "transfer-encoding",
    "upgrade",
    // Recomputed for the rewritten request
    "host",
    "content-length",
];

/// Whether a header crosses the gateway boundary.
fn should_forward_header(name: &str) -> bool {
    let lower = name.to_lowercase();
    !HOP_BY_HOP_HEADERS.contains(&lower.as_str())
}

/// Why an exchange with the upstream could not be completed.
#[derive(Debug, Error)]
enum UpstreamError {
    #[error("upstream request timed out: {0}")]
    Timeout(String),

    #[error("could not reach upstream: {0}")]
    Connect(String),

    #[error("upstream request failed: {0}")]
    Request(String),
}

impl UpstreamError {
    fn classify(err: &reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::Timeout(err.to_string())
        } else if err.is_connect() {
            Self::Connect(err.to_string())
        } else {
            Self::Request(err.to_string())
        }
    }

    /// Stable failure-kind token used in the `502` body.
    const fn kind(&self) -> &'static str {
        match self {
            Self::Timeout(_) => "upstream_timeout",
            Self::Connect(_) => "upstream_unreachable",
            Self::Request(_) => "upstream_error",
        }
    }

    fn detail(&self) -> &str {
        match self {
            Self::Timeout(detail) | Self::Connect(detail) | Self::Request(detail) => detail,
        }
    }
}

/// Body of a gateway-produced `502` response.
#[derive(Serialize)]
struct GatewayErrorBody {
    error: &'static str,
    detail: String,
}

/// Rewrite the request path for the selected upstream.
///
/// A mapped entry strips its matched prefix and appends the remainder to the
/// target's path. The default entry keeps the path as-is; its target only
/// contributes scheme, host and port. The query string is carried over
/// unchanged in both cases.
fn upstream_url(selection: Selection<'_>, path: &str, query: Option<&str>) -> Url {
    let mut url = selection.target().clone();
    match selection {
        Selection::Entry(entry) => {
            let base = url.path().trim_end_matches('/').to_string();
            let remainder = &path[entry.prefix.len()..];
            url.set_path(&format!("{base}{remainder}"));
        }
        Selection::Default(_) => {
            url.set_path(path);
        }
    }
    url.set_query(query);
    url
}

/// Forward a request to the upstream chosen by table lookup.
///
/// The method, body and headers are preserved, except for hop-by-hop
/// headers and the `User-Agent`, which is replaced by the gateway marker.
/// The upstream response is relayed verbatim: status, headers and a
/// streamed body. A send failure produces `502` with the failure kind and
/// detail; the request is never retried.
pub async fn forward_request(
    client: &Client,
    selection: Selection<'_>,
    method: Method,
    path: &str,
    query: Option<&str>,
    headers: &HeaderMap,
    body: Bytes,
) -> Response {
    let url = upstream_url(selection, path, query);
    debug!("Forwarding {method} {path} to {url}");

    let mut req_builder = client.request(method, url.clone());

    for (name, value) in headers.iter() {
        // Replaced by the marker below
        if name == &header::USER_AGENT {
            continue;
        }
        if should_forward_header(name.as_str())
            && let Ok(value_str) = value.to_str()
        {
            req_builder = req_builder.header(name.as_str(), value_str);
        }
    }
    req_builder = req_builder.header(header::USER_AGENT, MARKER_USER_AGENT);

    match req_builder.body(body).send().await {
        Ok(response) => relay_response(response),
        Err(e) => {
            let err = UpstreamError::classify(&e);
            error!("Forwarding to {url} failed: {err}");
            (
                StatusCode::BAD_GATEWAY,
                axum::Json(GatewayErrorBody {
                    error: err.kind(),
                    detail: err.detail().to_string(),
                }),
            )
                .into_response()
        }
    }
}

/// Relay the upstream response: same status, forwardable headers, and the
/// body as a stream so large or slow upstream responses are not buffered.
fn relay_response(upstream: reqwest::Response) -> Response {
    let mut builder = Response::builder().status(upstream.status());
    for (name, value) in upstream.headers() {
        if should_forward_header(name.as_str()) {
            builder = builder.header(name.as_str(), value.clone());
        }
    }

    // Body::from_stream wants io::Error items
    let stream = upstream.bytes_stream().map_err(std::io::Error::other);

    builder
        .body(Body::from_stream(stream))
        .unwrap_or_else(|_| StatusCode::INTERNAL_SERVER_ERROR.into_response())
}

#[cfg(test)]
mod tests {
    use portico_core::{DefaultEntry, DispatchEntry};

    use super::*;

    fn entry(prefix: &str, target: &str) -> DispatchEntry {
        DispatchEntry {
            prefix: prefix.to_string(),
            target: Url::parse(target).unwrap(),
        }
    }

    #[test]
    fn test_should_forward_header() {
        // Should forward
        assert!(should_forward_header("accept"));
        assert!(should_forward_header("content-type"));
        assert!(should_forward_header("authorization"));
        assert!(should_forward_header("x-custom-header"));

        // Should NOT forward
        assert!(!should_forward_header("connection"));
        assert!(!should_forward_header("host"));
        assert!(!should_forward_header("content-length"));
        assert!(!should_forward_header("transfer-encoding"));
    }

    #[test]
    fn test_upstream_url_strips_matched_prefix() {
        let entry = entry("/v1", "http://internal");
        let url = upstream_url(Selection::Entry(&entry), "/v1/products/123", None);
        assert_eq!(url.as_str(), "http://internal/products/123");
    }

    #[test]
    fn test_upstream_url_exact_prefix_match_hits_target_root() {
        let entry = entry("/v1", "http://internal");
        let url = upstream_url(Selection::Entry(&entry), "/v1", None);
        assert_eq!(url.as_str(), "http://internal/");
    }

    #[test]
    fn test_upstream_url_appends_to_target_base_path() {
        let entry = entry("/shop", "http://internal/api/");
        let url = upstream_url(Selection::Entry(&entry), "/shop/products", None);
        assert_eq!(url.as_str(), "http://internal/api/products");
    }

    #[test]
    fn test_upstream_url_default_passes_path_through() {
        let default = DefaultEntry::new(Url::parse("http://fallback.internal:8080").unwrap());
        let url = upstream_url(Selection::Default(&default), "/anything/here", None);
        assert_eq!(url.as_str(), "http://fallback.internal:8080/anything/here");
    }

    #[test]
    fn test_upstream_url_preserves_query() {
        let entry = entry("/v1", "http://internal");
        let url = upstream_url(
            Selection::Entry(&entry),
            "/v1/products",
            Some("page=2&per_page=10"),
        );
        assert_eq!(
            url.as_str(),
            "http://internal/products?page=2&per_page=10"
        );
    }
}
