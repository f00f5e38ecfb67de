//! Gateway configuration.
//!
//! Listening address, the fixed default upstream, the reconciliation period,
//! and the outbound timeouts. Validated once at startup; invalid values are
//! a bootstrap error, never a runtime surprise.

use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::time::Duration;

use thiserror::Error;
use url::Url;

/// Default listening port.
pub const DEFAULT_PORT: u16 = 3001;

/// Default period between reconciliation ticks (5 minutes).
pub const DEFAULT_REFRESH_INTERVAL: Duration = Duration::from_secs(300);

/// Default bound on a single store fetch inside the reconciler.
pub const DEFAULT_FETCH_TIMEOUT: Duration = Duration::from_secs(10);

/// Default TCP connect timeout for upstream calls.
pub const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

/// Default total deadline for an upstream call, response body included.
pub const DEFAULT_UPSTREAM_TIMEOUT: Duration = Duration::from_secs(30);

/// Marker value set as `User-Agent` on every forwarded request, so upstreams
/// can tell gateway traffic apart from direct clients.
pub const MARKER_USER_AGENT: &str = concat!("portico/", env!("CARGO_PKG_VERSION"));

/// Runtime configuration for the gateway process.
#[derive(Debug, Clone)]
pub struct GatewayConfig {
    /// Address to bind.
    pub host: IpAddr,
    /// Port to listen on.
    pub port: u16,
    /// Upstream that receives every request no mapping claims.
    pub default_upstream: Url,
    /// Period between reconciliation ticks.
    pub refresh_interval: Duration,
    /// Bound on a single store fetch.
    pub fetch_timeout: Duration,
    /// TCP connect timeout for upstream calls.
    pub connect_timeout: Duration,
    /// Total deadline for an upstream call.
    pub upstream_timeout: Duration,
}

/// Configuration validation failures.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("refresh interval must be at least 1 second")]
    RefreshIntervalTooShort,

    #[error("default upstream must be an http(s) URL, got scheme '{0}'")]
    UnsupportedUpstreamScheme(String),
}

impl GatewayConfig {
    /// Config with house defaults for everything except the default
    /// upstream, which has no sensible built-in value.
    pub const fn new(default_upstream: Url) -> Self {
        Self {
            host: IpAddr::V4(Ipv4Addr::LOCALHOST),
            port: DEFAULT_PORT,
            default_upstream,
            refresh_interval: DEFAULT_REFRESH_INTERVAL,
            fetch_timeout: DEFAULT_FETCH_TIMEOUT,
            connect_timeout: DEFAULT_CONNECT_TIMEOUT,
            upstream_timeout: DEFAULT_UPSTREAM_TIMEOUT,
        }
    }

    /// The socket address to bind.
    pub const fn bind_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }

    /// Reject configurations the gateway cannot run with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.refresh_interval < Duration::from_secs(1) {
            return Err(ConfigError::RefreshIntervalTooShort);
        }
        let scheme = self.default_upstream.scheme();
        if scheme != "http" && scheme != "https" {
            return Err(ConfigError::UnsupportedUpstreamScheme(scheme.to_string()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_config() -> GatewayConfig {
        GatewayConfig::new(Url::parse("https://fallback.example.com").unwrap())
    }

    #[test]
    fn test_defaults_validate() {
        let config = make_config();
        assert!(config.validate().is_ok());
        assert_eq!(config.port, 3001);
        assert_eq!(config.refresh_interval, Duration::from_secs(300));
    }

    #[test]
    fn test_rejects_subsecond_refresh() {
        let mut config = make_config();
        config.refresh_interval = Duration::from_millis(200);
        assert_eq!(
            config.validate(),
            Err(ConfigError::RefreshIntervalTooShort)
        );
    }

    #[test]
    fn test_rejects_non_http_default_upstream() {
        let mut config = make_config();
        config.default_upstream = Url::parse("ftp://fallback.example.com").unwrap();
        assert_eq!(
            config.validate(),
            Err(ConfigError::UnsupportedUpstreamScheme("ftp".to_string()))
        );
    }

    #[test]
    fn test_marker_identifies_gateway() {
        assert!(MARKER_USER_AGENT.starts_with("portico/"));
    }
}
