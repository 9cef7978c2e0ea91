//! Server base URL resolution.

use url::Url;

/// Base URL used for `"production"` and when no hostname is configured.
pub const PRODUCTION_URL: &str = "https://api.scorbit.io:443";
/// Base URL used for `"staging"`.
pub const STAGING_URL: &str = "https://staging.scorbit.io:443";

/// Scheme, host and port of a server URL.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UrlInfo {
    /// `http`, `https`, `ws` or `wss`.
    pub protocol: String,
    /// Host name or address.
    pub hostname: String,
    /// Explicit port, or the scheme's default.
    pub port: u16,
}

impl UrlInfo {
    /// Returns `scheme://host:port`.
    #[must_use]
    pub fn base_url(&self) -> String {
        format!("{}://{}:{}", self.protocol, self.hostname, self.port)
    }
}

/// Extracts scheme, host and port from `text`, dropping path and query.
///
/// Only `http`, `https`, `ws` and `wss` are accepted. A missing port
/// defaults to 443 for the secure schemes and 80 otherwise.
#[must_use]
pub fn extract_host_and_port(text: &str) -> Option<UrlInfo> {
    let url = Url::parse(text).ok()?;
    let default_port = match url.scheme() {
        "https" | "wss" => 443,
        "http" | "ws" => 80,
        _ => return None,
    };
    let hostname = url.host_str()?.to_owned();
    Some(UrlInfo {
        protocol: url.scheme().to_owned(),
        hostname,
        port: url.port().unwrap_or(default_port),
    })
}

/// Maps a configured hostname to the server base URL.
///
/// `"production"` (or empty) and `"staging"` are symbolic; anything else is
/// parsed with [`extract_host_and_port`]. Returns `Err` with the production
/// URL when the hostname cannot be parsed, so the caller can warn and carry
/// on.
pub fn resolve_hostname(hostname: &str) -> Result<String, String> {
    match hostname.trim() {
        "" | "production" => Ok(PRODUCTION_URL.to_owned()),
        "staging" => Ok(STAGING_URL.to_owned()),
        other => extract_host_and_port(other)
            .map(|info| info.base_url())
            .ok_or_else(|| PRODUCTION_URL.to_owned()),
    }
}
