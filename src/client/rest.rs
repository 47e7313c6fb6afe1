//! Admin REST API client
//!
//! Wraps a single reqwest client with basic-auth credentials and a uniform
//! per-request timeout. Also owns cluster-address normalization: every
//! request URL in the pipeline is derived from one normalized base address.

use std::time::Duration;

use reqwest::header::CONTENT_TYPE;
use serde_json::Value;
use tracing::debug;

use crate::utils::{ExportError, Result};

/// Default port of the cluster admin REST API
pub const DEFAULT_ADMIN_PORT: u16 = 8091;

/// Default port of the node-local indexer API
pub const DEFAULT_INDEXER_PORT: u16 = 9102;

/// Basic-auth credentials used for every request
#[derive(Debug, Clone)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

/// Normalize a cluster address into a full admin base URL.
///
/// Prefixes `http://` (or `https://` when `secure`) when no scheme is
/// present and appends the default admin port when the authority carries
/// none. Idempotent: normalizing an already-normalized address is a no-op.
pub fn normalize_cluster_address(addr: &str, secure: bool) -> String {
    let addr = addr.trim_end_matches('/');
    let with_scheme = if addr.contains("://") {
        addr.to_string()
    } else if secure {
        format!("https://{addr}")
    } else {
        format!("http://{addr}")
    };

    // Authority is everything between the scheme and the first path segment.
    let scheme_end = match with_scheme.find("://") {
        Some(idx) => idx + 3,
        None => 0,
    };
    let rest = &with_scheme[scheme_end..];
    let authority_end = rest.find('/').unwrap_or(rest.len());
    let authority = &rest[..authority_end];

    let has_port = authority
        .rsplit_once(':')
        .is_some_and(|(_, port)| !port.is_empty() && port.bytes().all(|b| b.is_ascii_digit()));

    if has_port {
        with_scheme
    } else {
        format!(
            "{}{}:{}{}",
            &with_scheme[..scheme_end],
            authority,
            DEFAULT_ADMIN_PORT,
            &rest[authority_end..]
        )
    }
}

/// Authenticated JSON client for the admin and indexer APIs
pub struct ClusterClient {
    http: reqwest::Client,
    credentials: Credentials,
    timeout_ms: u64,
}

impl ClusterClient {
    /// Create a client applying `timeout_ms` uniformly to every request
    pub fn new(credentials: Credentials, timeout_ms: u64) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_millis(timeout_ms))
            .build()
            .map_err(|e| ExportError::Config(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            http,
            credentials,
            timeout_ms,
        })
    }

    /// GET `url` and parse the response body as JSON
    pub async fn get_json(&self, url: &str) -> Result<Value> {
        debug!(url, "GET");

        let response = self
            .http
            .get(url)
            .basic_auth(&self.credentials.username, Some(&self.credentials.password))
            .header(CONTENT_TYPE, "application/json")
            .send()
            .await
            .map_err(|e| ExportError::from_request(e, url, self.timeout_ms))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ExportError::Http {
                url: url.to_string(),
                status: status.as_u16(),
                body,
            });
        }

        let text = response
            .text()
            .await
            .map_err(|e| ExportError::from_request(e, url, self.timeout_ms))?;
        serde_json::from_str(&text)
            .map_err(|e| ExportError::Parse(format!("malformed JSON from {url}: {e}")))
    }

    /// Configured per-request timeout in milliseconds
    pub fn timeout_ms(&self) -> u64 {
        self.timeout_ms
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_bare_host() {
        assert_eq!(
            normalize_cluster_address("localhost", false),
            "http://localhost:8091"
        );
    }

    #[test]
    fn test_normalize_host_with_port() {
        assert_eq!(
            normalize_cluster_address("10.1.2.3:9000", false),
            "http://10.1.2.3:9000"
        );
    }

    #[test]
    fn test_normalize_secure() {
        assert_eq!(
            normalize_cluster_address("cb.example.com", true),
            "https://cb.example.com:8091"
        );
    }

    #[test]
    fn test_normalize_existing_scheme_kept() {
        // An explicit scheme wins over --secure
        assert_eq!(
            normalize_cluster_address("http://cb.example.com", true),
            "http://cb.example.com:8091"
        );
    }

    #[test]
    fn test_normalize_idempotent() {
        for addr in ["localhost", "10.1.2.3:9000", "https://cb.example.com"] {
            for secure in [false, true] {
                let once = normalize_cluster_address(addr, secure);
                let twice = normalize_cluster_address(&once, secure);
                assert_eq!(once, twice, "normalization of {addr} is not idempotent");
            }
        }
    }

    #[test]
    fn test_normalize_trailing_slash() {
        assert_eq!(
            normalize_cluster_address("localhost/", false),
            "http://localhost:8091"
        );
    }
}
