//! JSON-over-HTTP transport used by [`RegistryClient`](super::RegistryClient).
//!
//! The transport is a trait so resolvers can be exercised against an in-memory
//! registry. [`HttpTransport`] is the production implementation on top of
//! `reqwest`. A request is attempted exactly once; there is no retry and no
//! timeout beyond what the OS imposes.

use crate::core::SyncError;
use std::future::Future;
use tracing::debug;

/// A single request header as `(name, value)`.
pub type Header = (String, String);

/// Fetches a URL and decodes the body as JSON.
///
/// Implementations must return an error for non-2xx statuses
/// ([`SyncError::HttpStatus`]), transport failures ([`SyncError::NetworkFailure`])
/// and undecodable bodies ([`SyncError::InvalidResponse`]).
pub trait JsonTransport: Send + Sync {
    /// Issue a `GET` for `url` with the given headers.
    fn get_json(
        &self,
        url: &str,
        headers: &[Header],
    ) -> impl Future<Output = Result<serde_json::Value, SyncError>> + Send;
}

/// `reqwest`-backed transport.
#[derive(Debug, Clone, Default)]
pub struct HttpTransport {
    client: reqwest::Client,
}

impl HttpTransport {
    /// Create a transport with a default `reqwest` client.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl JsonTransport for HttpTransport {
    async fn get_json(
        &self,
        url: &str,
        headers: &[Header],
    ) -> Result<serde_json::Value, SyncError> {
        debug!("GET {}", url);

        let mut request = self.client.get(url);
        for (name, value) in headers {
            request = request.header(name.as_str(), value.as_str());
        }

        let response = request.send().await.map_err(|e| SyncError::NetworkFailure {
            url: url.to_string(),
            reason: e.to_string(),
        })?;

        let status = response.status();
        if !status.is_success() {
            return Err(SyncError::HttpStatus {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        response.json::<serde_json::Value>().await.map_err(|e| {
            if e.is_decode() {
                SyncError::InvalidResponse {
                    url: url.to_string(),
                    reason: e.to_string(),
                }
            } else {
                SyncError::NetworkFailure {
                    url: url.to_string(),
                    reason: e.to_string(),
                }
            }
        })
    }
}
