//! In-memory registry transport.

use crate::core::SyncError;
use crate::registry::{Header, JsonTransport, Registry};
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Mutex;

#[derive(Debug, Clone)]
enum Canned {
    Json(Value),
    Status(u16),
    Failure(String),
}

/// A [`JsonTransport`] serving canned responses keyed by exact URL.
///
/// URLs without a canned response answer with HTTP 404. Every request is
/// recorded, so tests can assert that no network call was made.
#[derive(Debug, Default)]
pub struct MockRegistry {
    responses: HashMap<String, Canned>,
    requests: Mutex<Vec<(String, Vec<Header>)>>,
}

impl MockRegistry {
    /// Empty registry; every request is a 404.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Serve `body` for `url`.
    #[must_use]
    pub fn with_json(mut self, url: impl Into<String>, body: Value) -> Self {
        self.responses.insert(url.into(), Canned::Json(body));
        self
    }

    /// Serve `body` for the search endpoint of `package` on `registry`.
    ///
    /// # Panics
    ///
    /// If the registry URL does not parse.
    #[must_use]
    pub fn with_search(self, registry: &Registry, package: &str, body: Value) -> Self {
        let url = registry.search_url(package).expect("registry URL should parse");
        self.with_json(url, body)
    }

    /// Serve `body` for the revisions endpoint of `package_path@user_channel`.
    #[must_use]
    pub fn with_revisions(
        self,
        registry: &Registry,
        package_path: &str,
        user_channel: &str,
        body: Value,
    ) -> Self {
        self.with_json(registry.revisions_url(package_path, user_channel), body)
    }

    /// Answer `url` with a non-2xx status.
    #[must_use]
    pub fn with_status(mut self, url: impl Into<String>, status: u16) -> Self {
        self.responses.insert(url.into(), Canned::Status(status));
        self
    }

    /// Fail `url` at the transport level.
    #[must_use]
    pub fn with_failure(mut self, url: impl Into<String>, reason: impl Into<String>) -> Self {
        self.responses.insert(url.into(), Canned::Failure(reason.into()));
        self
    }

    /// Number of requests served so far.
    pub fn request_count(&self) -> usize {
        self.requests.lock().map(|requests| requests.len()).unwrap_or_default()
    }

    /// Requested URLs, in order.
    pub fn requests(&self) -> Vec<String> {
        self.requests
            .lock()
            .map(|requests| requests.iter().map(|(url, _)| url.clone()).collect())
            .unwrap_or_default()
    }

    /// Headers sent with the most recent request.
    pub fn last_headers(&self) -> Option<Vec<Header>> {
        self.requests.lock().ok()?.last().map(|(_, headers)| headers.clone())
    }
}

impl JsonTransport for MockRegistry {
    async fn get_json(&self, url: &str, headers: &[Header]) -> Result<Value, SyncError> {
        if let Ok(mut requests) = self.requests.lock() {
            requests.push((url.to_string(), headers.to_vec()));
        }

        match self.responses.get(url) {
            Some(Canned::Json(body)) => Ok(body.clone()),
            Some(Canned::Status(status)) => Err(SyncError::HttpStatus {
                url: url.to_string(),
                status: *status,
            }),
            Some(Canned::Failure(reason)) => Err(SyncError::NetworkFailure {
                url: url.to_string(),
                reason: reason.clone(),
            }),
            None => Err(SyncError::HttpStatus {
                url: url.to_string(),
                status: 404,
            }),
        }
    }
}
