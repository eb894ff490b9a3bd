//! Conan v2 registry client
//!
//! Two endpoints are used:
//!
//! | Purpose   | Request                                                         |
//! |-----------|-----------------------------------------------------------------|
//! | search    | `GET {url}/v2/{kind}/search?q=<name>` → `{ "results": [..] }`    |
//! | revisions | `GET {url}/v2/{kind}/{name}/{version}/{user}/{channel}/revisions` |
//!
//! `url` is the API root of one remote, for example
//! `https://artifactory.example.com/artifactory/api/conan/conan-local`, and `kind`
//! is `conans` for recipe references.
//!
//! # Examples
//!
//! ```rust,no_run
//! use conan_sync::registry::{Registry, RegistryClient};
//!
//! # async fn example() -> anyhow::Result<()> {
//! let registry = Registry::new("conancenter", "https://center2.conan.io");
//! let client = RegistryClient::new();
//! for reference in client.search(&registry, "zlib").await? {
//!     println!("{reference}");
//! }
//! # Ok(())
//! # }
//! ```

pub mod transport;

pub use transport::{Header, HttpTransport, JsonTransport};

use crate::core::SyncError;
use crate::reference::PackageReference;
use reqwest::Url;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Reference kind used for recipe endpoints.
pub const DEFAULT_KIND: &str = "conans";

/// One configured remote.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Registry {
    /// Remote name, reported as `remote` on discovered versions
    pub name: String,
    /// API root of the remote, without trailing `/v2`
    pub url: String,
    /// Endpoint kind segment, `conans` unless overridden
    pub kind: String,
    /// Optional bearer token
    pub token: Option<String>,
}

impl Registry {
    /// Create a registry with the default kind and no token.
    pub fn new(name: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            url: url.into(),
            kind: DEFAULT_KIND.to_string(),
            token: None,
        }
    }

    /// Override the endpoint kind.
    #[must_use]
    pub fn with_kind(mut self, kind: impl Into<String>) -> Self {
        self.kind = kind.into();
        self
    }

    /// Authenticate requests with a bearer token.
    #[must_use]
    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    fn base(&self) -> &str {
        self.url.trim_end_matches('/')
    }

    /// Search endpoint for `package`, with the query URL-encoded.
    ///
    /// # Errors
    ///
    /// Returns [`SyncError::ConfigError`] if the registry URL is not a valid URL.
    pub fn search_url(&self, package: &str) -> Result<String, SyncError> {
        let endpoint = format!("{}/v2/{}/search", self.base(), self.kind);
        Url::parse_with_params(&endpoint, &[("q", package)])
            .map(String::from)
            .map_err(|e| SyncError::ConfigError {
                message: format!("invalid URL for registry '{}': {e}", self.name),
            })
    }

    /// Revisions endpoint for `package_path` (`name/version`) in `user_channel`.
    #[must_use]
    pub fn revisions_url(&self, package_path: &str, user_channel: &str) -> String {
        format!("{}/v2/{}/{}/{}/revisions", self.base(), self.kind, package_path, user_channel)
    }

    /// Browse location of a reference: `{url}/_/name/version` for the default
    /// namespace, `{url}/user/name/version` otherwise.
    #[must_use]
    pub fn package_url(&self, reference: &PackageReference) -> String {
        format!(
            "{}/{}/{}/{}",
            self.base(),
            reference.namespace_segment(),
            reference.name,
            reference.version
        )
    }

    fn headers(&self) -> Vec<Header> {
        let mut headers = vec![("Accept".to_string(), "application/json".to_string())];
        if let Some(token) = &self.token {
            headers.push(("Authorization".to_string(), format!("Bearer {token}")));
        }
        headers
    }
}

/// Body of the search endpoint.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchResponse {
    /// Raw reference strings, in registry order
    #[serde(default)]
    pub results: Vec<String>,
}

/// Body of the revisions endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RevisionsResponse {
    /// The reference the revisions belong to
    pub reference: String,
    /// Revisions in registry order; the first is the most recent
    #[serde(default)]
    pub revisions: Vec<RevisionRecord>,
}

/// One revision record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RevisionRecord {
    /// Revision hash
    pub revision: String,
    /// Upload time, ISO-8601 with offset
    pub time: String,
}

/// Typed access to the registry endpoints.
#[derive(Debug, Clone, Default)]
pub struct RegistryClient<T = HttpTransport> {
    transport: T,
}

impl RegistryClient<HttpTransport> {
    /// Client using [`HttpTransport`].
    #[must_use]
    pub fn new() -> Self {
        Self::with_transport(HttpTransport::new())
    }
}

impl<T: JsonTransport> RegistryClient<T> {
    /// Client over an arbitrary transport.
    pub const fn with_transport(transport: T) -> Self {
        Self {
            transport,
        }
    }

    /// The underlying transport.
    pub const fn transport(&self) -> &T {
        &self.transport
    }

    /// Raw reference strings matching `package`, in registry order.
    ///
    /// The registry performs its own (substring) matching; callers filter.
    pub async fn search(&self, registry: &Registry, package: &str) -> Result<Vec<String>, SyncError> {
        let url = registry.search_url(package)?;
        debug!("Searching registry '{}' for '{}'", registry.name, package);

        let response: SearchResponse = self.fetch(registry, &url).await?;
        debug!("Registry '{}' returned {} result(s)", registry.name, response.results.len());
        Ok(response.results)
    }

    /// Revisions of `package_path@user_channel`, in registry order.
    pub async fn revisions(
        &self,
        registry: &Registry,
        package_path: &str,
        user_channel: &str,
    ) -> Result<RevisionsResponse, SyncError> {
        let url = registry.revisions_url(package_path, user_channel);
        debug!("Fetching revisions of {}@{} from '{}'", package_path, user_channel, registry.name);
        self.fetch(registry, &url).await
    }

    async fn fetch<R: DeserializeOwned>(&self, registry: &Registry, url: &str) -> Result<R, SyncError> {
        let value = self.transport.get_json(url, &registry.headers()).await?;
        serde_json::from_value(value).map_err(|e| SyncError::InvalidResponse {
            url: url.to_string(),
            reason: e.to_string(),
        })
    }
}
