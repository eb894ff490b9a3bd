//! Package resolution against a registry
//!
//! Resolution answers "what is the newest published state of this package?" in
//! two steps:
//!
//! 1. [`VersionResolver`] lists published versions from the search endpoint and
//!    ranks them newest first (see [`crate::version`] for the ordering).
//! 2. [`RevisionResolver`] fetches the latest revision of one reference and
//!    turns it into a lock entry.
//!
//! [`PackageResolver`] combines both into a [`CompletePackageInfo`], the unit the
//! reconciler compares against the project files.
//!
//! All values produced here are plain data, created per call. Nothing is cached
//! between calls.
//!
//! # Examples
//!
//! ```rust,no_run
//! use conan_sync::registry::{Registry, RegistryClient};
//! use conan_sync::resolver::PackageResolver;
//!
//! # async fn example() -> anyhow::Result<()> {
//! let registry = Registry::new("conancenter", "https://center2.conan.io");
//! let client = RegistryClient::new();
//!
//! if let Some(info) = PackageResolver::new(&client).resolve_latest(&registry, "zlib").await? {
//!     println!("{} -> {}", info.reference, info.lock_entry);
//! }
//! # Ok(())
//! # }
//! ```

pub mod revision_resolver;
pub mod timestamp;
pub mod version_resolver;

pub use revision_resolver::RevisionResolver;
pub use timestamp::canonical_timestamp;
pub use version_resolver::VersionResolver;

use crate::core::SyncError;
use crate::reference::PackageReference;
use crate::registry::{JsonTransport, Registry, RegistryClient};
use serde::{Deserialize, Serialize};

/// One published version of a package.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PackageVersion {
    /// Version string
    pub version: String,
    /// Package name
    pub package_name: String,
    /// Name of the registry the version was found on
    pub remote: String,
    /// Browse URL of the version on the registry
    pub url: String,
    /// Full `name/version@user/channel` reference
    pub reference: String,
    /// Last modification time, when the registry reports one
    pub last_modified: Option<String>,
}

impl PackageVersion {
    /// Describe `reference` as found on `registry`.
    #[must_use]
    pub fn from_reference(registry: &Registry, reference: &PackageReference) -> Self {
        Self {
            version: reference.version.clone(),
            package_name: reference.name.clone(),
            remote: registry.name.clone(),
            url: registry.package_url(reference),
            reference: reference.build(),
            last_modified: None,
        }
    }
}

/// Latest revision of one reference.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RevisionInfo {
    /// Package name
    pub package_name: String,
    /// Version string
    pub version: String,
    /// Reference the revision belongs to
    pub reference: String,
    /// Revision hash
    pub revision_hash: String,
    /// Time string as reported by the registry
    pub raw_time: String,
    /// `<unixSeconds>.<millis>` form of `raw_time`
    pub timestamp: String,
    /// `name/version#revision%timestamp`
    pub lock_entry: String,
}

/// Everything known about the resolved state of one package.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompletePackageInfo {
    /// Package name
    pub package_name: String,
    /// Version string
    pub version: String,
    /// Registry name
    pub remote: String,
    /// Browse URL of the version
    pub url: String,
    /// Full `name/version@user/channel` reference
    pub reference: String,
    /// Last modification time, when known
    pub last_modified: Option<String>,
    /// Revision hash
    pub revision_hash: String,
    /// Time string as reported by the registry
    pub raw_time: String,
    /// `<unixSeconds>.<millis>` form of `raw_time`
    pub timestamp: String,
    /// `name/version#revision%timestamp`
    pub lock_entry: String,
}

impl CompletePackageInfo {
    /// Merge a version with its revision.
    #[must_use]
    pub fn new(version: PackageVersion, revision: RevisionInfo) -> Self {
        Self {
            package_name: version.package_name,
            version: version.version,
            remote: version.remote,
            url: version.url,
            reference: version.reference,
            last_modified: version.last_modified,
            revision_hash: revision.revision_hash,
            raw_time: revision.raw_time,
            timestamp: revision.timestamp,
            lock_entry: revision.lock_entry,
        }
    }

    /// `name/version`, the reference part of the lock entry.
    #[must_use]
    pub fn package_ref(&self) -> String {
        format!("{}/{}", self.package_name, self.version)
    }
}

/// Resolves a package to its [`CompletePackageInfo`].
pub struct PackageResolver<'a, T> {
    client: &'a RegistryClient<T>,
}

impl<'a, T: JsonTransport> PackageResolver<'a, T> {
    /// Resolver over `client`.
    pub const fn new(client: &'a RegistryClient<T>) -> Self {
        Self {
            client,
        }
    }

    /// Newest version of `package` together with its latest revision.
    ///
    /// `Ok(None)` when no version is published or the newest version has no
    /// revision.
    pub async fn resolve_latest(
        &self,
        registry: &Registry,
        package: &str,
    ) -> Result<Option<CompletePackageInfo>, SyncError> {
        let Some(latest) = VersionResolver::new(self.client).latest_version(registry, package).await
        else {
            return Ok(None);
        };
        self.complete(registry, latest).await
    }

    /// A specific `version` of `package` together with its latest revision.
    ///
    /// # Errors
    ///
    /// [`SyncError::VersionNotFound`] when `version` is not published.
    pub async fn resolve_pinned(
        &self,
        registry: &Registry,
        package: &str,
        version: &str,
    ) -> Result<Option<CompletePackageInfo>, SyncError> {
        let found = VersionResolver::new(self.client)
            .find_version(registry, package, version)
            .await
            .ok_or_else(|| SyncError::VersionNotFound {
                package: package.to_string(),
                version: version.to_string(),
            })?;
        self.complete(registry, found).await
    }

    /// Latest if `version` is `None`, pinned otherwise.
    pub async fn resolve(
        &self,
        registry: &Registry,
        package: &str,
        version: Option<&str>,
    ) -> Result<Option<CompletePackageInfo>, SyncError> {
        match version {
            Some(version) => self.resolve_pinned(registry, package, version).await,
            None => self.resolve_latest(registry, package).await,
        }
    }

    async fn complete(
        &self,
        registry: &Registry,
        version: PackageVersion,
    ) -> Result<Option<CompletePackageInfo>, SyncError> {
        let revision = RevisionResolver::new(self.client)
            .latest_revision(registry, &version.package_name, &version.version, Some(&version.reference))
            .await?;
        Ok(revision.map(|revision| CompletePackageInfo::new(version, revision)))
    }
}
