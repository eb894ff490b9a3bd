//! Version discovery on a registry.
//!
//! [`VersionResolver`] turns a registry search into the list of published
//! versions of one package, newest first. Discovery is forgiving: search
//! results for other packages, unparsable references and transport failures
//! are all skipped, and the caller simply sees fewer (or no) versions.

use super::PackageVersion;
use crate::reference::PackageReference;
use crate::registry::{JsonTransport, Registry, RegistryClient};
use crate::version::sort_newest_first;
use std::collections::HashSet;
use tracing::{debug, warn};

/// Lists versions of a package from search results.
pub struct VersionResolver<'a, T> {
    client: &'a RegistryClient<T>,
}

impl<'a, T: JsonTransport> VersionResolver<'a, T> {
    /// Resolver over `client`.
    pub const fn new(client: &'a RegistryClient<T>) -> Self {
        Self {
            client,
        }
    }

    /// All versions of `package` on `registry`, newest first.
    ///
    /// Only references starting with exactly `"{package}/"` count, so searching
    /// `fmt` ignores `fmtlog`. The first reference seen for a version wins when a
    /// version is published in several namespaces. A failed search yields an
    /// empty list.
    pub async fn all_versions(&self, registry: &Registry, package: &str) -> Vec<PackageVersion> {
        let results = match self.client.search(registry, package).await {
            Ok(results) => results,
            Err(e) => {
                warn!("Could not list versions of '{}' on '{}': {}", package, registry.name, e);
                return Vec::new();
            }
        };

        let prefix = format!("{package}/");
        let mut seen = HashSet::new();
        let mut versions = Vec::new();
        let mut discarded = 0usize;

        for raw in results.iter().filter(|raw| raw.starts_with(&prefix)) {
            let Ok(reference) = PackageReference::parse(raw) else {
                discarded += 1;
                continue;
            };
            if seen.insert(reference.version.clone()) {
                versions.push(PackageVersion::from_reference(registry, &reference));
            }
        }

        if discarded > 0 {
            debug!("Skipped {} unparsable reference(s) for '{}'", discarded, package);
        }

        sort_newest_first(&mut versions, |v| v.version.as_str());
        debug!("Found {} version(s) of '{}' on '{}'", versions.len(), package, registry.name);
        versions
    }

    /// Newest version of `package`, if any.
    pub async fn latest_version(&self, registry: &Registry, package: &str) -> Option<PackageVersion> {
        self.all_versions(registry, package).await.into_iter().next()
    }

    /// The version whose string equals `version` exactly.
    pub async fn find_version(
        &self,
        registry: &Registry,
        package: &str,
        version: &str,
    ) -> Option<PackageVersion> {
        self.all_versions(registry, package).await.into_iter().find(|v| v.version == version)
    }
}
