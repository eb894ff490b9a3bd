//! Latest revision lookup for one reference.

use super::timestamp::canonical_timestamp;
use super::version_resolver::VersionResolver;
use super::RevisionInfo;
use crate::core::SyncError;
use crate::reference::{build_lock_entry, split_reference};
use crate::registry::{JsonTransport, Registry, RegistryClient};
use tracing::{debug, warn};

/// Fetches the most recent revision of a reference.
///
/// The registry lists revisions newest first; the first record is taken as is.
pub struct RevisionResolver<'a, T> {
    client: &'a RegistryClient<T>,
}

impl<'a, T: JsonTransport> RevisionResolver<'a, T> {
    /// Resolver over `client`.
    pub const fn new(client: &'a RegistryClient<T>) -> Self {
        Self {
            client,
        }
    }

    /// Latest revision of `package`/`version`.
    ///
    /// When `reference` is `None` it is looked up through [`VersionResolver`].
    /// Returns `Ok(None)` when the registry has no revision for the reference or
    /// the revisions request fails.
    ///
    /// # Errors
    ///
    /// - [`SyncError::VersionNotFound`] if `reference` is `None` and the version is not published
    /// - [`SyncError::MalformedReference`] if the reference has no non-empty halves around `@`
    pub async fn latest_revision(
        &self,
        registry: &Registry,
        package: &str,
        version: &str,
        reference: Option<&str>,
    ) -> Result<Option<RevisionInfo>, SyncError> {
        let reference = match reference {
            Some(reference) => reference.to_string(),
            None => VersionResolver::new(self.client)
                .find_version(registry, package, version)
                .await
                .map(|found| found.reference)
                .ok_or_else(|| SyncError::VersionNotFound {
                    package: package.to_string(),
                    version: version.to_string(),
                })?,
        };

        let (package_path, user_channel) = split_reference(&reference)?;

        let response = match self.client.revisions(registry, package_path, user_channel).await {
            Ok(response) => response,
            Err(e) => {
                warn!("Could not fetch revisions of '{}': {}", reference, e);
                return Ok(None);
            }
        };

        let Some(latest) = response.revisions.into_iter().next() else {
            debug!("Registry '{}' has no revisions for '{}'", registry.name, reference);
            return Ok(None);
        };

        let timestamp = canonical_timestamp(&latest.time);
        let lock_entry =
            build_lock_entry(&format!("{package}/{version}"), &latest.revision, &timestamp);
        debug!("Latest revision of {}: {}", reference, latest.revision);

        Ok(Some(RevisionInfo {
            package_name: package.to_string(),
            version: version.to_string(),
            reference,
            revision_hash: latest.revision,
            raw_time: latest.time,
            timestamp,
            lock_entry,
        }))
    }
}
