//! Manifest/lock reconciliation
//!
//! The [`Reconciler`] decides whether a package needs updating and, if so,
//! rewrites both project files. Each call walks the same steps for one package:
//!
//! 1. **Validate**: the manifest and the lock file must both exist. Missing files
//!    fail with [`SyncError::FileNotFound`] before any registry request.
//! 2. **Resolve**: the latest (or pinned) [`CompletePackageInfo`] is fetched.
//! 3. **Compare**: the version on the manifest line and the lock entry are read.
//!    A package referenced by neither file is left alone. Otherwise the manifest
//!    version, the lock revision and the lock reference are each compared.
//! 4. **Apply**: on any mismatch the manifest and lock file are rewritten
//!    together, and the written info is returned. A file whose text would not
//!    change is not written; if neither would change the package counts as
//!    up to date.
//!
//! A `None` from [`Reconciler::reconcile`] means nothing was written, either
//! because the package is already current, not tracked, or not published.
//!
//! # Examples
//!
//! ```rust,no_run
//! use conan_sync::reconciler::{ProjectFiles, Reconciler};
//! use conan_sync::registry::{Registry, RegistryClient};
//!
//! # async fn example() -> anyhow::Result<()> {
//! let registry = Registry::new("conancenter", "https://center2.conan.io");
//! let client = RegistryClient::new();
//! let files = ProjectFiles::in_dir(".", "conanfile.yml", "conan.lock");
//!
//! if let Some(info) = Reconciler::new(&client, files).reconcile(&registry, "zlib").await? {
//!     println!("updated zlib to {}", info.version);
//! }
//! # Ok(())
//! # }
//! ```

use crate::core::SyncError;
use crate::lockfile::LockEditor;
use crate::manifest::ManifestEditor;
use crate::reference::LockEntry;
use crate::registry::{JsonTransport, Registry, RegistryClient};
use crate::resolver::{CompletePackageInfo, PackageResolver};
use crate::utils::fs::{atomic_write_all, missing_files, read_text_file};
use anyhow::Result;
use serde::Serialize;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// The manifest and lock file of one project.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectFiles {
    /// Path of the manifest (`conanfile.yml`)
    pub manifest: PathBuf,
    /// Path of the lock file (`conan.lock`)
    pub lock: PathBuf,
}

impl ProjectFiles {
    /// Explicit paths.
    pub fn new(manifest: impl Into<PathBuf>, lock: impl Into<PathBuf>) -> Self {
        Self {
            manifest: manifest.into(),
            lock: lock.into(),
        }
    }

    /// `dir/manifest_name` and `dir/lock_name`.
    pub fn in_dir(dir: impl AsRef<Path>, manifest_name: &str, lock_name: &str) -> Self {
        let dir = dir.as_ref();
        Self::new(dir.join(manifest_name), dir.join(lock_name))
    }

    /// Fail with [`SyncError::FileNotFound`] naming every missing file.
    pub fn validate(&self) -> Result<(), SyncError> {
        let missing = missing_files(&[self.manifest.as_path(), self.lock.as_path()]);
        if missing.is_empty() {
            Ok(())
        } else {
            Err(SyncError::FileNotFound {
                files: missing,
            })
        }
    }
}

/// What the project files currently say about one package.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OnDiskState {
    /// Version on the first matching manifest line
    pub manifest_version: Option<String>,
    /// First matching lock entry
    pub lock_entry: Option<LockEntry>,
}

impl OnDiskState {
    /// Read the state of `package` from manifest and lock text.
    #[must_use]
    pub fn read(manifest: &str, lock: &str, package: &str) -> Self {
        Self {
            manifest_version: ManifestEditor::current_version(manifest, package),
            lock_entry: LockEditor::current_entry(lock, package),
        }
    }

    /// True when either file references the package.
    #[must_use]
    pub const fn is_tracked(&self) -> bool {
        self.manifest_version.is_some() || self.lock_entry.is_some()
    }
}

/// Which fields differ from the resolved state.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Divergence {
    /// Manifest version differs from the resolved version
    pub manifest_version: bool,
    /// Lock revision differs from the resolved revision
    pub revision: bool,
    /// Lock reference differs from `name/resolved-version`
    pub package_ref: bool,
}

impl Divergence {
    /// Compare on-disk state against resolved info.
    #[must_use]
    pub fn between(state: &OnDiskState, info: &CompletePackageInfo) -> Self {
        let expected_ref = info.package_ref();
        Self {
            manifest_version: state.manifest_version.as_deref() != Some(info.version.as_str()),
            revision: state.lock_entry.as_ref().map(|entry| entry.revision.as_str())
                != Some(info.revision_hash.as_str()),
            package_ref: state.lock_entry.as_ref().map(|entry| entry.package_ref.as_str())
                != Some(expected_ref.as_str()),
        }
    }

    /// True when any field differs.
    #[must_use]
    pub const fn any(&self) -> bool {
        self.manifest_version || self.revision || self.package_ref
    }
}

/// Result of the Compare step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReconcilePlan {
    /// Neither file references the package
    Untracked,
    /// Both files already match the resolved state
    UpToDate,
    /// At least one field differs
    Update(Divergence),
}

impl ReconcilePlan {
    /// Compare on-disk state against resolved info.
    #[must_use]
    pub fn decide(state: &OnDiskState, info: &CompletePackageInfo) -> Self {
        if !state.is_tracked() {
            return Self::Untracked;
        }

        let divergence = Divergence::between(state, info);
        if divergence.any() { Self::Update(divergence) } else { Self::UpToDate }
    }
}

/// Full report of one reconciliation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReconcileOutcome {
    /// The registry has no usable version of the package
    NotPublished,
    /// Neither file references the package; nothing written
    Untracked(CompletePackageInfo),
    /// Both files already match; nothing written
    UpToDate(CompletePackageInfo),
    /// Files differ but the run was a dry run; nothing written
    WouldUpdate {
        /// Resolved info
        info: CompletePackageInfo,
        /// Fields that differ
        divergence: Divergence,
    },
    /// Files were rewritten
    Updated {
        /// Info that was written
        info: CompletePackageInfo,
        /// Fields that differed
        divergence: Divergence,
    },
}

impl ReconcileOutcome {
    /// The written info, if files were rewritten.
    #[must_use]
    pub fn into_written(self) -> Option<CompletePackageInfo> {
        match self {
            Self::Updated {
                info,
                ..
            } => Some(info),
            _ => None,
        }
    }

    /// Resolved info, if the package is published.
    #[must_use]
    pub fn info(&self) -> Option<&CompletePackageInfo> {
        match self {
            Self::NotPublished => None,
            Self::Untracked(info) | Self::UpToDate(info) => Some(info),
            Self::WouldUpdate {
                info,
                ..
            }
            | Self::Updated {
                info,
                ..
            } => Some(info),
        }
    }
}

/// Options for [`Reconciler::run`].
#[derive(Debug, Clone, Copy, Default)]
pub struct ReconcileOptions<'v> {
    /// Resolve this version instead of the latest
    pub version: Option<&'v str>,
    /// Report what would change without writing
    pub dry_run: bool,
}

/// Keeps one project's manifest and lock file in step with a registry.
pub struct Reconciler<'a, T> {
    client: &'a RegistryClient<T>,
    files: ProjectFiles,
}

impl<'a, T: JsonTransport> Reconciler<'a, T> {
    /// Reconciler for `files` using `client`.
    pub const fn new(client: &'a RegistryClient<T>, files: ProjectFiles) -> Self {
        Self {
            client,
            files,
        }
    }

    /// The project files this reconciler edits.
    pub const fn files(&self) -> &ProjectFiles {
        &self.files
    }

    /// Update `package` to its latest version.
    ///
    /// Returns the written info, or `None` when nothing was written.
    ///
    /// # Errors
    ///
    /// [`SyncError::FileNotFound`] if a project file is missing, plus unreadable
    /// or unwritable files and errors from resolution.
    pub async fn reconcile(
        &self,
        registry: &Registry,
        package: &str,
    ) -> Result<Option<CompletePackageInfo>> {
        Ok(self.run(registry, package, ReconcileOptions::default()).await?.into_written())
    }

    /// Run one reconciliation and report in detail.
    pub async fn run(
        &self,
        registry: &Registry,
        package: &str,
        options: ReconcileOptions<'_>,
    ) -> Result<ReconcileOutcome> {
        self.files.validate()?;

        let resolver = PackageResolver::new(self.client);
        let Some(info) = resolver.resolve(registry, package, options.version).await? else {
            info!("No published version of '{}' found on '{}'", package, registry.name);
            return Ok(ReconcileOutcome::NotPublished);
        };

        let manifest = read_text_file(&self.files.manifest)?;
        let lock = read_text_file(&self.files.lock)?;
        let state = OnDiskState::read(&manifest, &lock, package);
        debug!("On-disk state of '{}': {:?}", package, state);

        let divergence = match ReconcilePlan::decide(&state, &info) {
            ReconcilePlan::Untracked => {
                info!("'{}' is not referenced by the project; skipping", package);
                return Ok(ReconcileOutcome::Untracked(info));
            }
            ReconcilePlan::UpToDate => {
                info!("'{}' is up to date at {}", package, info.version);
                return Ok(ReconcileOutcome::UpToDate(info));
            }
            ReconcilePlan::Update(divergence) => divergence,
        };

        let changes = FileChanges::compute(&manifest, &lock, &info);
        if changes.is_empty() {
            info!("'{}' is up to date at {}; no file would change", package, info.version);
            return Ok(ReconcileOutcome::UpToDate(info));
        }

        if options.dry_run {
            return Ok(ReconcileOutcome::WouldUpdate {
                info,
                divergence,
            });
        }

        changes.write(&self.files)?;
        info!("Updated '{}' to {} ({})", package, info.version, info.revision_hash);

        Ok(ReconcileOutcome::Updated {
            info,
            divergence,
        })
    }
}

/// New file contents, kept only where they differ from what is on disk.
#[derive(Debug)]
struct FileChanges {
    manifest: Option<String>,
    lock: Option<String>,
}

impl FileChanges {
    fn compute(manifest: &str, lock: &str, info: &CompletePackageInfo) -> Self {
        let manifest_edit =
            ManifestEditor::update_version(manifest, &info.package_name, &info.version);
        let lock_edit = LockEditor::update_entry(
            lock,
            &info.package_name,
            &info.version,
            &info.revision_hash,
            &info.timestamp,
        );

        Self {
            manifest: (manifest_edit.content != manifest).then_some(manifest_edit.content),
            lock: (lock_edit.content != lock).then_some(lock_edit.content),
        }
    }

    const fn is_empty(&self) -> bool {
        self.manifest.is_none() && self.lock.is_none()
    }

    /// Write the changed files, manifest first.
    fn write(&self, files: &ProjectFiles) -> Result<()> {
        let writes: Vec<(&Path, &[u8])> = [
            (files.manifest.as_path(), self.manifest.as_deref()),
            (files.lock.as_path(), self.lock.as_deref()),
        ]
        .into_iter()
        .filter_map(|(path, content)| content.map(|text| (path, text.as_bytes())))
        .collect();

        atomic_write_all(&writes)
    }
}
