//! conan-sync - Conan package version resolution and lock file reconciliation
//!
//! conan-sync asks a Conan v2 registry for the newest published version of a
//! package and its latest revision, then brings a project's `conanfile.yml`
//! and `conan.lock` in line. Both files are patched as text, so formatting,
//! comments and unrelated entries survive untouched.
//!
//! # Core Modules
//!
//! - [`reference`] - `name/version@user/channel` and `name/version#rev%ts` grammars
//! - [`version`] - Newest-first version ordering
//! - [`registry`] - Registry description and the JSON-over-HTTP client
//! - [`resolver`] - Version discovery, revision lookup and their combination
//! - [`manifest`] - Text edits of `conanfile.yml`
//! - [`lockfile`] - Text edits of `conan.lock`
//! - [`reconciler`] - Compare the project files with the registry and rewrite them
//!
//! ## Supporting Modules
//!
//! - [`core`] - Error taxonomy and user-facing error rendering
//! - [`config`] - Global `~/.conan-sync/config.toml`
//! - [`cli`] - Command-line interface
//! - [`utils`] - Staged file writes and progress spinners
//!
//! # Example
//!
//! ```rust,no_run
//! use conan_sync::reconciler::{ProjectFiles, Reconciler};
//! use conan_sync::registry::{Registry, RegistryClient};
//!
//! # async fn example() -> anyhow::Result<()> {
//! let registry = Registry::new("conancenter", "https://center2.conan.io");
//! let client = RegistryClient::new();
//! let reconciler = Reconciler::new(&client, ProjectFiles::in_dir(".", "conanfile.yml", "conan.lock"));
//!
//! match reconciler.reconcile(&registry, "zlib").await? {
//!     Some(info) => println!("zlib -> {}", info.lock_entry),
//!     None => println!("zlib already up to date"),
//! }
//! # Ok(())
//! # }
//! ```

pub mod cli;
pub mod config;
pub mod core;
pub mod lockfile;
pub mod manifest;
pub mod reconciler;
pub mod reference;
pub mod registry;
pub mod resolver;
pub mod utils;
pub mod version;

#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;
