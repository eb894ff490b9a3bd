//! Global configuration for conan-sync
//!
//! Registries and project file names are read from a TOML file, by default
//! `~/.conan-sync/config.toml` (overridable with `--config`). A missing file is
//! not an error: the defaults apply and registries can be given on the command
//! line instead.
//!
//! # Example
//!
//! ```toml
//! default_registry = "corp"
//! manifest_file = "conanfile.yml"
//! lock_file = "conan.lock"
//!
//! [registries.corp]
//! url = "https://artifactory.example.com/artifactory/api/conan/conan-local"
//! token = "cmVmdGtuOjAxOjE3..."
//!
//! [registries.center]
//! url = "https://center2.conan.io"
//! ```
//!
//! The file may contain tokens, so [`SyncConfig::save_to`] restricts it to the
//! owner on Unix.

use crate::core::SyncError;
use crate::lockfile::LOCK_FILE;
use crate::manifest::MANIFEST_FILE;
use crate::registry::{DEFAULT_KIND, Registry};
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tokio::fs;

fn default_manifest_file() -> String {
    MANIFEST_FILE.to_string()
}

fn default_lock_file() -> String {
    LOCK_FILE.to_string()
}

/// One `[registries.<name>]` table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegistryConfig {
    /// API root of the remote
    pub url: String,
    /// Endpoint kind, `conans` when omitted
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    /// Bearer token
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,
}

impl RegistryConfig {
    fn to_registry(&self, name: &str) -> Registry {
        let mut registry = Registry::new(name, &self.url)
            .with_kind(self.kind.as_deref().unwrap_or(DEFAULT_KIND));
        if let Some(token) = &self.token {
            registry = registry.with_token(token);
        }
        registry
    }
}

/// Contents of the config file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SyncConfig {
    /// Registry used when none is named on the command line
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_registry: Option<String>,

    /// Manifest file name inside the project directory
    #[serde(default = "default_manifest_file")]
    pub manifest_file: String,

    /// Lock file name inside the project directory
    #[serde(default = "default_lock_file")]
    pub lock_file: String,

    /// Named registries
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub registries: BTreeMap<String, RegistryConfig>,
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            default_registry: None,
            manifest_file: default_manifest_file(),
            lock_file: default_lock_file(),
            registries: BTreeMap::new(),
        }
    }
}

impl SyncConfig {
    /// `~/.conan-sync/config.toml`
    pub fn default_path() -> Result<PathBuf> {
        let home = dirs::home_dir()
            .ok_or_else(|| anyhow::anyhow!("Unable to determine home directory"))?;
        Ok(home.join(".conan-sync").join("config.toml"))
    }

    /// Load `path`, or the default location when `None`. A missing file yields
    /// the defaults.
    pub async fn load(path: Option<&Path>) -> Result<Self> {
        let path = match path {
            Some(path) => path.to_path_buf(),
            None => match Self::default_path() {
                Ok(path) => path,
                Err(_) => return Ok(Self::default()),
            },
        };

        if path.exists() { Self::load_from(&path).await } else { Ok(Self::default()) }
    }

    /// Load and parse the file at `path`.
    pub async fn load_from(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .await
            .with_context(|| format!("Failed to read config from {}", path.display()))?;

        toml::from_str(&content)
            .map_err(|e| SyncError::ConfigError {
                message: format!("{}: {e}", path.display()),
            })
            .with_context(|| format!("Failed to parse config from {}", path.display()))
    }

    /// Write the config to `path`, creating parent directories.
    pub async fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).await.with_context(|| {
                format!("Failed to create config directory: {}", parent.display())
            })?;
        }

        let content = toml::to_string_pretty(self).context("Failed to serialize config")?;
        fs::write(path, content)
            .await
            .with_context(|| format!("Failed to write config to {}", path.display()))?;

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;

            let mut perms = fs::metadata(path)
                .await
                .with_context(|| format!("Failed to read permissions for {}", path.display()))?
                .permissions();
            perms.set_mode(0o600);
            fs::set_permissions(path, perms).await.with_context(|| {
                format!("Failed to set secure permissions on {}", path.display())
            })?;
        }

        Ok(())
    }

    /// Look up a registry.
    ///
    /// With `name`, that registry must be configured. Without it, the
    /// `default_registry` is used, or the only configured registry if there is
    /// exactly one.
    pub fn registry(&self, name: Option<&str>) -> Result<Registry, SyncError> {
        let name = match name.or(self.default_registry.as_deref()) {
            Some(name) => name,
            None => match self.registries.keys().next() {
                Some(only) if self.registries.len() == 1 => only.as_str(),
                _ => {
                    return Err(SyncError::ConfigError {
                        message: "no registry selected; pass --registry, --registry-url or set default_registry".to_string(),
                    });
                }
            },
        };

        self.registries.get(name).map(|config| config.to_registry(name)).ok_or_else(|| {
            SyncError::RegistryNotFound {
                name: name.to_string(),
            }
        })
    }

    /// Add or replace a registry.
    pub fn add_registry(&mut self, name: impl Into<String>, config: RegistryConfig) {
        self.registries.insert(name.into(), config);
    }

    /// Remove a registry, clearing `default_registry` if it named it.
    ///
    /// Returns false when no such registry was configured.
    pub fn remove_registry(&mut self, name: &str) -> bool {
        if self.registries.remove(name).is_none() {
            return false;
        }
        if self.default_registry.as_deref() == Some(name) {
            self.default_registry = None;
        }
        true
    }

    /// Copy with every token replaced by `***`, for display.
    #[must_use]
    pub fn masked(&self) -> Self {
        let mut masked = self.clone();
        for registry in masked.registries.values_mut() {
            if registry.token.is_some() {
                registry.token = Some("***".to_string());
            }
        }
        masked
    }
}
