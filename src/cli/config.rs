//! `conan-sync config` manages the registries in the config file.
//!
//! Unlike the other commands this one never needs a registry to be selected,
//! so it runs before the command context is loaded.
//!
//! ```bash
//! conan-sync config add-registry corp https://artifactory.example.com/artifactory/api/conan/conan-local --token "$TOKEN" --default
//! conan-sync config show
//! conan-sync config remove-registry corp
//! ```

use crate::config::{RegistryConfig, SyncConfig};
use crate::core::SyncError;
use anyhow::Result;
use clap::{Args, Subcommand};
use colored::Colorize;
use std::path::{Path, PathBuf};

/// Inspect or edit the config file. Shows it when no action is given.
#[derive(Args, Debug)]
pub struct ConfigCommand {
    #[command(subcommand)]
    command: Option<ConfigSubcommands>,
}

#[derive(Subcommand, Debug)]
enum ConfigSubcommands {
    /// Print the config file with tokens masked
    Show,

    /// Print the location of the config file
    Path,

    /// Add a registry, replacing one of the same name
    AddRegistry {
        /// Name used with `--registry`
        name: String,

        /// API root of the remote
        url: String,

        /// Endpoint kind (`conans` when omitted)
        #[arg(long)]
        kind: Option<String>,

        /// Bearer token sent with every request
        #[arg(long)]
        token: Option<String>,

        /// Also make this the default registry
        #[arg(long)]
        default: bool,
    },

    /// Remove a registry
    RemoveRegistry {
        /// Registry name
        name: String,
    },
}

impl ConfigCommand {
    /// Run against `config_path`, or the default location when `None`.
    pub async fn execute(self, config_path: Option<&Path>, quiet: bool) -> Result<()> {
        let path = resolve_path(config_path)?;

        match self.command {
            Some(ConfigSubcommands::Show) | None => show(&path).await,
            Some(ConfigSubcommands::Path) => {
                println!("{}", path.display());
                Ok(())
            }
            Some(ConfigSubcommands::AddRegistry {
                name,
                url,
                kind,
                token,
                default,
            }) => {
                let mut config = SyncConfig::load(Some(&path)).await?;
                let replaced = config.registries.contains_key(&name);
                config.add_registry(
                    name.clone(),
                    RegistryConfig {
                        url: url.clone(),
                        kind,
                        token,
                    },
                );
                if default {
                    config.default_registry = Some(name.clone());
                }
                config.save_to(&path).await?;

                if !quiet {
                    let verb = if replaced { "Replaced" } else { "Added" };
                    println!("{} registry '{}': {}", verb, name.green(), url);
                }
                Ok(())
            }
            Some(ConfigSubcommands::RemoveRegistry {
                name,
            }) => {
                let mut config = SyncConfig::load(Some(&path)).await?;
                if !config.remove_registry(&name) {
                    return Err(SyncError::RegistryNotFound {
                        name,
                    }
                    .into());
                }
                config.save_to(&path).await?;

                if !quiet {
                    println!("Removed registry '{}'", name.red());
                }
                Ok(())
            }
        }
    }
}

fn resolve_path(config_path: Option<&Path>) -> Result<PathBuf> {
    match config_path {
        Some(path) => Ok(path.to_path_buf()),
        None => SyncConfig::default_path(),
    }
}

async fn show(path: &Path) -> Result<()> {
    let config = SyncConfig::load(Some(path)).await?;

    println!("{}", "conan-sync configuration".bold());
    println!("Location: {}\n", path.display());
    print!("{}", toml::to_string_pretty(&config.masked())?);
    if config.registries.is_empty() {
        println!("\n{}", "No registries configured.".yellow());
        println!("  Add one with: conan-sync config add-registry <name> <url>");
    }

    Ok(())
}
