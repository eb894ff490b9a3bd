//! Common context shared by every command

use super::{CliConfig, GlobalArgs};
use crate::config::SyncConfig;
use crate::reconciler::ProjectFiles;
use crate::registry::{Registry, RegistryClient};
use crate::utils::progress::Spinner;
use anyhow::{Context, Result};
use serde::Serialize;
use std::path::PathBuf;
use tracing::debug;

/// Name given to a registry passed with `--registry-url` alone.
pub const AD_HOC_REGISTRY: &str = "cli";

/// Output rendering for commands that print results.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// Human-readable, colored
    #[default]
    Text,
    /// Pretty-printed JSON on stdout
    Json,
}

/// Everything a command needs besides its own arguments.
#[derive(Debug)]
pub struct CommandContext {
    /// Loaded config file (or defaults)
    pub config: SyncConfig,
    /// Registry selected by flags or config
    pub registry: Registry,
    /// Directory holding the project files
    pub project_dir: PathBuf,
    /// HTTP client
    pub client: RegistryClient,
    /// Whether spinners are drawn
    pub show_progress: bool,
    /// Whether informational output is suppressed
    pub quiet: bool,
}

impl CommandContext {
    /// Load the config file and select the registry.
    ///
    /// `--registry-url` wins over configured registries; its token and kind are
    /// borrowed from the configured registry of the same name, if any.
    pub async fn load(global: &GlobalArgs, config: &CliConfig) -> Result<Self> {
        let sync_config = SyncConfig::load(global.config.as_deref()).await?;
        let registry = select_registry(&sync_config, global)?;
        debug!("Using registry '{}' at {}", registry.name, registry.url);

        let project_dir = match &global.project_dir {
            Some(dir) => dir.clone(),
            None => std::env::current_dir().context("Failed to determine current directory")?,
        };

        Ok(Self {
            config: sync_config,
            registry,
            project_dir,
            client: RegistryClient::new(),
            show_progress: config.show_progress(),
            quiet: config.quiet,
        })
    }

    /// Manifest and lock file paths inside the project directory.
    pub fn project_files(&self) -> ProjectFiles {
        ProjectFiles::in_dir(&self.project_dir, &self.config.manifest_file, &self.config.lock_file)
    }

    /// Spinner honoring `--quiet` and `--no-progress`.
    pub fn spinner(&self, msg: impl Into<String>) -> Spinner {
        Spinner::new(self.show_progress, msg)
    }
}

fn select_registry(config: &SyncConfig, global: &GlobalArgs) -> Result<Registry> {
    let Some(url) = &global.registry_url else {
        return Ok(config.registry(global.registry.as_deref())?);
    };

    let name = global.registry.as_deref().unwrap_or(AD_HOC_REGISTRY);
    let registry = match config.registry(Some(name)) {
        Ok(configured) => Registry {
            url: url.clone(),
            ..configured
        },
        Err(_) => Registry::new(name, url),
    };
    Ok(registry)
}

/// Print `value` as pretty JSON on stdout.
pub fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value).context("Failed to serialize output")?);
    Ok(())
}
