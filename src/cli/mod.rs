//! Command-line interface for conan-sync.
//!
//! # Available Commands
//!
//! - `versions` - List published versions of a package, newest first
//! - `latest` - Show the newest version of a package with its latest revision
//! - `revision` - Show the latest revision of one version
//! - `update` - Bring the project's manifest and lock file up to date
//! - `config` - Show the config file or add and remove registries
//!
//! # Global Options
//!
//! - `--verbose` / `--quiet` - Log level (`RUST_LOG` takes precedence)
//! - `--config` - Path to the config file (default `~/.conan-sync/config.toml`)
//! - `--project-dir` - Directory holding `conanfile.yml` and `conan.lock`
//! - `--registry` / `--registry-url` - Registry to query
//! - `--no-progress` - Disable spinners
//!
//! # Example
//!
//! ```bash
//! conan-sync --registry-url https://center2.conan.io latest zlib
//! conan-sync update zlib fmt --dry-run
//! conan-sync update zlib --version 1.3.1 --format json
//! conan-sync config add-registry center https://center2.conan.io --default
//! ```

pub mod common;
mod config;
mod latest;
mod revision;
mod update;
mod versions;

#[cfg(test)]
mod tests;

pub use common::{CommandContext, OutputFormat};

use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Runtime configuration derived from the global flags.
///
/// Kept separate from [`Cli`] so tests and embedders can drive commands without
/// touching global logging state.
#[derive(Debug, Clone)]
pub struct CliConfig {
    /// Default filter directive when `RUST_LOG` is unset
    pub log_level: String,
    /// Disable spinners
    pub no_progress: bool,
    /// Suppress non-essential output
    pub quiet: bool,
}

impl Default for CliConfig {
    fn default() -> Self {
        Self {
            log_level: "warn".to_string(),
            no_progress: false,
            quiet: false,
        }
    }
}

impl CliConfig {
    /// Configuration with default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether spinners should be drawn.
    #[must_use]
    pub const fn show_progress(&self) -> bool {
        !self.no_progress && !self.quiet
    }

    /// Install the global `tracing` subscriber writing to stderr.
    ///
    /// `RUST_LOG` wins over `log_level`. Calling this twice is harmless.
    pub fn init_logging(&self) {
        let filter =
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&self.log_level));

        let _ = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .with_target(false)
            .try_init();
    }
}

/// Options available to every subcommand.
#[derive(Args, Debug, Clone, Default)]
pub struct GlobalArgs {
    /// Enable debug logging
    #[arg(short, long, global = true, conflicts_with = "quiet")]
    pub verbose: bool,

    /// Only print errors and requested output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Path to the config file
    #[arg(short, long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Directory containing the manifest and lock file
    #[arg(short = 'C', long, global = true, value_name = "DIR")]
    pub project_dir: Option<PathBuf>,

    /// Name of a registry from the config file
    #[arg(short, long, global = true, value_name = "NAME")]
    pub registry: Option<String>,

    /// Query this registry URL directly instead of a configured one
    #[arg(long, global = true, value_name = "URL")]
    pub registry_url: Option<String>,

    /// Disable spinners
    #[arg(long, global = true)]
    pub no_progress: bool,
}

/// Keep Conan manifests and lock files in step with a registry.
#[derive(Parser, Debug)]
#[command(
    name = "conan-sync",
    about = "Resolve Conan package versions and reconcile conanfile.yml / conan.lock",
    version,
    long_about = "conan-sync queries a Conan v2 registry for the newest version and revision of a package \
                  and rewrites conanfile.yml and conan.lock in place when they are out of date."
)]
pub struct Cli {
    #[command(subcommand)]
    command: Commands,

    #[command(flatten)]
    global: GlobalArgs,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// List published versions of a package, newest first
    Versions(versions::VersionsCommand),

    /// Show the newest version of a package and its latest revision
    Latest(latest::LatestCommand),

    /// Show the latest revision of a specific version
    Revision(revision::RevisionCommand),

    /// Update the manifest and lock file to the newest (or a pinned) version
    Update(update::UpdateCommand),

    /// Show the config file or add and remove registries
    Config(config::ConfigCommand),
}

impl Cli {
    /// Execute the parsed command, installing the logger first.
    pub async fn execute(self) -> Result<()> {
        let config = self.build_config();
        config.init_logging();
        self.execute_with_config(config).await
    }

    /// Translate global flags into a [`CliConfig`].
    #[must_use]
    pub fn build_config(&self) -> CliConfig {
        let log_level = if self.global.verbose {
            "debug"
        } else if self.global.quiet {
            "error"
        } else {
            "warn"
        };

        CliConfig {
            log_level: log_level.to_string(),
            no_progress: self.global.no_progress,
            quiet: self.global.quiet,
        }
    }

    /// Execute with an explicit configuration.
    ///
    /// `config` runs without a command context, so it works before any
    /// registry is configured.
    pub async fn execute_with_config(self, config: CliConfig) -> Result<()> {
        let global = &self.global;

        match self.command {
            Commands::Config(cmd) => cmd.execute(global.config.as_deref(), config.quiet).await,
            Commands::Versions(cmd) => cmd.execute(&CommandContext::load(global, &config).await?).await,
            Commands::Latest(cmd) => cmd.execute(&CommandContext::load(global, &config).await?).await,
            Commands::Revision(cmd) => cmd.execute(&CommandContext::load(global, &config).await?).await,
            Commands::Update(cmd) => cmd.execute(&CommandContext::load(global, &config).await?).await,
        }
    }
}
