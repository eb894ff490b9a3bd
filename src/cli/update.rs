//! `conan-sync update <package>...`
//!
//! Reconciles each package in turn against the same manifest/lock pair. The
//! first error stops the run; packages handled before it keep their updates.
//!
//! ```bash
//! conan-sync update zlib fmt           # newest versions
//! conan-sync update zlib --version 1.3.1
//! conan-sync update zlib --dry-run     # report only
//! ```

use super::common::{CommandContext, OutputFormat, print_json};
use super::latest::print_info;
use crate::reconciler::{Divergence, ReconcileOptions, ReconcileOutcome, Reconciler};
use crate::resolver::CompletePackageInfo;
use anyhow::{Result, bail};
use clap::Args;
use colored::Colorize;
use serde::Serialize;

/// Update the manifest and lock file.
#[derive(Args, Debug)]
pub struct UpdateCommand {
    /// Packages to update
    #[arg(required = true, value_name = "PACKAGE")]
    pub packages: Vec<String>,

    /// Pin this exact version instead of the newest (single package only)
    #[arg(long = "version", value_name = "VERSION")]
    pub pin: Option<String>,

    /// Report what would change without writing
    #[arg(long)]
    pub dry_run: bool,

    /// Output format
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,
}

/// Per-package status in `--format json` output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum UpdateStatus {
    /// The registry has no usable version
    NotPublished,
    /// Neither project file references the package
    NotTracked,
    /// No file would change
    UpToDate,
    /// Dry run; files would be rewritten
    WouldUpdate,
    /// Files were rewritten
    Updated,
}

/// One entry of `--format json` output.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateReport {
    package: String,
    status: UpdateStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    info: Option<CompletePackageInfo>,
    #[serde(skip_serializing_if = "Option::is_none")]
    changed: Option<Divergence>,
}

impl UpdateReport {
    fn new(package: &str, outcome: ReconcileOutcome) -> Self {
        let (status, info, changed) = match outcome {
            ReconcileOutcome::NotPublished => (UpdateStatus::NotPublished, None, None),
            ReconcileOutcome::Untracked(info) => (UpdateStatus::NotTracked, Some(info), None),
            ReconcileOutcome::UpToDate(info) => (UpdateStatus::UpToDate, Some(info), None),
            ReconcileOutcome::WouldUpdate {
                info,
                divergence,
            } => (UpdateStatus::WouldUpdate, Some(info), Some(divergence)),
            ReconcileOutcome::Updated {
                info,
                divergence,
            } => (UpdateStatus::Updated, Some(info), Some(divergence)),
        };
        Self {
            package: package.to_string(),
            status,
            info,
            changed,
        }
    }
}

impl UpdateCommand {
    pub async fn execute(self, ctx: &CommandContext) -> Result<()> {
        if self.pin.is_some() && self.packages.len() > 1 {
            bail!("--version can only be used with a single package");
        }

        let reconciler = Reconciler::new(&ctx.client, ctx.project_files());
        let options = ReconcileOptions {
            version: self.pin.as_deref(),
            dry_run: self.dry_run,
        };

        let mut reports = Vec::with_capacity(self.packages.len());
        for package in &self.packages {
            let spinner = ctx.spinner(format!("Reconciling {package}"));
            let outcome = reconciler.run(&ctx.registry, package, options).await;
            spinner.finish();
            let report = UpdateReport::new(package, outcome?);

            if self.format == OutputFormat::Text {
                print_report(&report, ctx.quiet);
            }
            reports.push(report);
        }

        if self.format == OutputFormat::Json {
            print_json(&reports)?;
        }

        Ok(())
    }
}

fn print_report(report: &UpdateReport, quiet: bool) {
    let version = report.info.as_ref().map_or("", |info| info.version.as_str());

    match report.status {
        UpdateStatus::Updated => {
            println!("{} {} {}", "✓".green(), report.package.bold(), format!("updated to {version}").green());
        }
        UpdateStatus::WouldUpdate => {
            println!("{} {} would be updated to {}", "→".cyan(), report.package.bold(), version);
            if let Some(changed) = report.changed {
                print_changed(changed);
            }
            if !quiet {
                if let Some(info) = &report.info {
                    print_info(info);
                }
            }
        }
        UpdateStatus::UpToDate if !quiet => {
            println!("{} {} up to date ({})", "✓".green(), report.package.bold(), version);
        }
        UpdateStatus::NotTracked if !quiet => {
            println!("{} {} not tracked by this project", "-".dimmed(), report.package.bold());
        }
        UpdateStatus::NotPublished if !quiet => {
            println!("{} {} not published on the registry", "!".yellow(), report.package.yellow());
        }
        _ => {}
    }
}

fn print_changed(changed: Divergence) {
    if changed.manifest_version {
        println!("  manifest version differs");
    }
    if changed.revision {
        println!("  lock revision differs");
    }
    if changed.package_ref {
        println!("  lock reference differs");
    }
}
