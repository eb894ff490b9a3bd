//! `conan-sync revision <package> <version>`

use super::common::{CommandContext, OutputFormat, print_json};
use crate::resolver::RevisionResolver;
use anyhow::Result;
use clap::Args;
use colored::Colorize;

/// Show the latest revision of one version.
#[derive(Args, Debug)]
pub struct RevisionCommand {
    /// Package name
    pub package: String,

    /// Exact version string as published
    #[arg(value_name = "VERSION")]
    pub pkg_version: String,

    /// Full `name/version@user/channel` reference, skipping the version lookup
    #[arg(long)]
    pub reference: Option<String>,

    /// Output format
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,
}

impl RevisionCommand {
    pub async fn execute(self, ctx: &CommandContext) -> Result<()> {
        let spinner = ctx.spinner(format!("Fetching revisions of {}/{}", self.package, self.pkg_version));
        let revision = RevisionResolver::new(&ctx.client)
            .latest_revision(&ctx.registry, &self.package, &self.pkg_version, self.reference.as_deref())
            .await;
        spinner.finish();
        let revision = revision?;

        match (self.format, revision) {
            (OutputFormat::Json, revision) => print_json(&revision)?,
            (OutputFormat::Text, Some(revision)) => {
                println!("{}", revision.reference.bold());
                println!("  revision:   {}", revision.revision_hash);
                println!("  time:       {} ({})", revision.raw_time, revision.timestamp);
                println!("  lock entry: {}", revision.lock_entry.cyan());
            }
            (OutputFormat::Text, None) => {
                if !ctx.quiet {
                    println!(
                        "{}",
                        format!("No revision of {}/{} available", self.package, self.pkg_version)
                            .yellow()
                    );
                }
            }
        }

        Ok(())
    }
}
