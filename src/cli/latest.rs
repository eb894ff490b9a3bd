//! `conan-sync latest <package>`

use super::common::{CommandContext, OutputFormat, print_json};
use crate::resolver::{CompletePackageInfo, PackageResolver};
use anyhow::Result;
use clap::Args;
use colored::Colorize;

/// Show the newest version of a package and its latest revision.
#[derive(Args, Debug)]
pub struct LatestCommand {
    /// Package name, for example `zlib`
    pub package: String,

    /// Output format
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,
}

impl LatestCommand {
    pub async fn execute(self, ctx: &CommandContext) -> Result<()> {
        let spinner = ctx.spinner(format!("Resolving {}", self.package));
        let info =
            PackageResolver::new(&ctx.client).resolve_latest(&ctx.registry, &self.package).await;
        spinner.finish();
        let info = info?;

        match (self.format, info) {
            (OutputFormat::Json, info) => print_json(&info)?,
            (OutputFormat::Text, Some(info)) => print_info(&info),
            (OutputFormat::Text, None) => {
                if !ctx.quiet {
                    println!(
                        "{}",
                        format!(
                            "No published revision of '{}' found on '{}'",
                            self.package, ctx.registry.name
                        )
                        .yellow()
                    );
                }
            }
        }

        Ok(())
    }
}

/// Text rendering of resolved info, shared with `update`.
pub(super) fn print_info(info: &CompletePackageInfo) {
    println!("{} {}", info.package_name.bold(), info.version.green());
    println!("  reference:  {}", info.reference);
    println!("  revision:   {}", info.revision_hash);
    println!("  time:       {} ({})", info.raw_time, info.timestamp);
    println!("  lock entry: {}", info.lock_entry.cyan());
    println!("  remote:     {} {}", info.remote, info.url.dimmed());
}
