//! `conan-sync versions <package>`

use super::common::{CommandContext, OutputFormat, print_json};
use crate::resolver::VersionResolver;
use anyhow::Result;
use clap::Args;
use colored::Colorize;

/// List published versions of a package, newest first.
#[derive(Args, Debug)]
pub struct VersionsCommand {
    /// Package name, for example `zlib`
    pub package: String,

    /// Output format
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,
}

impl VersionsCommand {
    pub async fn execute(self, ctx: &CommandContext) -> Result<()> {
        let spinner = ctx.spinner(format!("Searching {} for {}", ctx.registry.name, self.package));
        let versions =
            VersionResolver::new(&ctx.client).all_versions(&ctx.registry, &self.package).await;
        spinner.finish();

        match self.format {
            OutputFormat::Json => print_json(&versions)?,
            OutputFormat::Text if versions.is_empty() => {
                if !ctx.quiet {
                    println!(
                        "{}",
                        format!("No versions of '{}' found on '{}'", self.package, ctx.registry.name)
                            .yellow()
                    );
                }
            }
            OutputFormat::Text => {
                for (index, version) in versions.iter().enumerate() {
                    if index == 0 {
                        println!("{}  {}", version.version.green().bold(), version.reference.dimmed());
                    } else {
                        println!("{}  {}", version.version, version.reference.dimmed());
                    }
                }
            }
        }

        Ok(())
    }
}
