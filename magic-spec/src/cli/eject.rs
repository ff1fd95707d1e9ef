use clap::Args;
use colored::Colorize;
use magic_common::config::InstallerConfig;
use magic_common::error::Result;
use magic_core::eject::{self, EjectOutcome};
use tracing::debug;

use crate::prompt;

#[derive(Args, Debug)]
pub struct EjectArgs;

impl EjectArgs {
    pub fn run(&self, config: &InstallerConfig, assume_yes: bool) -> Result<()> {
        let question = format!(
            "Eject {}? This removes every managed file from the project",
            config.package_name
        );
        if !prompt::confirm(&question, assume_yes)? {
            println!("{} Eject cancelled", "⚠".yellow());
            return Ok(());
        }

        let project_root = std::env::current_dir()?;
        println!("Ejecting {} (removing managed files)...", config.package_name);
        for (target, outcome) in eject::eject(&project_root, config)? {
            match outcome {
                EjectOutcome::Removed => println!("  {} Removed {target}", "✓".green()),
                EjectOutcome::Absent => debug!("Nothing to remove at {target}"),
            }
        }
        println!("{} Eject complete", "✓".green().bold());
        Ok(())
    }
}
