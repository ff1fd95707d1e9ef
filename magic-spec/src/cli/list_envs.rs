use clap::Args;
use magic_common::config::{InstallerConfig, DEFAULT_ENV};
use magic_common::error::Result;

#[derive(Args, Debug)]
pub struct ListEnvsArgs;

impl ListEnvsArgs {
    pub fn run(&self, config: &InstallerConfig) -> Result<()> {
        println!("Supported environments:");
        for (name, def) in &config.adapters {
            println!("  {name:<10} → {:<22} {}", def.dest, def.description);
        }
        println!(
            "  {DEFAULT_ENV:<10} → {:<22} Plain default workflow tree",
            config.agent_dir
        );
        Ok(())
    }
}
