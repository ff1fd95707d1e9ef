use clap::Args;
use magic_common::config::InstallerConfig;
use magic_common::error::Result;
use magic_core::state;

#[derive(Args, Debug)]
pub struct InfoArgs;

impl InfoArgs {
    pub fn run(&self, config: &InstallerConfig) -> Result<()> {
        let project_root = std::env::current_dir()?;
        let engine_version = state::read_installed_version(&project_root, config)?
            .unwrap_or_else(|| "Unknown".to_string());
        let environment = state::load_project_config(&project_root, config)?
            .map(|record| record.env)
            .unwrap_or_else(|| "Unknown".to_string());

        println!("{} CLI v{}", config.package_name, env!("CARGO_PKG_VERSION"));
        println!("Project Engine v{engine_version}");
        println!("Environment: {environment}");
        println!("Current Path: {}", project_root.display());
        Ok(())
    }
}
