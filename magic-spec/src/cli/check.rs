use clap::Args;
use magic_common::config::InstallerConfig;
use magic_common::error::Result;
use magic_core::state;
use semver::Version;

#[derive(Args, Debug)]
pub struct CheckArgs;

impl CheckArgs {
    pub fn run(&self, config: &InstallerConfig) -> Result<()> {
        let cli_version = env!("CARGO_PKG_VERSION");
        let project_root = std::env::current_dir()?;

        match state::read_installed_version(&project_root, config)? {
            None => println!("{} v{cli_version} (not initialized)", config.package_name),
            Some(installed) => {
                match (Version::parse(&installed), Version::parse(cli_version)) {
                    (Ok(have), Ok(want)) if have < want => println!(
                        "{} v{installed} (Update available: v{cli_version})",
                        config.package_name
                    ),
                    (Ok(_), Ok(_)) => {
                        println!("{} v{installed} (up to date)", config.package_name)
                    }
                    // Branch installs record non-semver identifiers.
                    _ => println!(
                        "{} v{installed} (CLI v{cli_version})",
                        config.package_name
                    ),
                }
            }
        }
        Ok(())
    }
}
