use clap::Args;
use colored::Colorize;
use magic_common::config::InstallerConfig;
use magic_common::error::Result;
use magic_core::doctor;

#[derive(Args, Debug)]
pub struct DoctorArgs;

impl DoctorArgs {
    pub fn run(&self, config: &InstallerConfig) -> Result<()> {
        let project_root = std::env::current_dir()?;
        let report = doctor::run_doctor(&project_root, config)?;

        println!("Magic-spec Doctor:");
        for (name, status) in &report.artifacts {
            if status.exists {
                match &status.path {
                    Some(path) => println!("  {} {name} ({path})", "✓".green()),
                    None => println!("  {} {name}", "✓".green()),
                }
            } else {
                println!("  {} {name} (missing)", "✖".red());
            }
        }
        if let Some(specs) = report.specs {
            println!("  {} stable spec(s)", specs.stable);
        }
        for warning in &report.warnings {
            println!("  {} {warning}", "⚠".yellow());
        }
        Ok(())
    }
}
