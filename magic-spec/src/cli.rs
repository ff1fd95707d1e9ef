// magic-spec/src/cli.rs
//! Defines the command-line argument structure using clap.
use clap::{ArgAction, Parser, Subcommand};
use magic_common::config::InstallerConfig;
use magic_common::error::Result;

// Module declarations
pub mod check;
pub mod doctor;
pub mod eject;
pub mod info;
pub mod install;
pub mod list_envs;
pub mod update;

use crate::cli::check::CheckArgs;
use crate::cli::doctor::DoctorArgs;
use crate::cli::eject::EjectArgs;
use crate::cli::info::InfoArgs;
use crate::cli::install::InstallArgs;
use crate::cli::list_envs::ListEnvsArgs;
use crate::cli::update::UpdateArgs;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None, name = "magic-spec", bin_name = "magic-spec")]
#[command(propagate_version = true)]
pub struct CliArgs {
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Pre-authorize every confirmation prompt
    #[arg(short = 'y', long, global = true)]
    pub yes: bool,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Install the engine and adapter files into the current project (default)
    Install(InstallArgs),
    /// Update an existing installation, preserving local modifications on request
    Update(UpdateArgs),
    /// Run the prerequisite checks and report project artifacts
    Doctor(DoctorArgs),
    /// Compare the installed engine version against this CLI
    Check(CheckArgs),
    /// Show installation status
    Info(InfoArgs),
    /// Remove every managed file from the project
    Eject(EjectArgs),
    /// List the supported environment adapters
    ListEnvs(ListEnvsArgs),
}

impl Command {
    pub fn run(&self, config: &InstallerConfig, assume_yes: bool) -> Result<()> {
        match self {
            Self::Install(command) => command.run(config, assume_yes),
            Self::Update(command) => command.run(config, assume_yes),
            Self::Doctor(command) => command.run(config),
            Self::Check(command) => command.run(config),
            Self::Info(command) => command.run(config),
            Self::Eject(command) => command.run(config, assume_yes),
            Self::ListEnvs(command) => command.run(config),
        }
    }
}
