use std::path::PathBuf;

use clap::{Args, ValueEnum};
use magic_common::config::InstallerConfig;
use magic_common::error::Result;
use magic_core::conflict::ConflictChoice;

use crate::pipeline::{self, Flow};

#[derive(ValueEnum, Debug, Clone, Copy)]
pub enum OnConflict {
    /// Discard local changes and copy everything from the payload
    Overwrite,
    /// Keep locally modified files, copy the rest
    Skip,
    /// Stop the update without writing anything
    Abort,
}

impl From<OnConflict> for ConflictChoice {
    fn from(choice: OnConflict) -> Self {
        match choice {
            OnConflict::Overwrite => ConflictChoice::Overwrite,
            OnConflict::Skip => ConflictChoice::Skip,
            OnConflict::Abort => ConflictChoice::Abort,
        }
    }
}

#[derive(Args, Debug)]
pub struct UpdateArgs {
    /// Environment adapter recorded for this project (comma separated, first valid name wins)
    #[arg(long, value_name = "NAME")]
    pub env: Option<String>,

    /// Update from the main branch instead of the release matching this CLI
    #[arg(long)]
    pub main: bool,

    /// Use a local payload directory instead of downloading
    #[arg(long, value_name = "DIR")]
    pub source: Option<PathBuf>,

    /// Pre-select how locally modified files are handled
    #[arg(long, value_enum, value_name = "CHOICE")]
    pub on_conflict: Option<OnConflict>,
}

impl UpdateArgs {
    pub fn run(&self, config: &InstallerConfig, assume_yes: bool) -> Result<()> {
        pipeline::run(&Flow {
            config,
            update: true,
            env_flag: self.env.clone(),
            use_main: self.main,
            source: self.source.clone(),
            assume_yes,
            on_conflict: self.on_conflict.map(ConflictChoice::from),
        })
    }
}
