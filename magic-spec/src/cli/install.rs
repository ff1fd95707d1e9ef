use std::path::PathBuf;

use clap::Args;
use magic_common::config::InstallerConfig;
use magic_common::error::Result;

use crate::pipeline::{self, Flow};

#[derive(Args, Debug, Default)]
pub struct InstallArgs {
    /// Environment adapter(s) to install (comma separated, first valid name wins)
    #[arg(long, value_name = "NAME")]
    pub env: Option<String>,

    /// Install from the main branch instead of the release matching this CLI
    #[arg(long)]
    pub main: bool,

    /// Use a local payload directory instead of downloading
    #[arg(long, value_name = "DIR")]
    pub source: Option<PathBuf>,
}

impl InstallArgs {
    pub fn run(&self, config: &InstallerConfig, assume_yes: bool) -> Result<()> {
        pipeline::run(&Flow {
            config,
            update: false,
            env_flag: self.env.clone(),
            use_main: self.main,
            source: self.source.clone(),
            assume_yes,
            on_conflict: None,
        })
    }
}
