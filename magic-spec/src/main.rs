// magic-spec/src/main.rs
use std::process;

use clap::Parser;
use colored::Colorize;
use magic_common::config::InstallerConfig;
use magic_common::error::Result;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

mod cli;
mod pipeline;
mod prompt;

use cli::install::InstallArgs;
use cli::{CliArgs, Command};

fn main() {
    let cli_args = CliArgs::parse();

    let level_filter = match cli_args.verbose {
        0 => LevelFilter::WARN,
        1 => LevelFilter::DEBUG,
        _ => LevelFilter::TRACE,
    };
    let env_filter = EnvFilter::builder()
        .with_default_directive(level_filter.into())
        .with_env_var("MAGIC_LOG")
        .from_env_lossy();
    let _ = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .with_ansi(true)
        .without_time()
        .try_init();

    if let Err(e) = run(cli_args) {
        eprintln!("{} {}", "✖ Error:".red().bold(), e);
        process::exit(1);
    }
}

fn run(cli_args: CliArgs) -> Result<()> {
    let config = InstallerConfig::load()?;
    // Install/update is the default when no mode is named.
    let command = cli_args
        .command
        .unwrap_or_else(|| Command::Install(InstallArgs::default()));
    command.run(&config, cli_args.yes)
}
