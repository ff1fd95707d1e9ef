//! The install/update workflow: backup, payload, adapter resolution,
//! conflict reconciliation, copy, state persistence.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use colored::Colorize;
use magic_common::config::{InstallerConfig, BACKUP_SUFFIX, DEFAULT_ENV, PROJECT_CONFIG_FILE};
use magic_common::error::{MagicError, Result};
use magic_common::model::project::ProjectConfig;
use magic_core::checksum::{self, rel_to_slash};
use magic_core::conflict::{self, ConflictChoice};
use magic_core::copy::{self, Action};
use magic_core::payload::{fetch_payload, Payload, PayloadSpec};
use magic_core::{adapter, backup, script, state};
use tracing::debug;

use crate::prompt;

const CLI_VERSION: &str = env!("CARGO_PKG_VERSION");
const CONFLICTS_SHOWN: usize = 10;

pub struct Flow<'a> {
    pub config: &'a InstallerConfig,
    pub update: bool,
    pub env_flag: Option<String>,
    pub use_main: bool,
    pub source: Option<PathBuf>,
    pub assume_yes: bool,
    pub on_conflict: Option<ConflictChoice>,
}

pub fn run(flow: &Flow) -> Result<()> {
    let project_root = std::env::current_dir()?;
    let config = flow.config;

    if flow.update {
        println!("Updating {}...", config.package_name);
    } else {
        println!("Initializing {}...", config.package_name);
    }

    // Whole-tree backups must complete before anything destructive.
    if flow.update {
        backup_step(config, &project_root)?;
    }

    // A payload failure aborts the whole run; the temporary download area
    // is dropped (and removed) with the error.
    let spec = match (&flow.source, flow.use_main) {
        (Some(dir), _) => PayloadSpec::LocalDir { path: dir.clone() },
        (None, true) => PayloadSpec::Branch {
            name: "main".to_string(),
        },
        (None, false) => PayloadSpec::Release {
            version: CLI_VERSION.to_string(),
        },
    };
    let payload = fetch_payload(&spec, config, CLI_VERSION)?;
    println!("{} Payload ready (version {})", "✓".green(), payload.version);

    let env_name = resolve_adapter(flow, &project_root)?;

    let skip_set = if flow.update {
        conflict_step(flow, &project_root)?
    } else {
        HashSet::new()
    };

    copy_engine_step(flow, &payload, &project_root, &skip_set)?;

    if !flow.update {
        adapter_step(flow, &payload, &project_root, env_name.as_deref())?;
        init_script_step(flow, &project_root)?;
    }

    persist_state_step(flow, &payload, &project_root, env_name.as_deref());

    println!(
        "{} {} {} successfully",
        "✓".green().bold(),
        config.package_name,
        if flow.update { "updated" } else { "initialized" }
    );
    Ok(())
}

fn backup_step(config: &InstallerConfig, project_root: &Path) -> Result<()> {
    for dir_name in [&config.engine_dir, &config.agent_dir] {
        let dir = project_root.join(dir_name);
        if let Some(backup_path) = backup::backup_tree(&dir)? {
            println!(
                "{} Backed up {dir_name} to {}",
                "✓".green(),
                backup_path
                    .file_name()
                    .unwrap_or_default()
                    .to_string_lossy()
            );
        }
    }
    let entries = vec![
        format!("{}{BACKUP_SUFFIX}", config.engine_dir),
        format!("{}{BACKUP_SUFFIX}", config.agent_dir),
    ];
    if let Err(e) = backup::ensure_ignore_entries(project_root, &entries) {
        println!("{} Could not update .gitignore: {e}", "⚠".yellow());
    }
    Ok(())
}

/// Effective adapter name, by precedence: explicit `--env` value, then the
/// persisted installation record (unless it holds the default sentinel),
/// then — on installs only — marker-based detection behind a confirmation.
fn resolve_adapter(flow: &Flow, project_root: &Path) -> Result<Option<String>> {
    let config = flow.config;

    if let Some(raw) = &flow.env_flag {
        let mut seen = HashSet::new();
        for name in raw.split(',').map(str::trim).filter(|s| !s.is_empty()) {
            if !seen.insert(name) {
                continue;
            }
            if name == DEFAULT_ENV {
                return Ok(None);
            }
            if config.adapter(name).is_some() {
                return Ok(Some(name.to_string()));
            }
            println!(
                "{} Unknown adapter '{name}'. Valid adapters: {}",
                "⚠".yellow(),
                config.adapter_names().join(", ")
            );
        }
        return Ok(None);
    }

    if let Some(record) = state::load_project_config(project_root, config)? {
        if !record.is_default_env() {
            if config.adapter(&record.env).is_some() {
                debug!("Using adapter '{}' from the installation record", record.env);
                return Ok(Some(record.env));
            }
            println!(
                "{} Recorded adapter '{}' is no longer known; falling back to default",
                "⚠".yellow(),
                record.env
            );
        }
    }

    if !flow.update {
        for (name, def) in &config.adapters {
            let Some(marker) = &def.marker else { continue };
            if !project_root.join(marker).exists() {
                continue;
            }
            let question = format!(
                "Detected '{marker}'. Install the {name} adapter ({})?",
                def.description
            );
            if prompt::confirm(&question, flow.assume_yes)? {
                return Ok(Some(name.clone()));
            }
        }
    }

    Ok(None)
}

/// Detect local modifications and turn the user's choice into a skip set
/// for the engine copy. An empty result means a full overwrite.
fn conflict_step(flow: &Flow, project_root: &Path) -> Result<HashSet<String>> {
    let engine_root = flow.config.engine_root(project_root);
    let Some(manifest) = checksum::load_manifest(&engine_root)? else {
        // Fresh install or a pre-manifest engine: unconditional overwrite.
        return Ok(HashSet::new());
    };
    let conflicts = conflict::find_conflicts(&engine_root, &manifest)?;
    if conflicts.is_empty() {
        return Ok(HashSet::new());
    }

    println!(
        "{} {} locally modified file(s) detected:",
        "⚠".yellow(),
        conflicts.len()
    );
    for path in conflicts.iter().take(CONFLICTS_SHOWN) {
        println!("    {path}");
    }
    if conflicts.len() > CONFLICTS_SHOWN {
        println!("    … and {} more", conflicts.len() - CONFLICTS_SHOWN);
    }

    match prompt::conflict_choice(flow.on_conflict)? {
        ConflictChoice::Overwrite => {
            println!("{} Overwriting local changes", "⚠".yellow());
            Ok(HashSet::new())
        }
        ConflictChoice::Skip => {
            println!(
                "{} Keeping {} modified file(s)",
                "✓".green(),
                conflicts.len()
            );
            Ok(conflicts.into_iter().collect())
        }
        ConflictChoice::Abort => Err(MagicError::Aborted(
            "update aborted at the conflict prompt".to_string(),
        )),
    }
}

fn copy_engine_step(
    flow: &Flow,
    payload: &Payload,
    project_root: &Path,
    skip_set: &HashSet<String>,
) -> Result<()> {
    let config = flow.config;
    let engine_src = payload.root.join(&config.engine_dir);
    if engine_src.is_dir() {
        let count = copy::copy_tree(&engine_src, &config.engine_root(project_root), |rel| {
            if skip_set.contains(&rel_to_slash(rel)) {
                Action::Skip
            } else {
                copy::mirror(rel)
            }
        })?;
        println!("{} Engine tree synced ({count} files)", "✓".green());
    } else {
        println!(
            "{} Payload has no {} directory",
            "⚠".yellow(),
            config.engine_dir
        );
    }

    // Updates refresh the default agent tree as well; its pre-update state
    // is covered by the backup, not by the manifest.
    if flow.update {
        let agent_src = payload.root.join(&config.agent_dir);
        if agent_src.is_dir() {
            let count = copy::copy_tree(
                &agent_src,
                &config.agent_root(project_root),
                copy::mirror,
            )?;
            println!("{} Agent tree synced ({count} files)", "✓".green());
        }
    }
    Ok(())
}

fn adapter_step(
    flow: &Flow,
    payload: &Payload,
    project_root: &Path,
    env_name: Option<&str>,
) -> Result<()> {
    let config = flow.config;
    match env_name {
        Some(name) => {
            let def = config.adapter(name).ok_or_else(|| {
                MagicError::Generic(format!("adapter '{name}' vanished from configuration"))
            })?;
            let workflows = config.workflows_src(&payload.root);
            if !workflows.is_dir() {
                println!(
                    "{} Workflow sources missing at {}; installed 0 files for '{name}'",
                    "⚠".yellow(),
                    workflows.display()
                );
                return Ok(());
            }
            let count = adapter::install_adapter(project_root, &workflows, name, def, config)?;
            println!(
                "{} Adapter installed: {name} → {} ({count} files)",
                "✓".green(),
                def.dest
            );
        }
        None => {
            let agent_src = payload.root.join(&config.agent_dir);
            if agent_src.is_dir() {
                let count = copy::copy_tree(
                    &agent_src,
                    &config.agent_root(project_root),
                    copy::mirror,
                )?;
                println!(
                    "{} Default agent tree installed ({count} files)",
                    "✓".green()
                );
            } else {
                println!(
                    "{} Payload has no {} directory",
                    "⚠".yellow(),
                    config.agent_dir
                );
            }
        }
    }
    Ok(())
}

fn init_script_step(flow: &Flow, project_root: &Path) -> Result<()> {
    let config = flow.config;
    let script_file = script::script_path(&config.scripts_dir(project_root), "init");
    if !script_file.exists() {
        debug!("No initialization script present");
        return Ok(());
    }
    if !prompt::confirm("Run the initialization script now?", flow.assume_yes)? {
        println!("{} Initialization script skipped", "⚠".yellow());
        return Ok(());
    }
    println!("Running initialization script...");
    if script::run_init_script(project_root, config)? {
        println!("{} Initialization script completed", "✓".green());
    }
    Ok(())
}

/// Persist version, installation record and checksum manifest. Each failure
/// is downgraded to a warning: these files serve future runs, not the
/// correctness of this one.
fn persist_state_step(
    flow: &Flow,
    payload: &Payload,
    project_root: &Path,
    env_name: Option<&str>,
) {
    let config = flow.config;

    if let Err(e) = state::write_version_file(project_root, config, &payload.version) {
        println!("{} Could not write version file: {e}", "⚠".yellow());
    }

    let record = ProjectConfig::new(env_name, &payload.version);
    if let Err(e) = state::save_project_config(project_root, config, &record) {
        println!(
            "{} Could not write {PROJECT_CONFIG_FILE}: {e}",
            "⚠".yellow()
        );
    }

    let engine_root = config.engine_root(project_root);
    match checksum::compute_directory_hashes(&engine_root) {
        Ok(hashes) => {
            if let Err(e) = checksum::write_manifest(&engine_root, &hashes) {
                println!("{} Could not write checksum manifest: {e}", "⚠".yellow());
            }
        }
        Err(e) => println!("{} Could not compute checksums: {e}", "⚠".yellow()),
    }
}
