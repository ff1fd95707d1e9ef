//! Version marker and installation-record persistence.

use std::fs;
use std::path::Path;

use magic_common::config::InstallerConfig;
use magic_common::error::{MagicError, Result};
use magic_common::model::project::ProjectConfig;

/// Read `.magic/.version`. `None` when not installed yet.
pub fn read_installed_version(
    project_root: &Path,
    config: &InstallerConfig,
) -> Result<Option<String>> {
    let path = config.version_file(project_root);
    if !path.exists() {
        return Ok(None);
    }
    Ok(Some(fs::read_to_string(&path)?.trim().to_string()))
}

pub fn write_version_file(
    project_root: &Path,
    config: &InstallerConfig,
    version: &str,
) -> Result<()> {
    let path = config.version_file(project_root);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(&path, version)?;
    Ok(())
}

/// Read `.magicrc.json`. `None` when absent; malformed content is a named
/// configuration error, never a silent default.
pub fn load_project_config(
    project_root: &Path,
    config: &InstallerConfig,
) -> Result<Option<ProjectConfig>> {
    let path = config.project_config_file(project_root);
    if !path.exists() {
        return Ok(None);
    }
    let content = fs::read_to_string(&path)?;
    let record: ProjectConfig = serde_json::from_str(&content)
        .map_err(|e| MagicError::Config(format!("Malformed {}: {e}", path.display())))?;
    Ok(Some(record))
}

pub fn save_project_config(
    project_root: &Path,
    config: &InstallerConfig,
    record: &ProjectConfig,
) -> Result<()> {
    let path = config.project_config_file(project_root);
    let mut content = serde_json::to_string_pretty(record)?;
    content.push('\n');
    fs::write(&path, content)?;
    Ok(())
}
