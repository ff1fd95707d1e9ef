//! Payload resolution: a version identifier in, a local directory tree out.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use magic_common::config::{InstallerConfig, VERSION_FILE};
use magic_common::error::{MagicError, Result};
use magic_net::{download_archive, GitReference};
use tempfile::TempDir;
use tracing::debug;

use crate::extract::extract_tar_gz;

/// Where the distributable files come from for one invocation.
#[derive(Debug, Clone)]
pub enum PayloadSpec {
    /// The release tagged `v<version>` on the configured repository.
    Release { version: String },
    /// A branch head, the explicit fallback when a tag is missing.
    Branch { name: String },
    /// A local checkout used as-is; no network involved.
    LocalDir { path: PathBuf },
}

/// A resolved payload tree. Holding the value keeps any temporary download
/// area alive; dropping it removes that area on every exit path.
#[derive(Debug)]
pub struct Payload {
    pub root: PathBuf,
    pub version: String,
    _temp: Option<TempDir>,
}

pub fn fetch_payload(
    spec: &PayloadSpec,
    config: &InstallerConfig,
    fallback_version: &str,
) -> Result<Payload> {
    match spec {
        PayloadSpec::LocalDir { path } => {
            if !path.is_dir() {
                return Err(MagicError::NotFound(format!(
                    "payload source directory {} does not exist",
                    path.display()
                )));
            }
            let version = read_payload_version(path, config)
                .unwrap_or_else(|| fallback_version.to_string());
            Ok(Payload {
                root: path.clone(),
                version,
                _temp: None,
            })
        }
        PayloadSpec::Release { version } => {
            let (root, temp) = fetch_remote(&GitReference::Tag(version.clone()), config)?;
            Ok(Payload {
                root,
                version: version.clone(),
                _temp: Some(temp),
            })
        }
        PayloadSpec::Branch { name } => {
            let (root, temp) = fetch_remote(&GitReference::Branch(name.clone()), config)?;
            let version = read_payload_version(&root, config)
                .unwrap_or_else(|| fallback_version.to_string());
            Ok(Payload {
                root,
                version,
                _temp: Some(temp),
            })
        }
    }
}

fn fetch_remote(reference: &GitReference, config: &InstallerConfig) -> Result<(PathBuf, TempDir)> {
    let temp = tempfile::Builder::new()
        .prefix(config.download.temp_prefix.as_str())
        .tempdir()
        .map_err(|e| MagicError::IoError(format!("Failed to create download area: {e}")))?;

    let archive = download_archive(
        &config.github_repo,
        reference,
        temp.path(),
        Duration::from_millis(config.download.timeout_ms),
        &config.user_agent,
    )?;

    let extracted = temp.path().join("payload");
    extract_tar_gz(&archive, &extracted)?;
    let root = locate_single_root(&extracted)?;
    debug!("Payload for {} ready at {}", reference.label(), root.display());
    Ok((root, temp))
}

/// GitHub archives wrap everything in a single `<repo>-<ref>` directory;
/// when exactly one directory sits under `dir`, that is the payload root.
fn locate_single_root(dir: &Path) -> Result<PathBuf> {
    let mut entries = Vec::new();
    for entry in fs::read_dir(dir)? {
        entries.push(entry?.path());
    }
    match entries.as_slice() {
        [single] if single.is_dir() => Ok(single.clone()),
        _ => Ok(dir.to_path_buf()),
    }
}

fn read_payload_version(root: &Path, config: &InstallerConfig) -> Option<String> {
    let version_file = root.join(&config.engine_dir).join(VERSION_FILE);
    fs::read_to_string(version_file)
        .ok()
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}
