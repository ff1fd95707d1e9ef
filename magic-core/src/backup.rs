//! Pre-update snapshots of the installed trees.

use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

use magic_common::config::BACKUP_SUFFIX;
use magic_common::error::{MagicError, Result};
use tracing::debug;

use crate::copy::{copy_tree, mirror};

/// Recursively copy `dir` to a sibling named `<dir><suffix>`, replacing any
/// prior backup there. Must complete before any destructive modification of
/// `dir` in the same invocation. Returns the backup path, or `None` when
/// `dir` does not exist.
pub fn backup_tree(dir: &Path) -> Result<Option<PathBuf>> {
    if !dir.exists() {
        return Ok(None);
    }
    let name = dir.file_name().ok_or_else(|| {
        MagicError::Generic(format!("Cannot back up path without a name: {}", dir.display()))
    })?;
    let backup = dir.with_file_name(format!("{}{BACKUP_SUFFIX}", name.to_string_lossy()));

    if backup.exists() {
        fs::remove_dir_all(&backup).map_err(|e| {
            MagicError::IoError(format!(
                "Failed to clear previous backup {}: {}",
                backup.display(),
                e
            ))
        })?;
    }
    copy_tree(dir, &backup, mirror)?;
    debug!("Backed up {} to {}", dir.display(), backup.display());
    Ok(Some(backup))
}

/// Append `entries` to the project's `.gitignore` when that file exists,
/// never duplicating an entry already present. An absent ignore file is a
/// no-op.
pub fn ensure_ignore_entries(project_root: &Path, entries: &[String]) -> Result<()> {
    let gitignore = project_root.join(".gitignore");
    if !gitignore.exists() {
        return Ok(());
    }

    let content = fs::read_to_string(&gitignore)?;
    let existing: HashSet<&str> = content.lines().map(str::trim).collect();
    let missing: Vec<&str> = entries
        .iter()
        .map(String::as_str)
        .filter(|entry| !existing.contains(entry))
        .collect();
    if missing.is_empty() {
        return Ok(());
    }

    let mut updated = content;
    if !updated.is_empty() && !updated.ends_with('\n') {
        updated.push('\n');
    }
    for entry in missing {
        updated.push_str(entry);
        updated.push('\n');
    }
    fs::write(&gitignore, updated)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn backup_mirrors_the_tree() -> Result<()> {
        let dir = TempDir::new()?;
        let engine = dir.path().join(".magic");
        fs::create_dir_all(engine.join("scripts"))?;
        fs::write(engine.join("scripts/init.sh"), "#!/bin/sh\n")?;
        fs::write(engine.join(".version"), "0.6.0")?;

        let backup = backup_tree(&engine)?.expect("backup created");
        assert_eq!(backup, dir.path().join(".magic.bak"));
        assert_eq!(
            fs::read_to_string(backup.join("scripts/init.sh"))?,
            "#!/bin/sh\n"
        );
        assert_eq!(fs::read_to_string(backup.join(".version"))?, "0.6.0");
        Ok(())
    }

    #[test]
    fn backup_replaces_prior_backup() -> Result<()> {
        let dir = TempDir::new()?;
        let engine = dir.path().join(".magic");
        fs::create_dir_all(&engine)?;
        fs::write(engine.join("a.md"), "new")?;

        let stale = dir.path().join(".magic.bak");
        fs::create_dir_all(&stale)?;
        fs::write(stale.join("stale.md"), "old")?;

        backup_tree(&engine)?;
        assert!(!stale.join("stale.md").exists());
        assert_eq!(fs::read_to_string(stale.join("a.md"))?, "new");
        Ok(())
    }

    #[test]
    fn missing_tree_is_not_backed_up() -> Result<()> {
        let dir = TempDir::new()?;
        assert!(backup_tree(&dir.path().join(".magic"))?.is_none());
        Ok(())
    }

    #[test]
    fn ignore_entries_append_idempotently() -> Result<()> {
        let dir = TempDir::new()?;
        let gitignore = dir.path().join(".gitignore");
        fs::write(&gitignore, "target/\n.magic.bak\n")?;

        let entries = vec![".magic.bak".to_string(), ".agent.bak".to_string()];
        ensure_ignore_entries(dir.path(), &entries)?;
        ensure_ignore_entries(dir.path(), &entries)?;

        let content = fs::read_to_string(&gitignore)?;
        assert_eq!(content, "target/\n.magic.bak\n.agent.bak\n");
        Ok(())
    }

    #[test]
    fn absent_gitignore_is_a_no_op() -> Result<()> {
        let dir = TempDir::new()?;
        ensure_ignore_entries(dir.path(), &[".magic.bak".to_string()])?;
        assert!(!dir.path().join(".gitignore").exists());
        Ok(())
    }
}
