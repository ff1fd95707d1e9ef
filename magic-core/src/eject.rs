//! Removal of every managed path from a project.

use std::fs;
use std::path::Path;

use magic_common::config::InstallerConfig;
use magic_common::error::{MagicError, Result};

/// Outcome of one eject target.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EjectOutcome {
    Removed,
    Absent,
}

/// Delete the configured target paths under `project_root`, returning one
/// outcome per target in configuration order.
pub fn eject(
    project_root: &Path,
    config: &InstallerConfig,
) -> Result<Vec<(String, EjectOutcome)>> {
    let mut outcomes = Vec::with_capacity(config.eject.targets.len());
    for target in &config.eject.targets {
        let path = project_root.join(target);
        let outcome = if path.is_dir() {
            fs::remove_dir_all(&path).map_err(|e| {
                MagicError::IoError(format!("Failed to remove {}: {}", path.display(), e))
            })?;
            EjectOutcome::Removed
        } else if path.is_file() {
            fs::remove_file(&path).map_err(|e| {
                MagicError::IoError(format!("Failed to remove {}: {}", path.display(), e))
            })?;
            EjectOutcome::Removed
        } else {
            EjectOutcome::Absent
        };
        outcomes.push((target.clone(), outcome));
    }
    Ok(outcomes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use magic_common::InstallerConfig;
    use tempfile::TempDir;

    #[test]
    fn removes_present_targets_and_reports_absent_ones() -> Result<()> {
        let config = InstallerConfig::load()?;
        let dir = TempDir::new()?;
        fs::create_dir_all(dir.path().join(".magic/scripts"))?;
        fs::write(dir.path().join(".magic/.version"), "0.6.0")?;
        fs::create_dir_all(dir.path().join(".agent"))?;

        let outcomes = eject(dir.path(), &config)?;
        assert!(!dir.path().join(".magic").exists());
        assert!(!dir.path().join(".agent").exists());

        let removed: Vec<&str> = outcomes
            .iter()
            .filter(|(_, o)| *o == EjectOutcome::Removed)
            .map(|(t, _)| t.as_str())
            .collect();
        assert_eq!(removed, vec![".magic", ".agent"]);
        assert!(outcomes
            .iter()
            .any(|(t, o)| t == ".cursor/rules" && *o == EjectOutcome::Absent));
        Ok(())
    }
}
