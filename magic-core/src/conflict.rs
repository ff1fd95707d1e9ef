//! Drift detection between a stored manifest and the on-disk engine tree.

use std::collections::BTreeMap;
use std::path::Path;

use magic_common::error::Result;
use tracing::debug;

use crate::checksum::hash_file;

/// Resolution for a non-empty conflict set.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConflictChoice {
    /// Full recursive copy, discarding local edits.
    Overwrite,
    /// Copy everything except the conflicting files.
    Skip,
    /// Terminate the update with no further writes.
    Abort,
}

/// Compare every manifest entry against the file currently on disk. A hash
/// mismatch is a conflict; a manifest entry whose file is gone is not
/// (user deletion is not tracked as drift). Order follows the manifest so
/// truncated display is reproducible.
pub fn find_conflicts(root: &Path, manifest: &BTreeMap<String, String>) -> Result<Vec<String>> {
    let mut conflicts = Vec::new();
    for (rel, recorded) in manifest {
        let path = root.join(rel);
        if !path.is_file() {
            continue;
        }
        let current = hash_file(&path)?;
        if &current != recorded {
            debug!("Local modification detected: {rel}");
            conflicts.push(rel.clone());
        }
    }
    Ok(conflicts)
}
