//! Content-hash snapshots of the installed engine tree.

use std::collections::BTreeMap;
use std::fs::{self, File};
use std::io::{BufReader, Read};
use std::path::Path;

use magic_common::config::MANIFEST_FILE;
use magic_common::error::{MagicError, Result};
use sha2::{Digest, Sha256};
use tracing::debug;
use walkdir::WalkDir;

/// Compute SHA256 of a file's raw bytes as a lowercase hex string. No
/// line-ending or whitespace normalization: a single-byte change always
/// changes the hash.
pub fn hash_file(path: &Path) -> Result<String> {
    let file = File::open(path)?;
    let mut reader = BufReader::new(file);
    let mut hasher = Sha256::new();

    let mut buffer = [0u8; 8192];
    loop {
        let bytes_read = reader.read(&mut buffer)?;
        if bytes_read == 0 {
            break;
        }
        hasher.update(&buffer[..bytes_read]);
    }

    Ok(hex::encode(hasher.finalize()))
}

/// Render a root-relative path with forward-slash separators, the key form
/// used by the manifest on every platform.
pub fn rel_to_slash(rel: &Path) -> String {
    rel.components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}

/// Walk every regular file under `root` and hash it, keyed by its
/// slash-normalized relative path. The manifest file itself (and anything
/// under a directory carrying the manifest name) is excluded. A missing
/// root yields an empty mapping, not an error.
pub fn compute_directory_hashes(root: &Path) -> Result<BTreeMap<String, String>> {
    let mut hashes = BTreeMap::new();
    if !root.exists() {
        return Ok(hashes);
    }

    for entry in WalkDir::new(root) {
        let entry = entry
            .map_err(|e| MagicError::IoError(format!("Failed to walk {}: {e}", root.display())))?;
        if !entry.file_type().is_file() {
            continue;
        }
        let rel = entry.path().strip_prefix(root).map_err(|e| {
            MagicError::Generic(format!(
                "Walked path {} escapes root {}: {e}",
                entry.path().display(),
                root.display()
            ))
        })?;
        if rel.components().any(|c| c.as_os_str() == MANIFEST_FILE) {
            continue;
        }
        hashes.insert(rel_to_slash(rel), hash_file(entry.path())?);
    }

    debug!("Hashed {} file(s) under {}", hashes.len(), root.display());
    Ok(hashes)
}

/// Overwrite the manifest at `<root>/.checksums` as stable pretty JSON.
pub fn write_manifest(root: &Path, hashes: &BTreeMap<String, String>) -> Result<()> {
    let path = root.join(MANIFEST_FILE);
    let mut output = serde_json::to_string_pretty(hashes)?;
    output.push('\n');
    fs::write(&path, output)?;
    debug!(
        "Wrote manifest with {} entr(ies) to {}",
        hashes.len(),
        path.display()
    );
    Ok(())
}

/// Read the stored manifest. `None` when no manifest exists yet (fresh
/// install, or an upgrade from a version that predates manifests).
pub fn load_manifest(root: &Path) -> Result<Option<BTreeMap<String, String>>> {
    let path = root.join(MANIFEST_FILE);
    if !path.exists() {
        return Ok(None);
    }
    let content = fs::read_to_string(&path)?;
    let hashes = serde_json::from_str(&content).map_err(|e| {
        MagicError::ChecksumError(format!("Malformed manifest {}: {e}", path.display()))
    })?;
    Ok(Some(hashes))
}
