//! The one tree-walking primitive behind every copy in the installer.
//!
//! Callers inject a per-file policy deciding, for each regular file, whether
//! it is skipped, copied verbatim, or rendered through a workflow transform
//! (possibly under a different destination name). The engine sync, the
//! skip-conflicting selective copy, backups and the adapter installer all go
//! through here.

use std::fs;
use std::path::{Path, PathBuf};

use magic_common::error::{MagicError, Result};
use walkdir::WalkDir;

use crate::adapter::WorkflowTransform;

#[derive(Debug, Clone)]
pub enum Action {
    Skip,
    /// Byte-for-byte copy to `dest_rel` under the destination root.
    Copy { dest_rel: PathBuf },
    /// Render text content through a transform, writing to `dest_rel`.
    /// Non-UTF-8 sources fall back to a raw copy.
    Render {
        dest_rel: PathBuf,
        transform: WorkflowTransform,
    },
}

/// Walk the regular files under `src`, apply `policy` to each root-relative
/// path, and materialize the results under `dest`. Returns the number of
/// files written. A missing `src` writes nothing.
pub fn copy_tree<F>(src: &Path, dest: &Path, mut policy: F) -> Result<usize>
where
    F: FnMut(&Path) -> Action,
{
    if !src.exists() {
        return Ok(0);
    }

    let mut written = 0;
    for entry in WalkDir::new(src) {
        let entry = entry
            .map_err(|e| MagicError::IoError(format!("Failed to walk {}: {e}", src.display())))?;
        if !entry.file_type().is_file() {
            continue;
        }
        let rel = entry.path().strip_prefix(src).map_err(|e| {
            MagicError::Generic(format!(
                "Walked path {} escapes root {}: {e}",
                entry.path().display(),
                src.display()
            ))
        })?;

        match policy(rel) {
            Action::Skip => {}
            Action::Copy { dest_rel } => {
                let target = dest.join(dest_rel);
                ensure_parent(&target)?;
                fs::copy(entry.path(), &target).map_err(|e| {
                    MagicError::IoError(format!(
                        "Failed to copy {} to {}: {}",
                        entry.path().display(),
                        target.display(),
                        e
                    ))
                })?;
                written += 1;
            }
            Action::Render {
                dest_rel,
                transform,
            } => {
                let target = dest.join(dest_rel);
                ensure_parent(&target)?;
                let bytes = fs::read(entry.path())?;
                match String::from_utf8(bytes) {
                    Ok(text) => fs::write(&target, transform.apply(&text))?,
                    Err(raw) => fs::write(&target, raw.into_bytes())?,
                }
                written += 1;
            }
        }
    }
    Ok(written)
}

fn ensure_parent(target: &Path) -> Result<()> {
    if let Some(parent) = target.parent() {
        fs::create_dir_all(parent).map_err(|e| {
            MagicError::IoError(format!(
                "Failed to create directory {}: {}",
                parent.display(),
                e
            ))
        })?;
    }
    Ok(())
}

/// The identity policy: copy every file under its own relative path.
pub fn mirror(rel: &Path) -> Action {
    Action::Copy {
        dest_rel: rel.to_path_buf(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn write(root: &Path, rel: &str, content: &str) {
        let path = root.join(rel);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, content).unwrap();
    }

    #[test]
    fn mirror_copies_nested_tree() -> Result<()> {
        let src = TempDir::new()?;
        let dest = TempDir::new()?;
        write(src.path(), "a.md", "alpha");
        write(src.path(), "sub/b.md", "beta");

        let written = copy_tree(src.path(), dest.path(), mirror)?;
        assert_eq!(written, 2);
        assert_eq!(fs::read_to_string(dest.path().join("a.md"))?, "alpha");
        assert_eq!(fs::read_to_string(dest.path().join("sub/b.md"))?, "beta");
        Ok(())
    }

    #[test]
    fn missing_source_writes_nothing() -> Result<()> {
        let dest = TempDir::new()?;
        let written = copy_tree(Path::new("/no/such/tree"), dest.path(), mirror)?;
        assert_eq!(written, 0);
        Ok(())
    }

    #[test]
    fn skip_policy_preserves_destination_files() -> Result<()> {
        let src = TempDir::new()?;
        let dest = TempDir::new()?;
        write(src.path(), "keep.md", "upstream");
        write(src.path(), "take.md", "upstream");
        write(dest.path(), "keep.md", "local edit");

        let written = copy_tree(src.path(), dest.path(), |rel| {
            if rel.to_string_lossy() == "keep.md" {
                Action::Skip
            } else {
                mirror(rel)
            }
        })?;
        assert_eq!(written, 1);
        assert_eq!(fs::read_to_string(dest.path().join("keep.md"))?, "local edit");
        assert_eq!(fs::read_to_string(dest.path().join("take.md"))?, "upstream");
        Ok(())
    }
}
