//! Safe extraction of the downloaded release archive.

use std::fs::{self, File};
use std::io::BufReader;
use std::path::{Component, Path, PathBuf};

use flate2::read::GzDecoder;
use magic_common::error::{MagicError, Result};
use tar::Archive;
use tracing::debug;

/// Join an archive entry path onto `dest`, rejecting absolute paths and
/// parent-directory traversal. Any offending entry fails the whole
/// extraction with a security error.
fn safe_join(dest: &Path, entry_path: &Path) -> Result<PathBuf> {
    let mut target = dest.to_path_buf();
    for comp in entry_path.components() {
        match comp {
            Component::Normal(part) => target.push(part),
            Component::CurDir => {}
            Component::ParentDir => {
                return Err(MagicError::ExtractionError(format!(
                    "Unsafe '..' in archive path {}",
                    entry_path.display()
                )));
            }
            Component::Prefix(_) | Component::RootDir => {
                return Err(MagicError::ExtractionError(format!(
                    "Disallowed absolute component in archive path {}",
                    entry_path.display()
                )));
            }
        }
    }
    if !target.starts_with(dest) {
        return Err(MagicError::ExtractionError(format!(
            "Path traversal {} escapes {}",
            entry_path.display(),
            dest.display()
        )));
    }
    Ok(target)
}

fn open_archive(archive_path: &Path) -> Result<Archive<GzDecoder<BufReader<File>>>> {
    let file = File::open(archive_path).map_err(|e| {
        MagicError::IoError(format!(
            "Failed to open archive {}: {}",
            archive_path.display(),
            e
        ))
    })?;
    Ok(Archive::new(GzDecoder::new(BufReader::new(file))))
}

/// List every entry path and reject unsafe ones before anything is written.
fn verify_archive(archive_path: &Path, dest: &Path) -> Result<()> {
    let mut archive = open_archive(archive_path)?;
    for entry_result in archive.entries().map_err(|e| {
        MagicError::ExtractionError(format!(
            "Failed to read archive {}: {}",
            archive_path.display(),
            e
        ))
    })? {
        let entry = entry_result.map_err(|e| {
            MagicError::ExtractionError(format!(
                "Error reading entry from {}: {}",
                archive_path.display(),
                e
            ))
        })?;
        let entry_path = entry
            .path()
            .map_err(|e| {
                MagicError::ExtractionError(format!(
                    "Invalid path in entry from {}: {}",
                    archive_path.display(),
                    e
                ))
            })?
            .into_owned();
        safe_join(dest, &entry_path)?;
    }
    Ok(())
}

/// Unpack a `.tar.gz` archive under `dest`. Every entry path is verified
/// first; an unsafe entry fails the extraction before any file is written.
pub fn extract_tar_gz(archive_path: &Path, dest: &Path) -> Result<()> {
    verify_archive(archive_path, dest)?;

    fs::create_dir_all(dest)?;
    let mut archive = open_archive(archive_path)?;
    for entry_result in archive.entries().map_err(|e| {
        MagicError::ExtractionError(format!(
            "Failed to read archive {}: {}",
            archive_path.display(),
            e
        ))
    })? {
        let mut entry = entry_result.map_err(|e| {
            MagicError::ExtractionError(format!(
                "Error reading entry from {}: {}",
                archive_path.display(),
                e
            ))
        })?;
        let entry_path = entry
            .path()
            .map_err(|e| {
                MagicError::ExtractionError(format!(
                    "Invalid path in entry from {}: {}",
                    archive_path.display(),
                    e
                ))
            })?
            .into_owned();

        let target = safe_join(dest, &entry_path)?;
        if entry.header().entry_type().is_dir() {
            fs::create_dir_all(&target)?;
            continue;
        }
        if let Some(parent) = target.parent() {
            fs::create_dir_all(parent)?;
        }
        entry.unpack(&target).map_err(|e| {
            MagicError::ExtractionError(format!(
                "Failed to unpack {} to {}: {}",
                entry_path.display(),
                target.display(),
                e
            ))
        })?;
    }

    debug!(
        "Extracted {} into {}",
        archive_path.display(),
        dest.display()
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use flate2::write::GzEncoder;
    use flate2::Compression;
    use tempfile::TempDir;

    fn build_archive(dest: &Path, files: &[(&str, &str)]) {
        let file = File::create(dest).unwrap();
        let encoder = GzEncoder::new(file, Compression::default());
        let mut builder = tar::Builder::new(encoder);
        for (path, content) in files {
            let mut header = tar::Header::new_gnu();
            header.set_size(content.len() as u64);
            header.set_mode(0o644);
            header.set_cksum();
            builder
                .append_data(&mut header, path, content.as_bytes())
                .unwrap();
        }
        builder.into_inner().unwrap().finish().unwrap();
    }

    #[test]
    fn extracts_nested_entries() -> Result<()> {
        let dir = TempDir::new()?;
        let archive = dir.path().join("payload.tar.gz");
        build_archive(
            &archive,
            &[
                ("repo-0.6.0/.magic/.version", "0.6.0"),
                ("repo-0.6.0/.agent/workflows/magic.plan.md", "plan"),
            ],
        );

        let out = dir.path().join("out");
        extract_tar_gz(&archive, &out)?;
        assert_eq!(
            fs::read_to_string(out.join("repo-0.6.0/.magic/.version"))?,
            "0.6.0"
        );
        assert_eq!(
            fs::read_to_string(out.join("repo-0.6.0/.agent/workflows/magic.plan.md"))?,
            "plan"
        );
        Ok(())
    }

    #[test]
    fn parent_traversal_is_rejected() {
        let dest = Path::new("/tmp/out");
        let err = safe_join(dest, Path::new("ok/../../evil")).unwrap_err();
        assert!(matches!(err, MagicError::ExtractionError(_)));
    }

    #[test]
    fn absolute_entries_are_rejected() {
        let dest = Path::new("/tmp/out");
        let err = safe_join(dest, Path::new("/etc/passwd")).unwrap_err();
        assert!(matches!(err, MagicError::ExtractionError(_)));
    }

    #[test]
    fn curdir_components_are_ignored() -> Result<()> {
        let dest = Path::new("/tmp/out");
        assert_eq!(
            safe_join(dest, Path::new("./a/./b"))?,
            dest.join("a").join("b")
        );
        Ok(())
    }
}
