//! Extraction of hosting-service repository archives
//!
//! GitLab roots every archive under one synthetic directory such as
//! `demo-main-0f3c2a1/`. The root is taken from the first entry's leading
//! segment and stripped from every destination path.

use std::fs::{self, OpenOptions};
use std::io::{self, Cursor, Read};
use std::path::{Component, Path, PathBuf};

use tracing::{debug, trace};
use zip::ZipArchive;

use crate::{Error, Result};

/// Extract `bytes` into `dest`. Returns the number of non-directory entries,
/// counted before anything is written.
pub fn extract(bytes: &[u8], dest: &Path) -> Result<usize> {
    let mut archive = ZipArchive::new(Cursor::new(bytes))?;
    let files = archive
        .file_names()
        .filter(|name| !name.ends_with('/'))
        .count();

    if archive.len() == 0 {
        return Ok(files);
    }
    let root = root_segment(archive.by_index_raw(0)?.name()).to_string();
    debug!(root = %root, entries = archive.len(), files, "Extracting archive");

    for index in 0..archive.len() {
        let mut entry = archive.by_index(index)?;
        let name = entry.name().to_string();
        let Some(relative) = strip_root(&name, &root) else {
            trace!(entry = %name, "Skipping entry outside archive root");
            continue;
        };
        let relative = safe_relative(relative).ok_or_else(|| Error::UnsafeArchiveEntry {
            name: name.clone(),
        })?;

        let target = dest.join(relative);
        let mode = entry.unix_mode().map(|m| m & 0o777).filter(|m| *m != 0);

        if entry.is_dir() {
            fs::create_dir_all(&target).map_err(|e| Error::io(&target, e))?;
            // Keep the directory writable so its children can still be extracted
            if let Some(mode) = mode {
                apply_mode(&target, mode | 0o700).map_err(|e| Error::io(&target, e))?;
            }
        } else {
            if let Some(parent) = target.parent() {
                fs::create_dir_all(parent).map_err(|e| Error::io(parent, e))?;
            }
            write_entry(&mut entry, &target, mode).map_err(|e| Error::io(&target, e))?;
        }
    }

    Ok(files)
}

/// Leading path segment of an entry name.
pub fn root_segment(name: &str) -> &str {
    name.split('/').next().unwrap_or(name)
}

/// Entry path below `root`, or `None` when the entry is outside it or is the root itself.
pub fn strip_root<'n>(name: &'n str, root: &str) -> Option<&'n str> {
    let rest = name.strip_prefix(root)?.strip_prefix('/')?;
    let rest = rest.trim_end_matches('/');
    (!rest.is_empty()).then_some(rest)
}

fn safe_relative(relative: &str) -> Option<PathBuf> {
    let path = Path::new(relative);
    path.components()
        .all(|c| matches!(c, Component::Normal(_)))
        .then(|| path.to_path_buf())
}

fn write_entry(reader: &mut impl Read, target: &Path, mode: Option<u32>) -> io::Result<()> {
    let mut options = OpenOptions::new();
    options.write(true).create(true).truncate(true);
    #[cfg(unix)]
    if let Some(mode) = mode {
        use std::os::unix::fs::OpenOptionsExt;
        options.mode(mode);
    }

    let mut file = options.open(target)?;
    io::copy(reader, &mut file)?;

    // The open mode only applies to newly created files
    if let Some(mode) = mode {
        apply_mode(target, mode)?;
    }
    Ok(())
}

#[cfg(unix)]
fn apply_mode(path: &Path, mode: u32) -> io::Result<()> {
    use std::os::unix::fs::PermissionsExt;
    fs::set_permissions(path, fs::Permissions::from_mode(mode))
}

#[cfg(not(unix))]
fn apply_mode(_path: &Path, _mode: u32) -> io::Result<()> {
    Ok(())
}
