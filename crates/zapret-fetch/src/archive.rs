//! Release archive extraction and layout

use std::fs::{self, File};
use std::io;
use std::path::{Path, PathBuf};

use tracing::{debug, warn};
use zip::ZipArchive;

use crate::error::{FetchError, Result};

/// Top-level release entries that are never installed
pub const SKIPPED_ENTRIES: &[&str] = &["gui", ".git", ".github"];

/// Unpack `archive` into `dest`, replacing anything already there.
///
/// Entries whose names would escape `dest` are skipped. Returns the number
/// of files written.
pub fn extract_zip(archive: &Path, dest: &Path) -> Result<usize> {
    let file = File::open(archive)?;
    let mut zip = ZipArchive::new(file).map_err(|source| FetchError::Archive {
        path: archive.to_path_buf(),
        source,
    })?;

    remove_path(dest)?;
    fs::create_dir_all(dest)?;

    let mut written = 0;
    for i in 0..zip.len() {
        let mut entry = zip.by_index(i).map_err(|source| FetchError::Archive {
            path: archive.to_path_buf(),
            source,
        })?;
        let Some(relative) = entry.enclosed_name() else {
            warn!("Skipping unsafe archive entry: {}", entry.name());
            continue;
        };
        let out_path = dest.join(relative);

        if entry.is_dir() {
            fs::create_dir_all(&out_path)?;
            continue;
        }
        if let Some(parent) = out_path.parent() {
            fs::create_dir_all(parent)?;
        }
        let mut out = File::create(&out_path)?;
        io::copy(&mut entry, &mut out)?;
        written += 1;
    }

    debug!("Extracted {} files into {}", written, dest.display());
    Ok(written)
}

/// Directory holding the release files: the single top-level directory
/// when the archive has exactly one, otherwise `extracted` itself
pub fn source_root(extracted: &Path) -> Result<PathBuf> {
    let mut entries = fs::read_dir(extracted)?.collect::<io::Result<Vec<_>>>()?;
    if entries.len() == 1 {
        let only = entries.remove(0);
        if only.file_type()?.is_dir() {
            return Ok(only.path());
        }
    }
    Ok(extracted.to_path_buf())
}

/// Move every top-level entry of `source` into `target`, replacing existing
/// entries of the same name. Returns the names that were installed.
pub fn install_tree(source: &Path, target: &Path) -> Result<Vec<String>> {
    fs::create_dir_all(target)?;

    let mut installed = Vec::new();
    for entry in fs::read_dir(source)? {
        let entry = entry?;
        let name = entry.file_name().to_string_lossy().into_owned();
        if SKIPPED_ENTRIES.contains(&name.as_str()) {
            debug!("Skipping {}", name);
            continue;
        }

        let dest = target.join(&name);
        remove_path(&dest)?;
        move_path(&entry.path(), &dest)?;
        installed.push(name);
    }
    installed.sort();
    Ok(installed)
}

/// Remove everything inside `dir`, keeping the directory itself
pub fn clear_dir(dir: &Path) -> Result<()> {
    if !dir.is_dir() {
        return Ok(());
    }
    for entry in fs::read_dir(dir)? {
        remove_path(&entry?.path())?;
    }
    Ok(())
}

/// Remove a file or directory tree; missing paths are fine
pub fn remove_path(path: &Path) -> Result<()> {
    let result = match fs::symlink_metadata(path) {
        Ok(meta) if meta.is_dir() => fs::remove_dir_all(path),
        Ok(_) => fs::remove_file(path),
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(()),
        Err(e) => Err(e),
    };
    result.map_err(FetchError::from)
}

fn move_path(from: &Path, to: &Path) -> Result<()> {
    if fs::rename(from, to).is_ok() {
        return Ok(());
    }
    // rename fails across volumes
    copy_recursive(from, to)?;
    remove_path(from)
}

fn copy_recursive(from: &Path, to: &Path) -> Result<()> {
    if from.is_dir() {
        fs::create_dir_all(to)?;
        for entry in fs::read_dir(from)? {
            let entry = entry?;
            copy_recursive(&entry.path(), &to.join(entry.file_name()))?;
        }
    } else {
        fs::copy(from, to)?;
    }
    Ok(())
}
