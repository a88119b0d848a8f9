//! Domain and address list files under `lists/`
//!
//! Lists are plain text, one entry per line. Blank lines and `#` comments
//! are kept on disk but ignored when counting or merging.

use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, info};

use crate::error::{Error, Result};

/// Access to the `.txt` lists of one installation
#[derive(Debug, Clone)]
pub struct ListStore {
    dir: PathBuf,
}

impl ListStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// File names of all lists, sorted
    pub fn names(&self) -> Result<Vec<String>> {
        if !self.dir.is_dir() {
            return Ok(Vec::new());
        }
        let mut names = Vec::new();
        for entry in fs::read_dir(&self.dir)? {
            let entry = entry?;
            let name = entry.file_name().to_string_lossy().into_owned();
            if entry.file_type()?.is_file() && name.to_lowercase().ends_with(".txt") {
                names.push(name);
            }
        }
        names.sort();
        Ok(names)
    }

    /// Resolve a list name, accepting it with or without `.txt`
    pub fn path_of(&self, name: &str) -> Result<PathBuf> {
        if name.is_empty() || name.contains(['/', '\\']) || name == ".." {
            return Err(Error::InvalidListName {
                name: name.to_string(),
            });
        }
        let file = if name.to_lowercase().ends_with(".txt") {
            name.to_string()
        } else {
            format!("{name}.txt")
        };
        Ok(self.dir.join(file))
    }

    /// Raw list content
    pub fn read(&self, name: &str) -> Result<String> {
        let path = self.path_of(name)?;
        if !path.is_file() {
            return Err(Error::ListNotFound {
                name: name.to_string(),
            });
        }
        let bytes = fs::read(&path)?;
        Ok(String::from_utf8_lossy(&bytes).into_owned())
    }

    /// Overwrite a list
    pub fn write(&self, name: &str, content: &str) -> Result<()> {
        let path = self.path_of(name)?;
        fs::create_dir_all(&self.dir)?;
        fs::write(&path, content)?;
        debug!("Saved {}", path.display());
        Ok(())
    }

    /// Number of effective entries in a list
    pub fn count(&self, name: &str) -> Result<usize> {
        Ok(entries(&self.read(name)?).count())
    }

    /// Append entries not already present (case-insensitive).
    ///
    /// Creates the list if needed and returns how many lines were added.
    pub fn add<I, S>(&self, name: &str, new_entries: I) -> Result<usize>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let current = match self.read(name) {
            Ok(content) => content,
            Err(Error::ListNotFound { .. }) => String::new(),
            Err(e) => return Err(e),
        };
        let (merged, added) = merge(&current, new_entries);
        if added > 0 {
            self.write(name, &merged)?;
            info!("Added {} entries to {}", added, name);
        }
        Ok(added)
    }

    /// Remove an entry (case-insensitive); returns whether anything changed
    pub fn remove(&self, name: &str, entry: &str) -> Result<bool> {
        let content = self.read(name)?;
        let needle = entry.trim().to_lowercase();
        let kept: Vec<&str> = content
            .lines()
            .filter(|line| line.trim().to_lowercase() != needle)
            .collect();
        if kept.len() == content.lines().count() {
            return Ok(false);
        }
        let mut out = kept.join("\n");
        out.push('\n');
        self.write(name, &out)?;
        Ok(true)
    }

    /// Merge the entries of another file into a list
    pub fn import(&self, name: &str, source: &Path) -> Result<usize> {
        let bytes = fs::read(source)?;
        let text = String::from_utf8_lossy(&bytes);
        self.add(name, entries(&text))
    }
}

/// Non-empty, non-comment lines, trimmed
pub fn entries(content: &str) -> impl Iterator<Item = &str> {
    content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
}

/// Append new entries to `content`, skipping duplicates.
///
/// Comparison is case-insensitive and new entries are stored lowercased.
pub fn merge<I, S>(content: &str, new_entries: I) -> (String, usize)
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut seen: HashSet<String> = entries(content).map(str::to_lowercase).collect();
    let mut out = content.trim_end().to_string();
    let mut added = 0;

    for entry in new_entries {
        let entry = entry.as_ref().trim().to_lowercase();
        if entry.is_empty() || entry.starts_with('#') || !seen.insert(entry.clone()) {
            continue;
        }
        if !out.is_empty() {
            out.push('\n');
        }
        out.push_str(&entry);
        added += 1;
    }

    if !out.is_empty() {
        out.push('\n');
    }
    (out, added)
}
