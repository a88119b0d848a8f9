//! System hosts file merging

use std::fs;
use std::path::{Path, PathBuf};

use tracing::info;

use crate::error::Result;

/// Comment line written above appended entries
pub const HOSTS_MARKER: &str = "# Discord Voice (zapret-gui)";

/// Location of the system hosts file
pub fn system_hosts_path() -> PathBuf {
    let root = std::env::var_os("SystemRoot").unwrap_or_else(|| "C:\\Windows".into());
    PathBuf::from(root)
        .join("System32")
        .join("drivers")
        .join("etc")
        .join("hosts")
}

/// Text to append to `current` so it contains `entries`, or `None` if it
/// already does
pub fn append_block(current: &str, entries: &str) -> Option<String> {
    let entries = entries.trim();
    if entries.is_empty() || current.contains(entries) {
        return None;
    }
    Some(format!("\n{HOSTS_MARKER}\n{entries}\n"))
}

/// Append `entries` to the hosts file at `path` unless already present.
///
/// Returns whether the file was modified.
pub fn merge_into(path: &Path, entries: &str) -> Result<bool> {
    let current = match fs::read(path) {
        Ok(bytes) => String::from_utf8_lossy(&bytes).into_owned(),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => String::new(),
        Err(e) => return Err(e.into()),
    };

    match append_block(&current, entries) {
        Some(block) => {
            use std::io::Write;
            let mut file = fs::OpenOptions::new().create(true).append(true).open(path)?;
            file.write_all(block.as_bytes())?;
            info!("Appended {} lines to {}", entries.trim().lines().count(), path.display());
            Ok(true)
        }
        None => Ok(false),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ENTRIES: &str = "104.25.158.178 finland10000.discord.media\n104.25.158.178 finland10001.discord.media\n";

    #[test]
    fn test_append_block() {
        let block = append_block("127.0.0.1 localhost\n", ENTRIES).unwrap();
        assert!(block.starts_with("\n# Discord Voice (zapret-gui)\n104.25.158.178"));
        assert!(block.ends_with("discord.media\n"));

        let merged = format!("127.0.0.1 localhost\n{block}");
        assert!(append_block(&merged, ENTRIES).is_none());
        assert!(append_block("", "  \n").is_none());
    }

    #[test]
    fn test_merge_into_is_idempotent() {
        let tmp = tempfile::tempdir().unwrap();
        let hosts = tmp.path().join("hosts");
        fs::write(&hosts, "127.0.0.1 localhost\n").unwrap();

        assert!(merge_into(&hosts, ENTRIES).unwrap());
        assert!(!merge_into(&hosts, ENTRIES).unwrap());

        let content = fs::read_to_string(&hosts).unwrap();
        assert_eq!(content.matches(HOSTS_MARKER).count(), 1);
    }
}
