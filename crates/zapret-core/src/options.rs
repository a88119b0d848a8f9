//! File-backed option flags read by the strategy scripts
//!
//! zapret keeps its toggles as plain files so the batch scripts can test for
//! them: the game filter is a marker file, the ipset mode is encoded in the
//! content of `ipset-all.txt`.

use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use tracing::info;

use crate::error::{Error, Result};

/// Marker file inside `utils/`
pub const GAME_FILTER_FILE: &str = "game_filter.enabled";

/// IPset list consumed by the strategies
pub const IPSET_FILE: &str = "ipset-all.txt";

/// Where the loaded list is parked while another mode is active
pub const IPSET_BACKUP_FILE: &str = "ipset-all.txt.backup";

/// Documentation-range address that matches nothing real
pub const IPSET_NONE_MARKER: &str = "203.0.113.113/32";

/// Game filter toggle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GameFilter {
    /// Only the fixed port set
    #[default]
    Disabled,
    /// The full ephemeral range
    Enabled,
}

impl GameFilter {
    /// Read the flag from the presence of the marker in `utils_dir`
    pub fn detect(utils_dir: &Path) -> Self {
        if utils_dir.join(GAME_FILTER_FILE).exists() {
            Self::Enabled
        } else {
            Self::Disabled
        }
    }

    /// Value substituted for `%GameFilter%`
    pub fn port_range(self) -> &'static str {
        match self {
            Self::Disabled => "12",
            Self::Enabled => "1024-65535",
        }
    }

    /// Persist the flag by creating or removing the marker
    pub fn store(self, utils_dir: &Path) -> Result<()> {
        let marker = utils_dir.join(GAME_FILTER_FILE);
        match self {
            Self::Enabled => {
                fs::create_dir_all(utils_dir)?;
                fs::write(&marker, "ENABLED")?;
            }
            Self::Disabled => {
                if marker.exists() {
                    fs::remove_file(&marker)?;
                }
            }
        }
        info!("Game filter {}", self);
        Ok(())
    }
}

impl From<bool> for GameFilter {
    fn from(enabled: bool) -> Self {
        if enabled {
            Self::Enabled
        } else {
            Self::Disabled
        }
    }
}

impl fmt::Display for GameFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Disabled => f.write_str("disabled"),
            Self::Enabled => f.write_str("enabled"),
        }
    }
}

/// How `ipset-all.txt` is populated
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IpsetMode {
    /// Empty list: every address matches
    Any,
    /// Placeholder address only: nothing matches
    None,
    /// A downloaded address list
    Loaded,
}

impl IpsetMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Any => "any",
            Self::None => "none",
            Self::Loaded => "loaded",
        }
    }

    /// Classify list content
    pub fn from_content(content: &str) -> Self {
        let content = content.trim();
        if content.is_empty() {
            Self::Any
        } else if content.contains(IPSET_NONE_MARKER) {
            Self::None
        } else {
            Self::Loaded
        }
    }
}

impl fmt::Display for IpsetMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The ipset list and its backup inside a lists directory
#[derive(Debug, Clone)]
pub struct Ipset {
    lists_dir: PathBuf,
}

impl Ipset {
    pub fn new(lists_dir: impl Into<PathBuf>) -> Self {
        Self {
            lists_dir: lists_dir.into(),
        }
    }

    pub fn list_path(&self) -> PathBuf {
        self.lists_dir.join(IPSET_FILE)
    }

    pub fn backup_path(&self) -> PathBuf {
        self.lists_dir.join(IPSET_BACKUP_FILE)
    }

    /// Current mode; a missing or unreadable list counts as `any`
    pub fn mode(&self) -> IpsetMode {
        fs::read(self.list_path())
            .map(|bytes| IpsetMode::from_content(&String::from_utf8_lossy(&bytes)))
            .unwrap_or(IpsetMode::Any)
    }

    /// Cycle `loaded -> none -> any -> loaded` and return the new mode
    pub fn toggle(&self) -> Result<IpsetMode> {
        let list = self.list_path();
        let backup = self.backup_path();

        let next = match self.mode() {
            IpsetMode::Loaded => {
                if backup.exists() {
                    fs::remove_file(&backup)?;
                }
                if list.exists() {
                    fs::rename(&list, &backup)?;
                }
                fs::write(&list, format!("{IPSET_NONE_MARKER}\n"))?;
                IpsetMode::None
            }
            IpsetMode::None => {
                fs::write(&list, "")?;
                IpsetMode::Any
            }
            IpsetMode::Any => {
                if !backup.exists() {
                    return Err(Error::IpsetBackupMissing);
                }
                if list.exists() {
                    fs::remove_file(&list)?;
                }
                fs::rename(&backup, &list)?;
                IpsetMode::Loaded
            }
        };

        info!("IPset mode switched to {}", next);
        Ok(next)
    }

    /// Replace the list with freshly downloaded content
    pub fn store(&self, content: &str) -> Result<IpsetMode> {
        fs::create_dir_all(&self.lists_dir)?;
        fs::write(self.list_path(), content)?;
        Ok(IpsetMode::from_content(content))
    }
}
