//! On-disk layout of a zapret installation
//!
//! ```text
//! <base>/
//! ├── app/                     application config
//! └── zapret/                  extracted release
//!     ├── bin/winws.exe
//!     ├── lists/*.txt
//!     ├── utils/game_filter.enabled
//!     ├── service.bat
//!     └── <strategy>.bat
//! ```

use std::path::{Path, PathBuf};

use directories::BaseDirs;

use crate::error::{Error, Result};

/// Directory created under the user's home by default
pub const INSTALL_DIR_NAME: &str = "zapret-gui";

/// Executable launched by every strategy script
pub const WINWS_EXE: &str = "winws.exe";

/// Paths of one zapret installation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstallLayout {
    base: PathBuf,
}

impl InstallLayout {
    /// Layout rooted at an explicit base directory
    pub fn new(base: impl Into<PathBuf>) -> Self {
        Self { base: base.into() }
    }

    /// Layout rooted at `~/zapret-gui`
    pub fn default_location() -> Result<Self> {
        let dirs = BaseDirs::new().ok_or(Error::NoHomeDir)?;
        Ok(Self::new(dirs.home_dir().join(INSTALL_DIR_NAME)))
    }

    /// Base directory holding both the release and the app data
    pub fn base_dir(&self) -> &Path {
        &self.base
    }

    /// Directory the release archive is laid out into
    pub fn zapret_dir(&self) -> PathBuf {
        self.base.join("zapret")
    }

    /// Directory for application config
    pub fn app_dir(&self) -> PathBuf {
        self.base.join("app")
    }

    pub fn bin_dir(&self) -> PathBuf {
        self.zapret_dir().join("bin")
    }

    pub fn lists_dir(&self) -> PathBuf {
        self.zapret_dir().join("lists")
    }

    pub fn utils_dir(&self) -> PathBuf {
        self.zapret_dir().join("utils")
    }

    /// The release's own service script, used for version detection
    pub fn service_bat(&self) -> PathBuf {
        self.zapret_dir().join("service.bat")
    }

    pub fn readme(&self) -> PathBuf {
        self.zapret_dir().join("README.md")
    }

    pub fn winws_exe(&self) -> PathBuf {
        self.bin_dir().join(WINWS_EXE)
    }

    /// Temporary download target for the release archive
    pub fn download_archive(&self) -> PathBuf {
        self.base.join("zapret_download.zip")
    }

    /// Scratch directory the archive is unpacked into
    pub fn extract_dir(&self) -> PathBuf {
        self.base.join("temp_extract")
    }

    /// A release counts as installed once both `bin/` and `service.bat` exist
    pub fn is_installed(&self) -> bool {
        self.bin_dir().is_dir() && self.service_bat().is_file()
    }

    /// Fail with [`Error::NotInstalled`] unless [`is_installed`](Self::is_installed)
    pub fn ensure_installed(&self) -> Result<()> {
        if self.is_installed() {
            Ok(())
        } else {
            Err(Error::NotInstalled {
                path: self.zapret_dir(),
            })
        }
    }
}

/// Make `path` absolute against the current directory without touching the
/// filesystem
pub fn absolute(path: &Path) -> PathBuf {
    if path.is_absolute() {
        return path.to_path_buf();
    }
    std::env::current_dir()
        .map(|cwd| cwd.join(path))
        .unwrap_or_else(|_| path.to_path_buf())
}
