//! Strategy scripts shipped with a zapret release
//!
//! Each strategy is a `.bat` file in the release root describing one
//! `winws.exe` argument combination. Helper scripts that ship alongside them
//! are not strategies.

mod extract;
pub mod placeholders;

pub use extract::{
    extract, extract_command_line, extract_from_text, scan_invocation, ExtractError,
    ExtractedCommandLine, Invocation, Terminator,
};
pub use placeholders::Placeholders;

use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};

/// Release scripts that are not strategies
pub const EXCLUDED_SCRIPTS: &[&str] = &[
    "service.bat",
    "uninstall.bat",
    "install.bat",
    "start.bat",
    "stop.bat",
];

/// One strategy script on disk
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StrategyScript {
    path: PathBuf,
}

impl StrategyScript {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// File name including the `.bat` extension
    pub fn file_name(&self) -> String {
        self.path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default()
    }

    /// Display name: the file stem
    pub fn name(&self) -> String {
        self.path
            .file_stem()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default()
    }

    /// Extract the service command line against `install_root`
    pub fn extract(&self, install_root: &Path) -> Result<ExtractedCommandLine> {
        Ok(extract_command_line(&self.path, install_root)?)
    }
}

/// Whether a file name looks like a strategy script
pub fn is_strategy_file(file_name: &str) -> bool {
    let lower = file_name.to_lowercase();
    lower.ends_with(".bat") && !EXCLUDED_SCRIPTS.contains(&lower.as_str())
}

/// All strategies in `dir`, sorted by file name.
///
/// A missing directory yields an empty list.
pub fn discover(dir: &Path) -> Result<Vec<StrategyScript>> {
    if !dir.is_dir() {
        return Ok(Vec::new());
    }

    let mut scripts = Vec::new();
    for entry in fs::read_dir(dir)? {
        let entry = entry?;
        if !entry.file_type()?.is_file() {
            continue;
        }
        let name = entry.file_name();
        if is_strategy_file(&name.to_string_lossy()) {
            scripts.push(StrategyScript::new(entry.path()));
        }
    }
    scripts.sort_by_key(StrategyScript::file_name);
    Ok(scripts)
}

/// Look a strategy up by stem or file name
pub fn find(dir: &Path, name: &str) -> Result<StrategyScript> {
    discover(dir)?
        .into_iter()
        .find(|s| s.name() == name || s.file_name() == name)
        .ok_or_else(|| Error::StrategyNotFound {
            name: name.to_string(),
        })
}
