//! Placeholder substitution for strategy command lines
//!
//! Strategy scripts reference install paths through batch variables. Only a
//! fixed vocabulary is recognised; anything else is left untouched.

use std::path::{Path, MAIN_SEPARATOR};

use crate::layout::absolute;
use crate::options::GameFilter;

/// Binaries directory
pub const BIN: &str = "%BIN%";
/// Domain and IP lists directory
pub const LISTS: &str = "%LISTS%";
/// Directory of the running script
pub const SCRIPT_DIR: &str = "%~dp0";
/// Game filter port range
pub const GAME_FILTER: &str = "%GameFilter%";
/// Escaped delayed-expansion bang
pub const ESCAPED_BANG: &str = "^!";

/// Concrete values substituted for the placeholder vocabulary
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Placeholders {
    bin_dir: String,
    lists_dir: String,
    script_dir: String,
    game_filter: GameFilter,
    separator: char,
}

impl Placeholders {
    /// Build from filesystem paths, made absolute against the current directory
    pub fn from_paths(
        bin_dir: &Path,
        lists_dir: &Path,
        script_dir: &Path,
        game_filter: GameFilter,
    ) -> Self {
        Self::with_dirs(
            absolute(bin_dir).to_string_lossy(),
            absolute(lists_dir).to_string_lossy(),
            absolute(script_dir).to_string_lossy(),
            game_filter,
        )
    }

    /// Build from already-absolute directory strings
    pub fn with_dirs(
        bin_dir: impl Into<String>,
        lists_dir: impl Into<String>,
        script_dir: impl Into<String>,
        game_filter: GameFilter,
    ) -> Self {
        Self {
            bin_dir: bin_dir.into(),
            lists_dir: lists_dir.into(),
            script_dir: script_dir.into(),
            game_filter,
            separator: MAIN_SEPARATOR,
        }
    }

    /// Override the separator appended to directory values
    pub fn with_separator(mut self, separator: char) -> Self {
        self.separator = separator;
        self
    }

    /// Substitute every placeholder in `input`.
    ///
    /// The order is fixed: directories, then the game filter range, then the
    /// `^!` escape.
    pub fn substitute(&self, input: &str) -> String {
        input
            .replace(BIN, &self.dir_value(&self.bin_dir))
            .replace(LISTS, &self.dir_value(&self.lists_dir))
            .replace(SCRIPT_DIR, &self.dir_value(&self.script_dir))
            .replace(GAME_FILTER, self.game_filter.port_range())
            .replace(ESCAPED_BANG, "!")
    }

    fn dir_value(&self, dir: &str) -> String {
        if dir.ends_with(self.separator) {
            dir.to_string()
        } else {
            format!("{dir}{}", self.separator)
        }
    }
}
