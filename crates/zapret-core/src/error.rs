//! Error types for zapret-core
//!
//! Centralized error handling using `thiserror` for ergonomic error definitions.

use std::path::PathBuf;
use thiserror::Error;

use crate::strategy::ExtractError;

/// Main error type for zapret-core operations
#[derive(Error, Debug)]
pub enum Error {
    /// Strategy argument extraction failed
    #[error(transparent)]
    Extract(#[from] ExtractError),

    /// Strategy script does not exist in the install directory
    #[error("Strategy not found: {name}")]
    StrategyNotFound {
        /// Requested strategy name
        name: String,
    },

    /// Install directory is missing or incomplete
    #[error("zapret is not installed in {}", .path.display())]
    NotInstalled {
        /// Expected install directory
        path: PathBuf,
    },

    /// List file does not exist
    #[error("List file not found: {name}")]
    ListNotFound {
        /// Requested list file name
        name: String,
    },

    /// List name would escape the lists directory
    #[error("Invalid list name: {name}")]
    InvalidListName {
        /// Offending name
        name: String,
    },

    /// IPset toggle needs a backup that does not exist
    #[error("No ipset backup found, update the list first")]
    IpsetBackupMissing,

    /// Unknown configuration key
    #[error("Unknown configuration key: {key}")]
    UnknownConfigKey {
        /// The key that was requested
        key: String,
    },

    /// Invalid configuration value
    #[error("Invalid configuration value for '{key}': {message}")]
    ConfigValue {
        /// Configuration key
        key: String,
        /// Error message
        message: String,
    },

    /// Home directory could not be determined
    #[error("Could not determine the user home directory")]
    NoHomeDir,

    /// I/O error wrapper
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON error wrapper
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type alias using our Error type
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Create a configuration value error
    pub fn config_value(key: impl Into<String>, message: impl Into<String>) -> Self {
        Self::ConfigValue {
            key: key.into(),
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = Error::StrategyNotFound {
            name: "general (ALT)".to_string(),
        };
        assert_eq!(err.to_string(), "Strategy not found: general (ALT)");

        let err = Error::config_value("theme", "expected a string");
        assert_eq!(
            err.to_string(),
            "Invalid configuration value for 'theme': expected a string"
        );
    }
}
