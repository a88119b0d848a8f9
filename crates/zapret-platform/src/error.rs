//! Platform-specific errors

use std::fmt;
use std::path::PathBuf;

use thiserror::Error;
use zapret_core::ExtractError;

/// Longest command error text kept for display
pub const MAX_ERROR_LEN: usize = 200;

/// Platform-specific errors
#[derive(Error, Debug)]
pub enum PlatformError {
    /// The command could not be started at all
    #[error("Failed to run `{command}`: {source}")]
    Spawn {
        /// Command line that was attempted
        command: String,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// The command ran but exited unsuccessfully
    #[error("`{command}` failed ({code}): {message}")]
    CommandFailed {
        /// Command line that failed
        command: String,
        /// Exit status
        code: ExitCode,
        /// Captured error output, truncated to [`MAX_ERROR_LEN`]
        message: String,
    },

    /// The strategy script never invokes the executable
    #[error("{} does not launch winws.exe, refusing to install a service without arguments", .script.display())]
    EmptyStrategy {
        /// Strategy script path
        script: PathBuf,
    },

    /// Administrator rights are needed
    #[error("Administrator privileges are required: {0}")]
    PermissionDenied(String),

    /// Operation only exists on Windows
    #[error("Not supported on this platform: {0}")]
    Unsupported(String),

    /// Strategy extraction failed
    #[error(transparent)]
    Extract(#[from] ExtractError),
}

/// Process exit code, `None` when terminated without one
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExitCode(pub Option<i32>);

impl fmt::Display for ExitCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0 {
            Some(code) => write!(f, "exit code {code}"),
            None => f.write_str("terminated"),
        }
    }
}

/// Platform result type
pub type Result<T> = std::result::Result<T, PlatformError>;

/// Shorten command output for user-facing display
pub fn truncate_message(text: &str) -> String {
    let text = text.trim();
    match text.char_indices().nth(MAX_ERROR_LEN) {
        Some((idx, _)) => format!("{}...", &text[..idx]),
        None => text.to_string(),
    }
}
