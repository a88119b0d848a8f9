//! Error types for zapret-fetch

use std::path::PathBuf;
use thiserror::Error;

/// Download and install errors
#[derive(Error, Debug)]
pub enum FetchError {
    /// Transport-level HTTP failure
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// Server answered with a non-success status
    #[error("{url} returned HTTP {status}")]
    Status {
        /// Requested URL
        url: String,
        /// HTTP status code
        status: u16,
    },

    /// Neither the API nor the release page yielded a tag
    #[error("Could not determine the latest release, check the internet connection")]
    NoRelease,

    /// Every download candidate failed
    #[error("Could not download release {tag} (tried {attempts} URLs)")]
    DownloadFailed {
        /// Release tag
        tag: String,
        /// Number of URLs tried
        attempts: usize,
    },

    /// Downloaded file is not a valid zip archive
    #[error("Downloaded file {} is corrupt or not a zip archive: {source}", .path.display())]
    Archive {
        /// Archive path
        path: PathBuf,
        /// Underlying zip error
        #[source]
        source: zip::result::ZipError,
    },

    /// I/O error wrapper
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Core error
    #[error(transparent)]
    Core(#[from] zapret_core::Error),
}

/// Result type alias using FetchError
pub type Result<T> = std::result::Result<T, FetchError>;

impl FetchError {
    /// Whether the failure is likely caused by connectivity
    pub fn is_network(&self) -> bool {
        match self {
            Self::Http(e) => e.is_connect() || e.is_timeout(),
            Self::NoRelease | Self::DownloadFailed { .. } => true,
            _ => false,
        }
    }
}
