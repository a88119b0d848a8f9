//! Download the latest release and lay it out on disk

use std::fs;
use std::io;
use std::path::Path;

use tokio::task;
use tracing::{info, warn};
use zapret_core::InstallLayout;

use crate::archive;
use crate::error::{FetchError, Result};
use crate::release::ReleaseFetcher;

/// Progress notifications emitted by [`Installer::install`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InstallEvent {
    /// A new stage started, `percent` of the whole installation is done
    Stage {
        /// Human readable stage description
        message: String,
        /// Overall progress, 0..=100
        percent: u8,
    },
    /// Archive bytes received so far
    Downloaded {
        /// Bytes received
        received: u64,
        /// Content length, when the server sent one
        total: Option<u64>,
    },
}

impl InstallEvent {
    fn stage(message: impl Into<String>, percent: u8) -> Self {
        Self::Stage {
            message: message.into(),
            percent,
        }
    }
}

/// Result of a successful installation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Installed {
    /// Release tag that was installed
    pub tag: String,
    /// URL the archive came from
    pub url: String,
    /// Top-level entries moved into the install directory
    pub entries: Vec<String>,
}

/// Release installer for one [`InstallLayout`]
pub struct Installer {
    fetcher: ReleaseFetcher,
    layout: InstallLayout,
}

impl Installer {
    /// Create an installer
    pub fn new(fetcher: ReleaseFetcher, layout: InstallLayout) -> Self {
        Self { fetcher, layout }
    }

    /// Install directory layout
    pub fn layout(&self) -> &InstallLayout {
        &self.layout
    }

    /// Download the latest release into the zapret directory.
    ///
    /// With `reset` the zapret directory is emptied first. Stages are
    /// reported at 10 (reset only), 20, 30, 60, 80 and 100 percent.
    pub async fn install(
        &self,
        reset: bool,
        on_event: &mut (dyn FnMut(InstallEvent) + Send),
    ) -> Result<Installed> {
        let layout = &self.layout;
        if reset {
            on_event(InstallEvent::stage("Removing old files", 10));
        }
        let (zapret_dir, app_dir) = (layout.zapret_dir(), layout.app_dir());
        blocking(move || prepare_dirs(&zapret_dir, &app_dir, reset)).await?;

        on_event(InstallEvent::stage("Resolving latest release", 20));
        let tag = self.fetcher.latest_tag().await.ok_or(FetchError::NoRelease)?;

        on_event(InstallEvent::stage(format!("Downloading {tag}"), 30));
        let archive_path = layout.download_archive();
        let url = {
            let mut on_bytes = |received: u64, total: Option<u64>| {
                on_event(InstallEvent::Downloaded { received, total })
            };
            self.fetcher
                .download_release(&tag, &archive_path, &mut on_bytes)
                .await?
        };

        on_event(InstallEvent::stage("Extracting", 60));
        let extract_dir = layout.extract_dir();
        let source = blocking(move || {
            archive::extract_zip(&archive_path, &extract_dir)?;
            archive::source_root(&extract_dir)
        })
        .await?;

        on_event(InstallEvent::stage("Installing files", 80));
        let zapret_dir = layout.zapret_dir();
        let entries = blocking(move || archive::install_tree(&source, &zapret_dir)).await?;

        cleanup(layout);

        info!("Installed release {} into {}", tag, layout.zapret_dir().display());
        on_event(InstallEvent::stage("Done", 100));
        Ok(Installed { tag, url, entries })
    }
}

async fn blocking<T, F>(f: F) -> Result<T>
where
    F: FnOnce() -> Result<T> + Send + 'static,
    T: Send + 'static,
{
    task::spawn_blocking(f)
        .await
        .map_err(|e| FetchError::Io(io::Error::new(io::ErrorKind::Other, e)))?
}

/// Create the install directories, emptying the zapret directory on reset
fn prepare_dirs(zapret_dir: &Path, app_dir: &Path, reset: bool) -> Result<()> {
    fs::create_dir_all(zapret_dir)?;
    fs::create_dir_all(app_dir)?;
    if reset {
        if let Err(e) = archive::clear_dir(zapret_dir) {
            warn!("Failed to clean {}: {}", zapret_dir.display(), e);
        }
    }
    Ok(())
}

/// Remove the temporary archive and extraction directory
pub fn cleanup(layout: &InstallLayout) {
    for path in [layout.extract_dir(), layout.download_archive()] {
        if let Err(e) = archive::remove_path(&path) {
            warn!("Failed to remove {}: {}", path.display(), e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_prepare_dirs_reset() {
        let dir = TempDir::new().unwrap();
        let layout = InstallLayout::new(dir.path());
        prepare_dirs(&layout.zapret_dir(), &layout.app_dir(), false).unwrap();
        assert!(layout.app_dir().is_dir());

        fs::write(layout.zapret_dir().join("stale.bat"), "old").unwrap();
        prepare_dirs(&layout.zapret_dir(), &layout.app_dir(), false).unwrap();
        assert!(layout.zapret_dir().join("stale.bat").exists());

        prepare_dirs(&layout.zapret_dir(), &layout.app_dir(), true).unwrap();
        assert!(layout.zapret_dir().is_dir());
        assert!(!layout.zapret_dir().join("stale.bat").exists());
    }

    #[test]
    fn test_cleanup_removes_temporaries() {
        let dir = TempDir::new().unwrap();
        let layout = InstallLayout::new(dir.path());
        fs::create_dir_all(layout.extract_dir().join("x")).unwrap();
        fs::write(layout.download_archive(), "zip").unwrap();

        cleanup(&layout);
        assert!(!layout.extract_dir().exists());
        assert!(!layout.download_archive().exists());

        // idempotent
        cleanup(&layout);
    }
}
