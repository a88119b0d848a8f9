//! zapret Fetch
//!
//! Resolves the latest zapret release on GitHub, downloads and unpacks it
//! into an [`InstallLayout`](zapret_core::InstallLayout) and refreshes the
//! auxiliary resources published alongside it.
//!
//! ## Example
//!
//! ```no_run
//! use zapret_core::InstallLayout;
//! use zapret_fetch::{Installer, ReleaseFetcher};
//!
//! # async fn run() -> zapret_fetch::Result<()> {
//! let layout = InstallLayout::default_location()?;
//! let installer = Installer::new(ReleaseFetcher::new()?, layout);
//! let installed = installer.install(false, &mut |event| println!("{event:?}")).await?;
//! println!("installed {}", installed.tag);
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod archive;
mod error;
pub mod installer;
pub mod probe;
pub mod release;
pub mod resources;

pub use error::{FetchError, Result};
pub use installer::{InstallEvent, Installed, Installer};
pub use probe::{probe, ProbeOutcome, ProbeReport};
pub use release::{ReleaseFetcher, ReleaseSource, UpdateCheck};
