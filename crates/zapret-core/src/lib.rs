//! # zapret Core
//!
//! Platform-independent logic for managing a zapret installation.
//!
//! ## Architecture
//!
//! This crate provides:
//! - **Install layout** - where the release, lists and flags live
//! - **Strategy extraction** - turning a `.bat` strategy into a service command line
//! - **Options** - game filter and ipset mode, stored as plain files
//! - **Lists** - editing of domain lists
//! - **Versions** - local version detection and release comparison
//!
//! ## Example
//!
//! ```rust,no_run
//! use zapret_core::{strategy, InstallLayout};
//!
//! let layout = InstallLayout::default_location()?;
//! let script = strategy::find(&layout.zapret_dir(), "general")?;
//! let args = strategy::extract(script.path(), &layout.zapret_dir())?;
//! println!("winws.exe {args}");
//! # Ok::<(), zapret_core::Error>(())
//! ```

#![warn(clippy::all)]

pub mod config;
pub mod error;
pub mod hosts;
pub mod layout;
pub mod lists;
pub mod options;
pub mod strategy;
pub mod version;

// Re-exports for convenience
pub use config::AppConfig;
pub use error::{Error, Result};
pub use layout::InstallLayout;
pub use lists::ListStore;
pub use options::{GameFilter, Ipset, IpsetMode};
pub use strategy::{ExtractError, StrategyScript};
