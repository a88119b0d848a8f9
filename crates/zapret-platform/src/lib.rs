//! zapret Platform Layer
//!
//! Drives the Windows service manager, process table and host settings
//! through their command-line tools and installs strategies as the `zapret`
//! service.
//!
//! ## Example
//!
//! ```no_run
//! use zapret_core::{InstallLayout, StrategyScript};
//! use zapret_platform::{WindowsController, ZapretService};
//!
//! let layout = InstallLayout::default_location()?;
//! let script = StrategyScript::new(layout.zapret_dir().join("general.bat"));
//! let controller = WindowsController::new();
//! let service = ZapretService::new(&controller, &controller, &controller);
//! let outcome = service.install_as_service(&script, &layout.zapret_dir())?;
//! println!("{}", outcome.binary_path);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod command;
pub mod elevation;
mod error;
pub mod service;
mod traits;
pub mod windows;

pub use command::{launch_in_console, CommandOutput, CommandRunner, CommandSpec, SystemRunner};
pub use elevation::{is_elevated, require_elevation};
pub use error::{truncate_message, ExitCode, PlatformError, Result, MAX_ERROR_LEN};
pub use service::{InstallOutcome, StatusReport, ZapretService};
pub use traits::{
    HostSettings, ProcessControl, ServiceController, ServiceDefinition, ServiceState, StartMode,
};
pub use windows::WindowsController;
