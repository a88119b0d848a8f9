//! Platform-agnostic traits for OS state
//!
//! The service manager, process table and host settings are shared global
//! state. Orchestration code receives them as explicit handles so it can be
//! driven by fakes in tests.

use std::fmt;

use crate::Result;

/// Observed state of a named service
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ServiceState {
    /// Service is running
    Running,
    /// Service is registered but not running
    Stopped,
    /// No service with that name
    NotFound,
}

impl ServiceState {
    /// Whether the service is registered at all
    pub fn is_installed(&self) -> bool {
        !matches!(self, ServiceState::NotFound)
    }
}

impl fmt::Display for ServiceState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ServiceState::Running => "running",
            ServiceState::Stopped => "stopped",
            ServiceState::NotFound => "not installed",
        })
    }
}

/// Service start type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StartMode {
    /// Started at boot
    #[default]
    Auto,
    /// Started on request
    Demand,
    /// Cannot be started
    Disabled,
}

impl StartMode {
    /// Value accepted by `sc create start=`
    pub fn as_sc_arg(&self) -> &'static str {
        match self {
            StartMode::Auto => "auto",
            StartMode::Demand => "demand",
            StartMode::Disabled => "disabled",
        }
    }
}

/// Everything needed to register a service
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceDefinition {
    /// Service key name
    pub name: String,
    /// Name shown in the services console
    pub display_name: String,
    /// Quoted executable path followed by its arguments
    pub binary_path: String,
    /// Start type
    pub start_mode: StartMode,
}

/// Service control manager interface
#[cfg_attr(test, mockall::automock)]
pub trait ServiceController: Send + Sync {
    /// Stop a running service
    fn stop_service(&self, name: &str) -> Result<()>;

    /// Delete a service registration
    fn remove_service(&self, name: &str) -> Result<()>;

    /// Register a new service
    fn create_service(&self, definition: &ServiceDefinition) -> Result<()>;

    /// Set the service description
    fn set_description(&self, name: &str, text: &str) -> Result<()>;

    /// Start a registered service
    fn start(&self, name: &str) -> Result<()>;

    /// Query the current state
    fn query_status(&self, name: &str) -> Result<ServiceState>;
}

/// Process table interface
#[cfg_attr(test, mockall::automock)]
pub trait ProcessControl: Send + Sync {
    /// Whether a process with this image name is running
    fn is_running(&self, image: &str) -> Result<bool>;

    /// Forcefully terminate every process with this image name
    fn kill(&self, image: &str) -> Result<()>;
}

/// Host-wide settings touched by the service installation
#[cfg_attr(test, mockall::automock)]
pub trait HostSettings: Send + Sync {
    /// Turn on TCP timestamps in the global TCP parameters
    fn enable_tcp_timestamps(&self) -> Result<()>;

    /// Write a string value under a registry key
    fn set_registry_string(&self, key: &str, value_name: &str, data: &str) -> Result<()>;

    /// Read a string value, `None` if it does not exist
    fn registry_string(&self, key: &str, value_name: &str) -> Result<Option<String>>;
}
