//! zapret service lifecycle
//!
//! Installs a strategy as the `zapret` Windows service and reports on the
//! service, the `winws.exe` process and the WinDivert driver. All OS state is
//! reached through the handles held by [`ZapretService`].

use std::path::Path;
use std::thread;
use std::time::Duration;

use tracing::{debug, info, warn};
use zapret_core::layout::{absolute, WINWS_EXE};
use zapret_core::strategy::extract_command_line;
use zapret_core::StrategyScript;

use crate::error::{PlatformError, Result};
use crate::traits::{
    HostSettings, ProcessControl, ServiceController, ServiceDefinition, ServiceState, StartMode,
};

/// Service key name
pub const SERVICE_NAME: &str = "zapret";

/// Name shown in the services console
pub const SERVICE_DISPLAY_NAME: &str = "zapret";

/// Service description
pub const SERVICE_DESCRIPTION: &str = "Zapret DPI bypass";

/// Driver service loaded by winws
pub const DRIVER_NAME: &str = "WinDivert";

/// Every driver registration left behind by winws releases
pub const DRIVER_NAMES: &[&str] = &["WinDivert", "WinDivert14"];

/// Registry key holding the installed strategy name
pub const STRATEGY_REGISTRY_KEY: &str = r"HKLM\System\CurrentControlSet\Services\zapret";

/// Registry value holding the installed strategy name
pub const STRATEGY_REGISTRY_VALUE: &str = "zapret-discord-youtube";

/// Pause after tearing down the old service before creating the new one
pub const DEFAULT_SETTLE_DELAY: Duration = Duration::from_millis(500);

/// Result of a successful installation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstallOutcome {
    /// Strategy name recorded in the registry
    pub strategy: String,
    /// Full service binary path including arguments
    pub binary_path: String,
    /// Non-fatal step failures
    pub warnings: Vec<String>,
}

/// Snapshot of everything the status command shows
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusReport {
    /// Whether winws is running, `None` if it could not be determined
    pub winws_running: Option<bool>,
    /// State of the zapret service
    pub service: ServiceState,
    /// State of the WinDivert driver
    pub driver: ServiceState,
    /// Strategy recorded at install time
    pub strategy: Option<String>,
}

/// Build the service binary path: the quoted executable, a space and the
/// arguments
pub fn service_binary_path(executable: &Path, arguments: &str) -> String {
    format!("\"{}\" {}", executable.display(), arguments)
        .trim()
        .to_string()
}

/// Service orchestration over injected OS handles
pub struct ZapretService<'a> {
    services: &'a dyn ServiceController,
    processes: &'a dyn ProcessControl,
    host: &'a dyn HostSettings,
    settle_delay: Duration,
}

impl<'a> ZapretService<'a> {
    /// Create an orchestrator over the given handles
    pub fn new(
        services: &'a dyn ServiceController,
        processes: &'a dyn ProcessControl,
        host: &'a dyn HostSettings,
    ) -> Self {
        Self {
            services,
            processes,
            host,
            settle_delay: DEFAULT_SETTLE_DELAY,
        }
    }

    /// Override the pause between teardown and creation
    pub fn with_settle_delay(mut self, delay: Duration) -> Self {
        self.settle_delay = delay;
        self
    }

    /// Install `script` as the `zapret` service.
    ///
    /// `install_root` is the release directory containing `bin/winws.exe`.
    /// Arguments are extracted before anything on the host is changed; a
    /// script that never launches winws is refused.
    pub fn install_as_service(
        &self,
        script: &StrategyScript,
        install_root: &Path,
    ) -> Result<InstallOutcome> {
        let strategy = script.name();
        info!("Installing strategy '{}' as service {}", strategy, SERVICE_NAME);

        let extracted = extract_command_line(script.path(), install_root)?;
        if extracted.is_degenerate() {
            return Err(PlatformError::EmptyStrategy {
                script: script.path().to_path_buf(),
            });
        }

        let mut warnings = Vec::new();

        self.teardown(&mut warnings);
        if !self.settle_delay.is_zero() {
            thread::sleep(self.settle_delay);
        }

        if let Err(e) = self.host.enable_tcp_timestamps() {
            note(&mut warnings, "Failed to enable TCP timestamps", &e);
        }

        let executable = absolute(&install_root.join("bin").join(WINWS_EXE));
        let binary_path = service_binary_path(&executable, extracted.arguments());
        let definition = ServiceDefinition {
            name: SERVICE_NAME.to_string(),
            display_name: SERVICE_DISPLAY_NAME.to_string(),
            binary_path: binary_path.clone(),
            start_mode: StartMode::Auto,
        };
        debug!("Service binary path: {}", binary_path);
        self.services.create_service(&definition)?;

        if let Err(e) = self
            .services
            .set_description(SERVICE_NAME, SERVICE_DESCRIPTION)
        {
            note(&mut warnings, "Failed to set service description", &e);
        }

        if let Err(e) = self.services.start(SERVICE_NAME) {
            note(&mut warnings, "Failed to start service", &e);
        }

        if let Err(e) =
            self.host
                .set_registry_string(STRATEGY_REGISTRY_KEY, STRATEGY_REGISTRY_VALUE, &strategy)
        {
            note(&mut warnings, "Failed to record strategy name", &e);
        }

        info!("Service {} installed with strategy '{}'", SERVICE_NAME, strategy);
        Ok(InstallOutcome {
            strategy,
            binary_path,
            warnings,
        })
    }

    /// Stop the service and any winws process left running.
    ///
    /// A stray winws keeps the driver loaded, so it is killed even when it
    /// was not started by the service.
    pub fn stop(&self) -> Result<()> {
        info!("Stopping service {}", SERVICE_NAME);
        self.services.stop_service(SERVICE_NAME)?;
        self.processes.kill(WINWS_EXE)
    }

    /// Stop and delete the service and the driver registrations
    pub fn remove(&self) -> Result<()> {
        self.stop()?;
        info!("Removing service {}", SERVICE_NAME);
        self.services.remove_service(SERVICE_NAME)?;
        for driver in DRIVER_NAMES {
            self.services.remove_service(driver)?;
        }
        Ok(())
    }

    /// Stop and delete the WinDivert driver registrations
    pub fn remove_driver(&self) -> Result<()> {
        info!("Removing {} driver", DRIVER_NAME);
        self.services.stop_service(DRIVER_NAME)?;
        for driver in DRIVER_NAMES {
            self.services.remove_service(driver)?;
        }
        Ok(())
    }

    /// Kill every running winws process
    pub fn stop_winws(&self) -> Result<()> {
        info!("Stopping {}", WINWS_EXE);
        self.processes.kill(WINWS_EXE)
    }

    /// Collect the current status.
    ///
    /// Query failures degrade to "unknown" or "not installed" with a warning.
    pub fn status(&self) -> StatusReport {
        let winws_running = match self.processes.is_running(WINWS_EXE) {
            Ok(running) => Some(running),
            Err(e) => {
                warn!("Failed to query {}: {}", WINWS_EXE, e);
                None
            }
        };
        let service = self.query(SERVICE_NAME);
        let driver = self.query(DRIVER_NAME);
        let strategy = match self
            .host
            .registry_string(STRATEGY_REGISTRY_KEY, STRATEGY_REGISTRY_VALUE)
        {
            Ok(value) => value,
            Err(e) => {
                warn!("Failed to read installed strategy: {}", e);
                None
            }
        };

        StatusReport {
            winws_running,
            service,
            driver,
            strategy,
        }
    }

    fn query(&self, name: &str) -> ServiceState {
        self.services.query_status(name).unwrap_or_else(|e| {
            warn!("Failed to query service {}: {}", name, e);
            ServiceState::NotFound
        })
    }

    fn teardown(&self, warnings: &mut Vec<String>) {
        if let Err(e) = self.services.stop_service(SERVICE_NAME) {
            note(warnings, "Failed to stop existing service", &e);
        }
        if let Err(e) = self.processes.kill(WINWS_EXE) {
            note(warnings, "Failed to stop winws", &e);
        }
        if let Err(e) = self.services.remove_service(SERVICE_NAME) {
            note(warnings, "Failed to delete existing service", &e);
        }
        for driver in DRIVER_NAMES {
            if let Err(e) = self.services.remove_service(driver) {
                note(warnings, "Failed to delete driver service", &e);
            }
        }
    }
}

fn note(warnings: &mut Vec<String>, what: &str, error: &PlatformError) {
    warn!("{}: {}", what, error);
    warnings.push(format!("{what}: {error}"));
}
