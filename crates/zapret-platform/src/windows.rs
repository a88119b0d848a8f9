//! Controllers backed by the Windows command-line tools
//!
//! `sc`, `net`, `tasklist`, `taskkill`, `netsh` and `reg` are driven through
//! a [`CommandRunner`]. Output is matched on the ASCII keywords these tools
//! print regardless of the console code page.

use tracing::{debug, warn};

use crate::command::{CommandOutput, CommandRunner, CommandSpec, SystemRunner};
use crate::traits::{HostSettings, ProcessControl, ServiceController, ServiceDefinition, ServiceState};
use crate::Result;

/// Classify `sc query` output
pub fn parse_sc_query(output: &CommandOutput) -> ServiceState {
    if output.stdout.contains("RUNNING") {
        ServiceState::Running
    } else if output.stdout.contains("STOPPED") {
        ServiceState::Stopped
    } else {
        ServiceState::NotFound
    }
}

/// Whether `tasklist` output lists the image
pub fn parse_tasklist(output: &CommandOutput, image: &str) -> bool {
    output
        .stdout
        .to_ascii_lowercase()
        .contains(&image.to_ascii_lowercase())
}

/// Extract a `REG_SZ` value from `reg query` output
///
/// ```text
/// HKEY_LOCAL_MACHINE\System\CurrentControlSet\Services\zapret
///     zapret-discord-youtube    REG_SZ    general (ALT)
/// ```
pub fn parse_reg_query(output: &CommandOutput, value_name: &str) -> Option<String> {
    output.stdout.lines().find_map(|line| {
        let line = line.trim();
        let rest = line.strip_prefix(value_name)?;
        let (_, data) = rest.trim_start().split_once("REG_SZ")?;
        Some(data.trim().to_string())
    })
}

/// Windows service, process and host controller
#[derive(Debug, Clone, Default)]
pub struct WindowsController<R = SystemRunner> {
    runner: R,
}

impl WindowsController<SystemRunner> {
    /// Controller running the real system tools
    pub fn new() -> Self {
        Self {
            runner: SystemRunner,
        }
    }
}

impl<R: CommandRunner> WindowsController<R> {
    /// Controller using a custom runner
    pub fn with_runner(runner: R) -> Self {
        Self { runner }
    }

    fn run(&self, program: &str, args: &[&str]) -> Result<CommandOutput> {
        let spec = CommandSpec::new(program, args.iter().copied());
        self.runner.run(&spec)
    }

    fn run_checked(&self, program: &str, args: &[&str]) -> Result<CommandOutput> {
        let spec = CommandSpec::new(program, args.iter().copied());
        self.runner.run(&spec)?.into_checked(&spec)
    }
}

impl<R: CommandRunner> ServiceController for WindowsController<R> {
    fn stop_service(&self, name: &str) -> Result<()> {
        let output = self.run("net", &["stop", name])?;
        if !output.success() {
            // Not running or not installed
            debug!("net stop {} returned: {}", name, output.error_summary());
        }
        Ok(())
    }

    fn remove_service(&self, name: &str) -> Result<()> {
        let output = self.run("sc", &["delete", name])?;
        if !output.success() {
            debug!("sc delete {} returned: {}", name, output.error_summary());
        }
        Ok(())
    }

    fn create_service(&self, definition: &ServiceDefinition) -> Result<()> {
        self.run_checked(
            "sc",
            &[
                "create",
                &definition.name,
                "binPath=",
                &definition.binary_path,
                "DisplayName=",
                &definition.display_name,
                "start=",
                definition.start_mode.as_sc_arg(),
            ],
        )?;
        Ok(())
    }

    fn set_description(&self, name: &str, text: &str) -> Result<()> {
        self.run_checked("sc", &["description", name, text])?;
        Ok(())
    }

    fn start(&self, name: &str) -> Result<()> {
        self.run_checked("sc", &["start", name])?;
        Ok(())
    }

    fn query_status(&self, name: &str) -> Result<ServiceState> {
        let output = self.run("sc", &["query", name])?;
        Ok(parse_sc_query(&output))
    }
}

impl<R: CommandRunner> ProcessControl for WindowsController<R> {
    fn is_running(&self, image: &str) -> Result<bool> {
        let filter = format!("IMAGENAME eq {image}");
        let output = self.run_checked("tasklist", &["/FI", &filter])?;
        Ok(parse_tasklist(&output, image))
    }

    fn kill(&self, image: &str) -> Result<()> {
        let output = self.run("taskkill", &["/F", "/IM", image])?;
        if !output.success() {
            // No matching process
            debug!("taskkill {} returned: {}", image, output.error_summary());
        }
        Ok(())
    }
}

impl<R: CommandRunner> HostSettings for WindowsController<R> {
    fn enable_tcp_timestamps(&self) -> Result<()> {
        self.run_checked(
            "netsh",
            &["interface", "tcp", "set", "global", "timestamps=enabled"],
        )?;
        Ok(())
    }

    fn set_registry_string(&self, key: &str, value_name: &str, data: &str) -> Result<()> {
        self.run_checked(
            "reg",
            &["add", key, "/v", value_name, "/t", "REG_SZ", "/d", data, "/f"],
        )?;
        Ok(())
    }

    fn registry_string(&self, key: &str, value_name: &str) -> Result<Option<String>> {
        let output = self.run("reg", &["query", key, "/v", value_name])?;
        if !output.success() {
            return Ok(None);
        }
        let value = parse_reg_query(&output, value_name);
        if value.is_none() {
            warn!("Unexpected reg query output for {}\\{}", key, value_name);
        }
        Ok(value)
    }
}
