//! CLI commands

pub mod completions;
pub mod config;
pub mod install;
pub mod lists;
pub mod maintenance;
pub mod options;
pub mod service;
pub mod status;
pub mod strategies;

use anyhow::{Context, Result};
use clap::Subcommand;
use zapret_platform::{WindowsController, ZapretService};

/// CLI commands
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Download the latest zapret release and install it
    Install(install::InstallArgs),

    /// Check whether a newer release is available
    Update,

    /// Show winws, service, driver and version status
    Status(status::StatusArgs),

    /// List strategy scripts
    Strategies,

    /// Print the service command line extracted from a strategy
    Extract(strategies::ExtractArgs),

    /// Launch a strategy script in its own console
    Run(strategies::RunArgs),

    /// Windows service management
    Service(service::ServiceArgs),

    /// Game filter port range
    GameFilter(options::GameFilterArgs),

    /// IPset list mode
    Ipset(options::IpsetArgs),

    /// System hosts file entries
    Hosts(options::HostsArgs),

    /// Domain list management
    Lists(lists::ListsArgs),

    /// Test connectivity to a domain
    Test(test::TestArgs),

    /// Application configuration
    Config(config::ConfigArgs),

    /// Generate shell completions
    Completions(completions::CompletionsArgs),

    /// Kill running winws processes
    StopWinws,

    /// Stop and delete the WinDivert driver
    RemoveDriver,
}

/// Run `f` against the system service controller on a blocking worker
pub(crate) async fn with_service<T, F>(f: F) -> Result<T>
where
    F: FnOnce(&ZapretService<'_>) -> zapret_platform::Result<T> + Send + 'static,
    T: Send + 'static,
{
    let result = tokio::task::spawn_blocking(move || {
        let controller = WindowsController::new();
        let service = ZapretService::new(&controller, &controller, &controller);
        f(&service)
    })
    .await
    .context("Service worker panicked")?;
    Ok(result?)
}
