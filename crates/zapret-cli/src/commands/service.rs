//! Service command - Windows service management

use anyhow::Result;
use clap::{Args, Subcommand};
use colored::Colorize;
use zapret_core::{strategy, InstallLayout};
use zapret_platform::{require_elevation, service::SERVICE_NAME};

use super::with_service;

/// Service command arguments
#[derive(Args, Debug)]
pub struct ServiceArgs {
    #[command(subcommand)]
    pub action: ServiceAction,
}

/// Service subcommands
#[derive(Subcommand, Debug)]
pub enum ServiceAction {
    /// Install a strategy as the autostart service
    Install {
        /// Strategy name (file stem or file name)
        strategy: String,
    },

    /// Stop the service
    Stop,

    /// Stop and delete the service and driver registrations
    Remove,

    /// Show service status
    Status,
}

/// Execute service command
pub async fn execute(args: ServiceArgs, layout: InstallLayout) -> Result<()> {
    match args.action {
        ServiceAction::Install { strategy } => install(&strategy, layout).await,
        ServiceAction::Stop => {
            require_elevation("stop the service")?;
            with_service(|service| service.stop()).await?;
            println!("{} Service {} stopped", "✓".green(), SERVICE_NAME.cyan());
            Ok(())
        }
        ServiceAction::Remove => {
            require_elevation("remove the service")?;
            with_service(|service| service.remove()).await?;
            println!("{} Service {} removed", "✓".green(), SERVICE_NAME.cyan());
            Ok(())
        }
        ServiceAction::Status => status().await,
    }
}

async fn install(name: &str, layout: InstallLayout) -> Result<()> {
    layout.ensure_installed()?;
    let root = layout.zapret_dir();
    let script = strategy::find(&root, name)?;
    require_elevation("install the service")?;

    println!(
        "Installing {} as service {}...",
        script.name().cyan(),
        SERVICE_NAME.cyan()
    );
    let outcome = with_service(move |service| service.install_as_service(&script, &root)).await?;

    for warning in &outcome.warnings {
        println!("  {} {}", "!".yellow(), warning);
    }
    println!(
        "{} Service {} installed with strategy {}",
        "✓".green(),
        SERVICE_NAME.cyan(),
        outcome.strategy.cyan()
    );
    println!("  {}", outcome.binary_path.dimmed());
    Ok(())
}

async fn status() -> Result<()> {
    let report = with_service(|service| Ok(service.status())).await?;
    println!("{} Service Status", SERVICE_NAME.cyan().bold());
    println!();
    println!("  Status:   {}", report.service);
    println!(
        "  Strategy: {}",
        report.strategy.as_deref().unwrap_or("-")
    );
    Ok(())
}
