//! Status command

use anyhow::Result;
use clap::Args;
use colored::Colorize;
use zapret_core::{version, AppConfig, InstallLayout};
use zapret_fetch::ReleaseFetcher;
use zapret_platform::ServiceState;

use super::with_service;

/// Status command arguments
#[derive(Args, Debug)]
pub struct StatusArgs {
    /// Skip the latest release lookup
    #[arg(long)]
    pub offline: bool,
}

/// Execute status command
pub async fn execute(args: StatusArgs, layout: InstallLayout) -> Result<()> {
    let report = with_service(|service| Ok(service.status())).await?;

    println!("{}", "═".repeat(50).bright_blue());
    println!("{}", " zapret status".bright_white().bold());
    println!("{}", "═".repeat(50).bright_blue());

    let winws = match report.winws_running {
        Some(true) => "running".green(),
        Some(false) => "stopped".red(),
        None => "unknown".yellow(),
    };
    println!("  winws.exe:        {}", winws);
    println!("  zapret service:   {}", paint(report.service));
    println!("  WinDivert driver: {}", paint(report.driver));
    if let Some(strategy) = &report.strategy {
        println!("  Strategy:         {}", strategy.cyan());
    }
    println!();

    if !layout.is_installed() {
        println!(
            "{} Run '{}' first",
            format!("zapret is not installed in {}.", layout.zapret_dir().display()).yellow(),
            "zapretctl install".cyan()
        );
        return Ok(());
    }

    let local = version::local_version(&layout).or_else(|| version::readme_version(&layout));
    println!(
        "  Installed version: {}",
        local.as_deref().unwrap_or("unknown")
    );

    let config = AppConfig::load(&AppConfig::config_path(&layout));
    if !args.offline && config.check_updates {
        let check = ReleaseFetcher::new()?
            .check_updates(local.as_deref())
            .await;
        match check.latest {
            Some(latest) if check.available => {
                println!("  Latest version:    {} {}", latest.green(), "(update available)".green())
            }
            Some(latest) => println!("  Latest version:    {}", latest),
            None => println!("  Latest version:    {}", "unknown".yellow()),
        }
    }

    Ok(())
}

fn paint(state: ServiceState) -> colored::ColoredString {
    match state {
        ServiceState::Running => state.to_string().green(),
        ServiceState::Stopped => state.to_string().red(),
        ServiceState::NotFound => state.to_string().dimmed(),
    }
}
