//! Game filter, ipset and hosts commands

use anyhow::{Context, Result};
use clap::{Args, ValueEnum};
use colored::Colorize;
use zapret_core::{hosts, GameFilter, InstallLayout, Ipset};
use zapret_fetch::{resources, ReleaseFetcher};
use zapret_platform::require_elevation;

/// Game filter command arguments
#[derive(Args, Debug)]
pub struct GameFilterArgs {
    /// Action to perform
    #[arg(value_enum, default_value = "status")]
    pub action: GameFilterAction,
}

/// Game filter actions
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum GameFilterAction {
    /// Include game ports (1024-65535)
    On,
    /// Exclude game ports
    Off,
    /// Show current state
    Status,
}

/// IPset command arguments
#[derive(Args, Debug)]
pub struct IpsetArgs {
    /// Action to perform
    #[arg(value_enum, default_value = "status")]
    pub action: IpsetAction,
}

/// IPset actions
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum IpsetAction {
    /// Show current mode
    Status,
    /// Cycle loaded -> none -> any -> loaded
    Toggle,
    /// Download the maintained list
    Update,
}

/// Hosts command arguments
#[derive(Args, Debug)]
pub struct HostsArgs {
    /// Action to perform
    #[arg(value_enum)]
    pub action: HostsAction,
}

/// Hosts actions
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum HostsAction {
    /// Add the Discord voice server entries
    Update,
}

const RESTART_HINT: &str = "Restart zapret to apply.";

/// Execute game-filter command
pub fn game_filter(args: GameFilterArgs, layout: &InstallLayout) -> Result<()> {
    let utils = layout.utils_dir();
    match args.action {
        GameFilterAction::Status => {
            let filter = GameFilter::detect(&utils);
            println!("Game filter: {} (ports {})", filter, filter.port_range());
        }
        GameFilterAction::On | GameFilterAction::Off => {
            let filter = GameFilter::from(matches!(args.action, GameFilterAction::On));
            filter.store(&utils)?;
            println!("{} Game filter {}. {}", "✓".green(), filter, RESTART_HINT);
        }
    }
    Ok(())
}

/// Execute ipset command
pub async fn ipset(args: IpsetArgs, layout: &InstallLayout) -> Result<()> {
    let ipset = Ipset::new(layout.lists_dir());
    match args.action {
        IpsetAction::Status => println!("IPset mode: {}", ipset.mode().to_string().cyan()),
        IpsetAction::Toggle => {
            let mode = ipset.toggle()?;
            println!("{} IPset mode: {}. {}", "✓".green(), mode.to_string().cyan(), RESTART_HINT);
        }
        IpsetAction::Update => {
            let fetcher = ReleaseFetcher::new()?;
            let mode = resources::update_ipset(&fetcher, &ipset)
                .await
                .context("Failed to update the ipset list")?;
            println!("{} IPset list updated, mode: {}", "✓".green(), mode.to_string().cyan());
        }
    }
    Ok(())
}

/// Execute hosts command
pub async fn hosts(args: HostsArgs) -> Result<()> {
    match args.action {
        HostsAction::Update => {
            require_elevation("modify the hosts file")?;
            let path = hosts::system_hosts_path();
            let fetcher = ReleaseFetcher::new()?;
            let changed = resources::update_hosts(&fetcher, &path)
                .await
                .with_context(|| format!("Failed to update {}", path.display()))?;
            if changed {
                println!("{} Discord voice entries added to {}", "✓".green(), path.display());
            } else {
                println!("Hosts file already contains the Discord voice entries");
            }
        }
    }
    Ok(())
}
