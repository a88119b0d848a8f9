//! Config command - application settings

use anyhow::{Context, Result};
use clap::{Args, Subcommand};
use colored::Colorize;
use zapret_core::{AppConfig, InstallLayout};

/// Config command arguments
#[derive(Args, Debug)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub action: ConfigAction,
}

/// Config subcommands
#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    /// Show the current configuration
    Show,

    /// Change a setting
    Set {
        /// Setting name (theme, check_updates)
        key: String,

        /// New value
        value: String,
    },

    /// Print the config file location
    Path,
}

/// Execute config command
pub fn execute(args: ConfigArgs, layout: &InstallLayout) -> Result<()> {
    let path = AppConfig::config_path(layout);
    match args.action {
        ConfigAction::Show => {
            let config = AppConfig::load(&path);
            let json =
                serde_json::to_string_pretty(&config).context("Failed to serialize config")?;
            println!("{}", json);
        }
        ConfigAction::Set { key, value } => {
            let mut config = AppConfig::load(&path);
            config.set(&key, &value)?;
            config
                .save(&path)
                .with_context(|| format!("Failed to write {}", path.display()))?;
            println!("{} {} = {}", "✓".green(), key.cyan(), value);
        }
        ConfigAction::Path => println!("{}", path.display()),
    }
    Ok(())
}
