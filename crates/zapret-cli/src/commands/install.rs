//! Install and update commands

use anyhow::{Context, Result};
use clap::Args;
use colored::Colorize;
use indicatif::{HumanBytes, ProgressBar, ProgressStyle};
use zapret_core::{version, AppConfig, InstallLayout};
use zapret_fetch::{InstallEvent, Installer, ReleaseFetcher};

/// Install command arguments
#[derive(Args, Debug)]
pub struct InstallArgs {
    /// Remove the current installation before installing
    #[arg(long)]
    pub reset: bool,
}

/// Execute install command
pub async fn execute(args: InstallArgs, layout: InstallLayout) -> Result<()> {
    let fetcher = ReleaseFetcher::new().context("Failed to create HTTP client")?;
    let installer = Installer::new(fetcher, layout.clone());

    let bar = ProgressBar::new(100);
    bar.set_style(
        ProgressStyle::default_bar()
            .template("{bar:40.cyan/blue} {pos:>3}% {msg}")
            .context("Invalid progress template")?
            .progress_chars("█▓░"),
    );

    let mut stage = String::new();
    let result = installer
        .install(args.reset, &mut |event| match event {
            InstallEvent::Stage { message, percent } => {
                bar.set_position(u64::from(percent));
                bar.set_message(message.clone());
                stage = message;
            }
            InstallEvent::Downloaded { received, total } => {
                let progress = match total {
                    Some(total) => format!("{} / {}", HumanBytes(received), HumanBytes(total)),
                    None => HumanBytes(received).to_string(),
                };
                bar.set_message(format!("{stage} ({progress})"));
            }
        })
        .await;

    match result {
        Ok(installed) => {
            bar.finish_with_message("Done");
            println!(
                "{} Installed {} into {}",
                "✓".green(),
                installed.tag.cyan(),
                layout.zapret_dir().display()
            );
            let config_path = AppConfig::config_path(&layout);
            if !config_path.exists() {
                AppConfig::default()
                    .save(&config_path)
                    .context("Failed to write default configuration")?;
            }
            Ok(())
        }
        Err(e) => {
            bar.abandon_with_message("Failed");
            if e.is_network() {
                eprintln!(
                    "{} Check the internet connection and that github.com is reachable",
                    "hint:".yellow()
                );
            }
            Err(e).context("Installation failed")
        }
    }
}

/// Execute update command
pub async fn update(layout: InstallLayout) -> Result<()> {
    let fetcher = ReleaseFetcher::new().context("Failed to create HTTP client")?;
    let local = version::local_version(&layout).or_else(|| version::readme_version(&layout));
    let check = fetcher.check_updates(local.as_deref()).await;

    println!(
        "Installed: {}",
        local.as_deref().unwrap_or("not installed").cyan()
    );
    match (&check.latest, check.available) {
        (None, _) => println!("{}", "Could not determine the latest release".yellow()),
        (Some(latest), true) => {
            println!("Latest:    {}", latest.green());
            println!();
            println!(
                "{} Run '{}' to update",
                "Update available.".green().bold(),
                "zapretctl install".cyan()
            );
        }
        (Some(latest), false) => {
            println!("Latest:    {}", latest);
            println!("{}", "Up to date".green());
        }
    }
    Ok(())
}
