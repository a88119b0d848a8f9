//! Strategy listing, extraction and launching

use anyhow::{Context, Result};
use clap::Args;
use colored::Colorize;
use zapret_core::{strategy, InstallLayout};

/// Extract command arguments
#[derive(Args, Debug)]
pub struct ExtractArgs {
    /// Strategy name (file stem or file name)
    pub strategy: String,

    /// Print the full service binary path instead of only the arguments
    #[arg(long)]
    pub full: bool,
}

/// Run command arguments
#[derive(Args, Debug)]
pub struct RunArgs {
    /// Strategy name (file stem or file name)
    pub strategy: String,
}

/// List strategy scripts
pub fn list(layout: &InstallLayout) -> Result<()> {
    layout.ensure_installed()?;
    let scripts = strategy::discover(&layout.zapret_dir())?;

    if scripts.is_empty() {
        println!("{}", "No strategies found".yellow());
        return Ok(());
    }
    for script in scripts {
        println!("{}", script.name());
    }
    Ok(())
}

/// Print the extracted service command line
pub async fn extract(args: ExtractArgs, layout: InstallLayout) -> Result<()> {
    let root = layout.zapret_dir();
    let script = strategy::find(&root, &args.strategy)?;

    let extracted = tokio::task::spawn_blocking({
        let root = root.clone();
        move || script.extract(&root)
    })
    .await
    .context("Extraction worker panicked")??;

    if args.full {
        let exe = zapret_core::layout::absolute(&layout.winws_exe());
        println!(
            "{}",
            zapret_platform::service::service_binary_path(&exe, extracted.arguments())
        );
    } else {
        println!("{}", extracted.arguments());
    }
    Ok(())
}

/// Launch a strategy in a new console
pub fn run(args: RunArgs, layout: &InstallLayout) -> Result<()> {
    let root = layout.zapret_dir();
    let script = strategy::find(&root, &args.strategy)?;
    let pid = zapret_platform::launch_in_console(script.path(), &root)?;
    println!("{} Started {} (pid {})", "✓".green(), script.file_name().cyan(), pid);
    Ok(())
}
