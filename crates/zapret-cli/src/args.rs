//! Command-line argument parsing

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, ValueEnum};
use zapret_core::InstallLayout;

use crate::commands::Command;

/// zapretctl - zapret installer and service manager
///
/// Downloads zapret releases, installs strategies as a Windows service and
/// manages the options and domain lists shipped with the release.
#[derive(Parser, Debug)]
#[command(name = "zapretctl")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Args {
    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Command,

    /// Install base directory (default: ~/zapret-gui)
    #[arg(long, global = true, env = "ZAPRET_ROOT", value_name = "DIR")]
    pub root: Option<PathBuf>,

    /// Verbosity level (-v, -vv, -vvv)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Output format for logs
    #[arg(long, global = true, value_enum, default_value = "text")]
    pub log_format: LogFormat,

    /// Log file path
    #[arg(long, global = true, value_name = "FILE")]
    pub log_file: Option<String>,

    /// Only log errors
    #[arg(short, long, global = true)]
    pub quiet: bool,
}

/// Log output format
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum LogFormat {
    /// Human-readable text
    Text,
    /// JSON format
    Json,
    /// Compact format
    Compact,
}

impl Args {
    /// Install layout selected by `--root` or the default location
    pub fn layout(&self) -> Result<InstallLayout> {
        match &self.root {
            Some(root) => Ok(InstallLayout::new(root)),
            None => Ok(InstallLayout::default_location()?),
        }
    }
}
