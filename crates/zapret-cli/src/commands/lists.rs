//! Domain list management commands

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Args, Subcommand};
use colored::Colorize;
use zapret_core::{InstallLayout, ListStore};

/// Lists command arguments
#[derive(Args, Debug)]
pub struct ListsArgs {
    #[command(subcommand)]
    pub command: ListsCommand,
}

/// Lists subcommands
#[derive(Subcommand, Debug)]
pub enum ListsCommand {
    /// List all list files with their entry counts
    Ls,

    /// Print a list
    Show {
        /// List name, with or without .txt
        name: String,
    },

    /// Add entries to a list
    Add {
        /// List name, with or without .txt
        name: String,

        /// Domains or addresses to add
        #[arg(required = true)]
        entries: Vec<String>,
    },

    /// Remove an entry from a list
    Remove {
        /// List name, with or without .txt
        name: String,

        /// Entry to remove
        entry: String,
    },

    /// Merge the entries of a file into a list
    Import {
        /// List name, with or without .txt
        name: String,

        /// File to import
        file: PathBuf,
    },
}

/// Execute lists command
pub fn execute(args: ListsArgs, layout: &InstallLayout) -> Result<()> {
    let store = ListStore::new(layout.lists_dir());
    match args.command {
        ListsCommand::Ls => ls(&store),
        ListsCommand::Show { name } => {
            print!("{}", store.read(&name)?);
            Ok(())
        }
        ListsCommand::Add { name, entries } => {
            let added = store.add(&name, &entries)?;
            println!("{} Added {} entries to {}", "✓".green(), added, name.cyan());
            Ok(())
        }
        ListsCommand::Remove { name, entry } => {
            if store.remove(&name, &entry)? {
                println!("{} Removed {} from {}", "✓".green(), entry, name.cyan());
            } else {
                println!("{}", format!("{entry} is not in {name}").yellow());
            }
            Ok(())
        }
        ListsCommand::Import { name, file } => {
            let added = store
                .import(&name, &file)
                .with_context(|| format!("Failed to import {}", file.display()))?;
            println!(
                "{} Imported {} new entries into {}",
                "✓".green(),
                added,
                name.cyan()
            );
            Ok(())
        }
    }
}

fn ls(store: &ListStore) -> Result<()> {
    let names = store.names()?;
    if names.is_empty() {
        println!("{}", format!("No lists in {}", store.dir().display()).yellow());
        return Ok(());
    }
    for name in names {
        let count = store.count(&name)?;
        println!("{:<32} {:>6}", name, count.to_string().green());
    }
    Ok(())
}
