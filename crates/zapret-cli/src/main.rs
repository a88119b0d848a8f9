//! zapretctl
//!
//! Command-line installer and service manager for zapret.

mod args;
mod commands;
mod logging;

use anyhow::Result;
use clap::Parser;
use tracing::error;

use args::Args;
use commands::Command;

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    logging::init(&args)?;

    let result = run(args).await;

    if let Err(ref e) = result {
        error!("Fatal error: {:#}", e);
    }

    result
}

async fn run(args: Args) -> Result<()> {
    let layout = args.layout()?;

    match args.command {
        Command::Install(install_args) => commands::install::execute(install_args, layout).await,
        Command::Update => commands::install::update(layout).await,
        Command::Status(status_args) => commands::status::execute(status_args, layout).await,
        Command::Strategies => commands::strategies::list(&layout),
        Command::Extract(extract_args) => {
            commands::strategies::extract(extract_args, layout).await
        }
        Command::Run(run_args) => commands::strategies::run(run_args, &layout),
        Command::Service(service_args) => commands::service::execute(service_args, layout).await,
        Command::GameFilter(gf_args) => commands::options::game_filter(gf_args, &layout),
        Command::Ipset(ipset_args) => commands::options::ipset(ipset_args, &layout).await,
        Command::Hosts(hosts_args) => commands::options::hosts(hosts_args).await,
        Command::Lists(lists_args) => commands::lists::execute(lists_args, &layout),
        Command::Test(test_args) => commands::test::execute(test_args).await,
        Command::Config(config_args) => commands::config::execute(config_args, &layout),
        Command::Completions(comp_args) => commands::completions::execute(comp_args),
        Command::StopWinws => commands::maintenance::stop_winws().await,
        Command::RemoveDriver => commands::maintenance::remove_driver().await,
    }
}
