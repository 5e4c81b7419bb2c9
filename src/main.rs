mod api;
mod cli;
mod commands;
mod config;
mod executor;
mod input;
mod select;

use anyhow::Result;
use clap::Parser;
use cli::{Cli, Command};
use commands::GlobalOptions;

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Setup logging; --verbose adds request-level detail
    let level = if cli.verbose {
        log::LevelFilter::Debug
    } else {
        log::LevelFilter::Info
    };
    env_logger::Builder::from_default_env()
        .filter_level(level)
        .init();

    let global = GlobalOptions {
        config: cli.config,
        api_key: cli.api_key,
        base_url: cli.base_url,
    };

    match cli.command {
        Command::Provision {
            csv,
            org,
            networks,
            dry_run,
        } => {
            commands::provision::run(
                &global,
                csv.as_deref(),
                org.as_deref(),
                networks.as_deref(),
                dry_run,
            )?;
        }
        Command::Check { csv } => {
            commands::check::run(&global, csv.as_deref())?;
        }
        Command::List { resource } => {
            commands::list::run(&global, &resource)?;
        }
    }

    Ok(())
}
