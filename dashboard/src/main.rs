mod analysis;
mod cli;
mod commands;
mod config;
mod data_handling;
mod error;
mod helper_functions;
mod models;
mod view;

use anyhow::Result;
use clap::Parser;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use crate::cli::{Cli, Commands};
use crate::config::DashboardConfig;

fn main() {
    init_tracing();

    if let Err(err) = run() {
        error!(error = %err, "command failed");
        for cause in err.chain().skip(1) {
            error!(cause = %cause, "caused by");
        }
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();
    let config = DashboardConfig::discover(cli.config.as_deref())?;

    match cli.command {
        Commands::Render(args) => {
            let page = commands::render(args, &config)?;
            info!("Open {} in a browser", page.display());
        }
        Commands::Site(args) => {
            let pages = commands::site(args, &config)?;
            if let Some(index) = pages.first() {
                info!("Open {} in a browser", index.display());
            }
        }
        Commands::Export(args) => {
            let out = commands::export(args, &config)?;
            info!("Long-form data written to {}", out.display());
        }
    }
    Ok(())
}

fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}
