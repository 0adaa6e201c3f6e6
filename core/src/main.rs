mod commands;
mod context;

use assistant::GeminiClient;
use clap::Parser;
use colored::Colorize;
use common::env_config::Config;
use std::{path::PathBuf, process::ExitCode, sync::Arc};

use crate::{commands::Command, context::AppContext};

/// Orders, customers and products for a single store owner.
#[derive(Parser, Debug)]
#[command(name = "nexus", version)]
struct Cli {
    /// Storage file, overrides STORAGE_PATH
    #[arg(long, global = true)]
    storage: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    // get env vars
    let config = Config::from_env();

    // init logger
    logger::setup(&config).expect("Failed to set up logger");

    // open storage
    let path = cli.storage.unwrap_or_else(|| config.storage_path.clone());
    let store = match db::setup(&path) {
        Ok(store) => store,
        Err(e) => {
            eprintln!("{} {}", "error:".red().bold(), e.report());
            return ExitCode::FAILURE;
        }
    };

    log::debug!("Starting in {} mode", config.environment);

    let generator = Arc::new(GeminiClient::new(&config.gemini_config));
    let mut ctx = AppContext::new(store, &config, generator);

    match commands::run(&mut ctx, cli.command).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{} {}", "error:".red().bold(), e.report());
            ExitCode::FAILURE
        }
    }
}
