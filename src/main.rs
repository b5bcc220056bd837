//! Main application entry point (CLI binary).
//!
//! A thin wrapper around the `toggl_trello_kpi` library that handles:
//! - Command-line argument parsing
//! - Environment variable loading (.env file)
//! - Logger initialization
//! - User-facing output formatting

use anyhow::{Context, Result};
use clap::Parser;
use log::info;
use std::process;

use toggl_trello_kpi::initialization::init_logger_with;
use toggl_trello_kpi::{run, Cli};

#[tokio::main]
async fn main() -> Result<()> {
    // Load API tokens and database settings from .env, first in the working
    // directory, then next to the executable
    if dotenvy::dotenv().is_err() {
        if let Ok(exe_path) = std::env::current_exe() {
            if let Some(exe_dir) = exe_path.parent() {
                let env_path = exe_dir.join(".env");
                if env_path.exists() {
                    let _ = dotenvy::from_path(&env_path);
                }
            }
        }
    }

    let cli = Cli::parse();

    init_logger_with(cli.log_level.clone().into(), cli.log_format.clone())
        .context("Failed to initialize logger")?;
    info!("Running {}", cli.command_name());

    match run(cli).await {
        Ok(outcome) => {
            println!("{outcome}");
            Ok(())
        }
        Err(e) => {
            eprintln!("toggl_trello_kpi error: {:#}", e);
            process::exit(1);
        }
    }
}
