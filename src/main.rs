//! Main application entry point (CLI binary).
//!
//! A thin wrapper around the `healthcare_migrate` library that handles:
//! - Environment variable loading (.env file)
//! - Command-line argument parsing and validation
//! - Logger initialization
//! - Mapping the run outcome to the process exit code
//!
//! All core functionality is implemented in the library crate.

use anyhow::{Context, Result};
use clap::Parser;
use std::process;

use healthcare_migrate::initialization::init_logger_with;
use healthcare_migrate::{migrate, Config, LogReporter};

#[tokio::main]
async fn main() -> Result<()> {
    // .env in the working directory first, then next to the executable
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

    let config = Config::parse().normalized();

    init_logger_with(config.log_level.clone().into(), config.log_format.clone())
        .context("Failed to initialize logger")?;

    if let Err(e) = config.validate() {
        eprintln!("healthcare_migrate error: {}", e);
        process::exit(1);
    }

    // Fatal errors are already logged by the reporter
    match migrate(&config, &mut LogReporter::new()).await {
        Ok(report) => process::exit(report.exit_code()),
        Err(_) => process::exit(1),
    }
}
