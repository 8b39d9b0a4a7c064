use opendsm::commands::{Cli, run};
use opendsm::error::OpendsmError;
use opendsm::logger::initialize as LoggerInitialize;

use common::ErrorLocation;

use std::fs::create_dir_all;
use std::panic::Location;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::Parser;
use log::{error, info};

const APP_DIR_NAME: &str = "opendsm";

fn main() -> ExitCode {
    let cli = Cli::parse();

    let log_dir = cli.log_dir.clone().unwrap_or_else(default_log_dir);
    if let Err(e) = setup_logging(&log_dir) {
        eprintln!("{e}");
    }

    info!("opendsm starting");
    info!("Log directory: {}", log_dir.display());

    match run(&cli) {
        Ok(output) => match serde_json::to_string_pretty(&output) {
            Ok(text) => {
                println!("{text}");
                ExitCode::SUCCESS
            }
            Err(e) => {
                error!("Failed to print output: {e}");
                ExitCode::FAILURE
            }
        },
        Err(e) => {
            error!("{e}");
            eprintln!("{e}");
            ExitCode::FAILURE
        }
    }
}

fn default_log_dir() -> PathBuf {
    dirs::data_local_dir()
        .unwrap_or_else(std::env::temp_dir)
        .join(APP_DIR_NAME)
        .join("logs")
}

fn setup_logging(log_dir: &Path) -> Result<(), OpendsmError> {
    create_dir_all(log_dir).map_err(|e| OpendsmError::Opendsm {
        message: format!("Failed to create log directory: {e}"),
        location: ErrorLocation::from(Location::caller()),
    })?;

    LoggerInitialize(log_dir)
}
