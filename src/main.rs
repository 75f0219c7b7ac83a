// Clippy project config
#![warn(clippy::unwrap_used)]

use clap::Parser;
use config::{Config, DownloaderBackend};
use directories::ProjectDirs;
use error::Error;
pub use error::Result;
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::prelude::*;

mod app;
mod cli;
mod config;
mod core;
mod error;
mod filename;
mod link;
mod metadata;
mod youtube_downloader;

const LOG_FILE_NAME: &str = "stereodl.log";

#[derive(Parser, Debug)]
#[command(author,version,about,long_about=None)]
/// An interactive downloader that turns YouTube audio into car-stereo
/// friendly MP3 files.
struct Arguments {
    /// Display and log additional debug information.
    #[arg(short, long, default_value_t = false)]
    debug: bool,
    /// Force the use of a download backend.
    #[arg(value_enum, short, long)]
    backend: Option<DownloaderBackend>,
}

pub struct RuntimeInfo {
    debug: bool,
    config: Config,
}

#[tokio::main]
async fn main() -> ExitCode {
    // Using try block to print error using Display instead of Debug.
    if let Err(e) = try_main().await {
        println!("{e}");
        return ExitCode::FAILURE;
    };
    ExitCode::SUCCESS
}

// Main function is refactored here so that we can pretty print errors.
// Regular main function returns debug errors so not as friendly.
async fn try_main() -> anyhow::Result<()> {
    let args = Arguments::parse();
    let Arguments { debug, backend } = args;
    // Config and log files will be in OS directories.
    // Create them if they don't exist.
    initialise_directories().await?;
    init_tracing(debug)?;
    let mut config = Config::new()?;
    // Command line flag for backend should override config for backend.
    if let Some(backend) = backend {
        config.backend = backend
    }
    let rt = RuntimeInfo { debug, config };
    cli::run_interactive_session(rt).await?;
    Ok(())
}

pub fn get_data_dir() -> Result<PathBuf> {
    let directory = if let Ok(s) = std::env::var("STEREODL_DATA_DIR") {
        PathBuf::from(s)
    } else if let Some(proj_dirs) = ProjectDirs::from("com", "stereodl", "stereodl") {
        proj_dirs.data_local_dir().to_path_buf()
    } else {
        return Err(Error::DirectoryName);
    };
    Ok(directory)
}

pub fn get_config_dir() -> Result<PathBuf> {
    let directory = if let Ok(s) = std::env::var("STEREODL_CONFIG_DIR") {
        PathBuf::from(s)
    } else if let Some(proj_dirs) = ProjectDirs::from("com", "stereodl", "stereodl") {
        proj_dirs.config_local_dir().to_path_buf()
    } else {
        return Err(Error::DirectoryName);
    };
    Ok(directory)
}

/// Create the Config and Data directories for the app if they do not already
/// exist. Returns an error if unsuccesful.
async fn initialise_directories() -> Result<()> {
    let config_dir = get_config_dir()?;
    let data_dir = get_data_dir()?;
    fs_err::tokio::create_dir_all(config_dir).await?;
    fs_err::tokio::create_dir_all(data_dir).await?;
    Ok(())
}

/// Initialise tracing to stderr, plus a log file in the data directory when
/// running in debug mode.
fn init_tracing(debug: bool) -> Result<()> {
    let stderr_layer = tracing_subscriber::fmt::layer()
        .with_target(false)
        .with_writer(std::io::stderr);
    if debug {
        let log_file_name = get_data_dir()?.join(LOG_FILE_NAME);
        let log_file = std::fs::File::create(&log_file_name)?;
        let log_file_layer = tracing_subscriber::fmt::layer().with_writer(Arc::new(log_file));
        let context_layer = tracing_subscriber::filter::Targets::new()
            .with_target("stereodl", tracing::Level::DEBUG);
        tracing_subscriber::registry()
            .with(stderr_layer.and_then(log_file_layer))
            .with(context_layer)
            .init();
        info!("Started in debug mode, logging to {:?}.", log_file_name);
    } else {
        let context_layer = tracing_subscriber::filter::Targets::new()
            .with_target("stereodl", tracing::Level::INFO);
        tracing_subscriber::registry()
            .with(stderr_layer)
            .with(context_layer)
            .init();
    }
    Ok(())
}
