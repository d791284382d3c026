//! Contrast Suggest - CLI Entry Point
//!
//! Checks text/background color pairs against WCAG contrast ratios and
//! suggests compliant colors, for single pairs, images or whole directories.
//!
//! This binary is a thin wrapper around the library, handling argument parsing,
//! logging setup, and command dispatch.

use anyhow::{Context, Result};
use clap::Parser;
use contrast_suggest::cli::{self, Args, DualWriter};
use contrast_suggest::core::config::Config;
use env_logger::Builder;
use log::{debug, info, LevelFilter};
use std::fs::OpenOptions;
use std::io::Write;

fn main() -> Result<()> {
    let args = Args::parse();

    // Load configuration
    let mut config = if let Some(ref config_path) = args.config {
        match Config::load(config_path) {
            Ok(cfg) => cfg,
            Err(e) => {
                eprintln!("Warning: Failed to load config file: {}", e);
                Config::default()
            }
        }
    } else {
        match Config::load_default() {
            Ok(cfg) => cfg,
            Err(e) => {
                eprintln!("Warning: {}", e);
                Config::default()
            }
        }
    };

    // Apply CLI overrides to config
    if let Some(ref level) = args.log_level {
        config.logging.level = level.clone();
    }

    // Initialize logger
    let log_level = match config.logging.level.to_lowercase().as_str() {
        "error" => LevelFilter::Error,
        "warn" => LevelFilter::Warn,
        "info" => LevelFilter::Info,
        "debug" => LevelFilter::Debug,
        "trace" => LevelFilter::Trace,
        _ => LevelFilter::Info,
    };

    if config.logging.log_to_file {
        let log_file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&config.logging.log_file)
            .with_context(|| {
                format!(
                    "Failed to open log file {}",
                    config.logging.log_file.display()
                )
            })?;

        Builder::new()
            .filter_level(log_level)
            .format(|buf, record| {
                writeln!(
                    buf,
                    "[{} {} {}] {}",
                    chrono::Utc::now().format("%Y-%m-%dT%H:%M:%SZ"),
                    record.level(),
                    record.target(),
                    record.args()
                )
            })
            .target(env_logger::Target::Pipe(Box::new(DualWriter {
                console: std::io::stderr(),
                file: log_file,
            })))
            .init();

        info!("Logging to file: {}", config.logging.log_file.display());
    } else {
        Builder::from_env(env_logger::Env::default().default_filter_or(log_level.as_str()))
            .init();
    }

    debug!("{} v{}", contrast_suggest::NAME, contrast_suggest::VERSION);

    // Run the command
    cli::run_command(&args, &config)?;

    Ok(())
}
