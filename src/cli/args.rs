//! Command-line argument definitions
//!
//! This module defines all CLI arguments and subcommands using clap.

use crate::color::similarity::SimilarityMetric;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Check text/background contrast against WCAG and suggest compliant colors
#[derive(Parser, Debug)]
#[command(name = "contrast-suggest")]
#[command(author = "Vihaan Reddy M")]
#[command(version)]
#[command(about = "Check text/background contrast against WCAG and suggest compliant colors", long_about = None)]
pub struct Args {
    #[command(subcommand)]
    pub command: Commands,

    /// Path to configuration file
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Log level: error, warn, info, debug, trace (overrides config)
    #[arg(short, long, global = true)]
    pub log_level: Option<String>,
}

/// Overrides for the `[analysis]` config section
#[derive(clap::Args, Debug, Clone, Default)]
pub struct AnalysisArgs {
    /// Contrast ratio suggestions must reach (overrides config)
    #[arg(short, long, conflicts_with = "level")]
    pub ratio: Option<f64>,

    /// Reach the ratio of a WCAG level: aa, aa-large, aaa, aaa-large
    #[arg(long, value_parser = ["aa", "aa-large", "aaa", "aaa-large"])]
    pub level: Option<String>,

    /// Similarity metric: rgb or lab (overrides config)
    #[arg(short, long)]
    pub metric: Option<SimilarityMetric>,

    /// Same-group distance threshold for the chosen metric (overrides config)
    #[arg(long)]
    pub threshold: Option<f64>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Analyze a background/text color pair and suggest compliant colors
    Suggest {
        /// Background color as #RRGGBB
        #[arg(short, long)]
        background: String,

        /// Text color as #RRGGBB
        #[arg(short, long)]
        text: String,

        #[command(flatten)]
        analysis: AnalysisArgs,

        /// Print the result as JSON
        #[arg(long)]
        json: bool,
    },

    /// Extract the background and text colors of an image, then suggest
    Analyze {
        /// Image file (png, jpeg, gif or bmp)
        image: PathBuf,

        #[command(flatten)]
        analysis: AnalysisArgs,

        /// Print the colors and result as JSON
        #[arg(long)]
        json: bool,
    },

    /// Analyze every image in a directory
    Batch {
        /// Directory to scan
        dir: PathBuf,

        /// Write a JSON report to this file
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Only scan the top level of the directory
        #[arg(long)]
        no_recursive: bool,

        /// Worker threads, 0 = one per CPU (overrides config)
        #[arg(long)]
        threads: Option<usize>,

        #[command(flatten)]
        analysis: AnalysisArgs,
    },

    /// Show the contrast ratio of two colors and the WCAG levels it passes
    Contrast {
        /// First color as #RRGGBB
        first: String,

        /// Second color as #RRGGBB
        second: String,

        /// Print the report as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show the distance between two colors and whether they share a color group
    Compare {
        /// First color as #RRGGBB
        first: String,

        /// Second color as #RRGGBB
        second: String,

        /// Similarity metric: rgb or lab (overrides config)
        #[arg(short, long)]
        metric: Option<SimilarityMetric>,

        /// Same-group distance threshold (overrides config)
        #[arg(long)]
        threshold: Option<f64>,
    },

    /// Open the configuration file in your default editor
    ///
    /// The config file is stored at:
    /// - Windows: %APPDATA%\contrast_suggest\config.toml
    /// - Linux: ~/.config/contrast_suggest/config.toml
    ///
    /// If no config file exists, a default one will be created.
    Config {
        /// Show the config file path without opening it
        #[arg(long)]
        path: bool,

        /// Reset config to defaults (creates a fresh config file)
        #[arg(long)]
        reset: bool,
    },

    /// Generate a configuration file at a specific location
    GenerateConfig {
        /// Output path for the config file (defaults to standard location)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Show current configuration
    ShowConfig,
}
