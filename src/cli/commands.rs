//! Command handler implementations
//!
//! This module contains the implementation of all CLI commands.

use crate::batch::{BatchReport, BatchRunner};
use crate::cli::progress::{
    format_share, mark, print_error, print_header, print_info, print_success, print_warning,
    AnalysisProgress,
};
use crate::cli::{AnalysisArgs, Args, Commands};
use crate::color::contrast::{WcagLevel, WcagReport};
use crate::color::similarity::{Classifier, SimilarityMetric};
use crate::color::space::Rgb;
use crate::core::config::{
    get_config_path, init_config, open_config_in_editor, write_default_config, Config,
};
use crate::core::observer::LogObserver;
use crate::imaging::ColorExtractor;
use crate::suggest::{SuggestOptions, SuggestionOrchestrator, SuggestionResult};
use anyhow::{Context, Result};
use log::{error, info};
use std::path::{Path, PathBuf};

/// Run the appropriate command based on CLI arguments
pub fn run_command(args: &Args, config: &Config) -> Result<()> {
    match &args.command {
        Commands::Suggest {
            background,
            text,
            analysis,
            json,
        } => suggest_pair(config, background, text, analysis, *json),
        Commands::Analyze {
            image,
            analysis,
            json,
        } => analyze_image(config, image, analysis, *json),
        Commands::Batch {
            dir,
            output,
            no_recursive,
            threads,
            analysis,
        } => {
            let mut config = config.clone();
            if *no_recursive {
                config.batch.recursive = false;
            }
            if let Some(threads) = threads {
                config.batch.threads = *threads;
            }
            run_batch(&config, dir, output.as_deref(), analysis)
        }
        Commands::Contrast { first, second, json } => show_contrast(first, second, *json),
        Commands::Compare {
            first,
            second,
            metric,
            threshold,
        } => {
            let mut analysis = config.analysis.clone();
            if let Some(metric) = metric {
                analysis.metric = *metric;
            }
            let threshold = threshold.unwrap_or_else(|| analysis.threshold());
            compare_colors(first, second, Classifier::new(analysis.metric, threshold))
        }
        Commands::Config { path, reset } => handle_config_command(*path, *reset),
        Commands::GenerateConfig { output } => generate_config_file(output.clone()),
        Commands::ShowConfig => {
            show_config(config);
            Ok(())
        }
    }
}

/// Merge command-line overrides into the configured analysis settings
pub fn analysis_options(config: &Config, overrides: &AnalysisArgs) -> Result<SuggestOptions> {
    let mut analysis = config.analysis.clone();

    if let Some(ratio) = overrides.ratio {
        analysis.desired_ratio = ratio;
    }
    if let Some(ref level) = overrides.level {
        let level: WcagLevel = level.parse().map_err(anyhow::Error::msg)?;
        analysis.desired_ratio = level.min_ratio();
    }
    if let Some(metric) = overrides.metric {
        analysis.metric = metric;
    }
    if let Some(threshold) = overrides.threshold {
        match analysis.metric {
            SimilarityMetric::Rgb => analysis.rgb_threshold = threshold,
            SimilarityMetric::Lab => analysis.lab_threshold = threshold,
        }
    }

    analysis
        .to_options()
        .context("Invalid analysis settings")
}

fn parse_color(value: &str) -> Result<Rgb> {
    value
        .parse::<Rgb>()
        .with_context(|| format!("Could not parse color '{}'", value))
}

/// Handle the `suggest` command
pub fn suggest_pair(
    config: &Config,
    background: &str,
    text: &str,
    overrides: &AnalysisArgs,
    json: bool,
) -> Result<()> {
    let options = analysis_options(config, overrides)?;
    let background = parse_color(background)?;
    let text = parse_color(text)?;

    let result = SuggestionOrchestrator::with_observer(options, &LogObserver)
        .run(background, text)
        .context("Analysis failed")?;

    if json {
        println!("{}", serde_json::to_string_pretty(&result)?);
    } else {
        print_result(&result);
    }
    Ok(())
}

/// Handle the `analyze` command
pub fn analyze_image(
    config: &Config,
    image: &Path,
    overrides: &AnalysisArgs,
    json: bool,
) -> Result<()> {
    let options = analysis_options(config, overrides)?;

    let colors = ColorExtractor::new(config.image)
        .extract_file(image)
        .with_context(|| format!("Failed to extract colors from {}", image.display()))?;
    let result = SuggestionOrchestrator::with_observer(options, &LogObserver)
        .run(colors.background.color, colors.text.color)
        .context("Analysis failed")?;

    if json {
        let value = serde_json::json!({
            "colors": colors,
            "result": result,
        });
        println!("{}", serde_json::to_string_pretty(&value)?);
        return Ok(());
    }

    print_header(&format!("{}", image.display()));
    print_info(&format!(
        "Background: {} ({} of pixels)",
        colors.background.color,
        format_share(colors.background.share)
    ));
    print_info(&format!(
        "Text:       {} ({} of pixels)",
        colors.text.color,
        format_share(colors.text.share)
    ));
    if let Some(ref recognized) = colors.recognized_text {
        print_info(&format!("Recognized text: {}", recognized));
    }
    println!();
    print_result(&result);
    Ok(())
}

fn print_result(result: &SuggestionResult) {
    println!("{}", result);
    println!();
    match result.recommended_pair() {
        Some((text, background)) if result.is_compliant() => {
            print_success(&format!("{} on {} already meets the target", text, background))
        }
        Some((text, background)) => {
            print_success(&format!("Use {} text on {}", text, background))
        }
        None => print_warning("No compliant color pair found"),
    }
}

/// Handle the `batch` command
pub fn run_batch(
    config: &Config,
    dir: &Path,
    output: Option<&Path>,
    overrides: &AnalysisArgs,
) -> Result<()> {
    let options = analysis_options(config, overrides)?;

    if config.batch.threads > 0 {
        rayon::ThreadPoolBuilder::new()
            .num_threads(config.batch.threads)
            .build_global()
            .context("Failed to configure worker threads")?;
    }

    print_header("Batch Analysis");
    let runner = BatchRunner::new(config.batch.clone(), config.image, options);
    let progress = AnalysisProgress::new();

    let report = match runner.run(dir, |p| progress.update(&p)) {
        Ok(report) => report,
        Err(e) => {
            progress.finish_with_error(&e.to_string());
            return Err(e).with_context(|| format!("Batch analysis of {} failed", dir.display()));
        }
    };
    progress.finish();

    for entry in report.entries.iter().filter(|e| e.error.is_some()) {
        progress.log_warning(&format!(
            "{}: {}",
            entry.path.display(),
            entry.error.as_deref().unwrap_or_default()
        ));
    }

    print_batch_summary(&report);

    if let Some(path) = output {
        report
            .save(path)
            .with_context(|| format!("Failed to write report to {}", path.display()))?;
        print_success(&format!("Report written to {}", path.display()));
    }

    Ok(())
}

fn print_batch_summary(report: &BatchReport) {
    let summary = &report.summary;
    println!();
    print_info(&format!("Images found:                    {}", summary.total));
    print_info(&format!("Already compliant:               {}", summary.no_suggestion_needed));
    print_info(&format!("Text color suggested:            {}", summary.foreground_suggested));
    print_info(&format!(
        "No background suggestion needed: {}",
        summary.no_background_suggestion_needed
    ));
    print_info(&format!("Background color suggested:      {}", summary.background_suggested));
    print_info(&format!("Suggestion unavailable:          {}", summary.target_unreachable));
    if summary.failed > 0 {
        print_error(&format!("Failed to analyze:               {}", summary.failed));
    }
}

/// Handle the `contrast` command
pub fn show_contrast(first: &str, second: &str, json: bool) -> Result<()> {
    let a = parse_color(first)?;
    let b = parse_color(second)?;
    let report = WcagReport::evaluate(a, b);

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    println!("Contrast ratio of {} and {}: {}", a, b, report.ratio);
    for (level, passed) in &report.levels {
        println!(
            "  {} {:<18} (needs {:.1}:1)",
            mark(*passed),
            level.label(),
            level.min_ratio()
        );
    }
    Ok(())
}

/// Handle the `compare` command
pub fn compare_colors(first: &str, second: &str, classifier: Classifier) -> Result<()> {
    let a = parse_color(first)?;
    let b = parse_color(second)?;
    let comparison = classifier.compare(a, b);

    println!(
        "{} distance between {} and {}: {:.2} (threshold {:.2})",
        classifier.metric, a, b, comparison.distance, classifier.threshold
    );
    println!("Colors are from the {}", comparison.verdict);
    Ok(())
}

/// Handle the `config` command - open, show path, or reset the config file
pub fn handle_config_command(show_path: bool, reset: bool) -> Result<()> {
    if reset {
        if let Some(config_path) = get_config_path() {
            if config_path.exists() {
                std::fs::remove_file(&config_path)?;
                info!("Removed existing config file");
            }
        }
        let path = init_config()?;
        info!("Created fresh config file at: {}", path.display());
        return Ok(());
    }

    if show_path {
        let path = Config::get_active_config_path();
        println!("{}", path.display());
        if path.exists() {
            info!("Config file exists at: {}", path.display());
        } else {
            info!("Config file would be created at: {}", path.display());
        }
        return Ok(());
    }

    info!("Opening configuration file in default editor...");
    match open_config_in_editor() {
        Ok(path) => {
            info!("Config file: {}", path.display());
            info!("Save the file after editing to apply changes.");
            info!("Run 'contrast-suggest show-config' to verify your settings.");
        }
        Err(e) => {
            error!("Failed to open config file: {}", e);
            if let Some(path) = get_config_path() {
                info!("You can manually edit the config at: {}", path.display());
            }
        }
    }

    Ok(())
}

/// Generate a configuration file at the specified or default location
pub fn generate_config_file(output: Option<PathBuf>) -> Result<()> {
    let output_path = match output {
        Some(path) => {
            write_default_config(&path)?;
            path
        }
        None => init_config()?,
    };

    info!("Configuration file: {}", output_path.display());
    info!("Edit this file to customize the analysis settings.");
    info!("");
    info!("Quick tip: Run 'contrast-suggest config' to open the config in your editor.");

    Ok(())
}

/// Show the current configuration settings
pub fn show_config(config: &Config) {
    let config_path = Config::get_active_config_path();
    info!("Configuration file: {}", config_path.display());
    if !config_path.exists() {
        info!("(Using default settings - no config file found)");
    }
    info!("");
    info!("Current Configuration:");
    info!("----------------------");
    info!("[analysis]");
    info!("  desired_ratio = {}", config.analysis.desired_ratio);
    info!("  metric = \"{}\"", config.analysis.metric);
    info!("  rgb_threshold = {}", config.analysis.rgb_threshold);
    info!("  lab_threshold = {}", config.analysis.lab_threshold);
    info!("  foreground_step = {}", config.analysis.foreground_step);
    info!("  background_step = {}", config.analysis.background_step);
    info!("  max_iterations = {}", config.analysis.max_iterations);
    info!("");
    info!("[image]");
    info!("  max_dimension = {}", config.image.max_dimension);
    info!("  kmeans_iterations = {}", config.image.kmeans_iterations);
    info!("");
    info!("[batch]");
    info!("  recursive = {}", config.batch.recursive);
    info!("  follow_symlinks = {}", config.batch.follow_symlinks);
    info!("  threads = {}", config.batch.threads);
    info!("");
    info!("[logging]");
    info!("  level = \"{}\"", config.logging.level);
    info!("  log_to_file = {}", config.logging.log_to_file);
    info!("  log_file = \"{}\"", config.logging.log_file.display());
}
