//! Configuration module for contrast_suggest
//!
//! Supports loading configuration from a TOML file.
//! Configuration is stored in a standard location:
//! - Windows: %APPDATA%\contrast_suggest\config.toml
//! - Linux: ~/.config/contrast_suggest/config.toml
//! - macOS: ~/Library/Application Support/contrast_suggest/config.toml

use crate::color::adjust::{Adjuster, AdjustmentStep, DEFAULT_MAX_ITERATIONS};
use crate::color::contrast::{validate_ratio, DEFAULT_DESIRED_RATIO};
use crate::color::similarity::{
    Classifier, SimilarityMetric, DEFAULT_LAB_THRESHOLD, DEFAULT_RGB_THRESHOLD,
};
use crate::suggest::SuggestOptions;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Application name used for config directory
const APP_NAME: &str = "contrast_suggest";

/// Default config file name
const CONFIG_FILE_NAME: &str = "config.toml";

/// Config files checked in the current directory before the standard location
const LOCAL_CONFIG_FILES: [&str; 2] = ["./config.toml", "./contrast_suggest.toml"];

/// Get the standard configuration directory for the application.
pub fn get_config_dir() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join(APP_NAME))
}

/// Get the standard configuration file path.
pub fn get_config_path() -> Option<PathBuf> {
    get_config_dir().map(|dir| dir.join(CONFIG_FILE_NAME))
}

/// Ensure the configuration directory exists.
///
/// Creates the directory and all parent directories if they don't exist.
pub fn ensure_config_dir() -> Result<PathBuf, ConfigError> {
    let config_dir = get_config_dir().ok_or(ConfigError::ConfigDirNotFound)?;

    if !config_dir.exists() {
        fs::create_dir_all(&config_dir)
            .map_err(|e| ConfigError::WriteError(config_dir.clone(), e.to_string()))?;
    }

    Ok(config_dir)
}

/// Initialize the configuration file if it doesn't exist.
///
/// Creates the config directory and writes the default config template.
/// Returns the path to the config file.
pub fn init_config() -> Result<PathBuf, ConfigError> {
    let config_dir = ensure_config_dir()?;
    let config_path = config_dir.join(CONFIG_FILE_NAME);

    if !config_path.exists() {
        write_default_config(&config_path)?;
    }

    Ok(config_path)
}

/// Write the commented default config template to `path`, replacing any
/// existing file.
pub fn write_default_config(path: &Path) -> Result<(), ConfigError> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .map_err(|e| ConfigError::WriteError(parent.to_path_buf(), e.to_string()))?;
    }
    fs::write(path, Config::generate_default_config())
        .map_err(|e| ConfigError::WriteError(path.to_path_buf(), e.to_string()))
}

/// Open the configuration file in the default application.
pub fn open_config_in_editor() -> Result<PathBuf, ConfigError> {
    let config_path = init_config()?;

    #[cfg(target_os = "windows")]
    {
        std::process::Command::new("cmd")
            .args(["/C", "start", "", config_path.to_str().unwrap_or("")])
            .spawn()
            .map_err(|e| ConfigError::OpenError(config_path.clone(), e.to_string()))?;
    }

    #[cfg(target_os = "macos")]
    {
        std::process::Command::new("open")
            .arg(&config_path)
            .spawn()
            .map_err(|e| ConfigError::OpenError(config_path.clone(), e.to_string()))?;
    }

    #[cfg(target_os = "linux")]
    {
        std::process::Command::new("xdg-open")
            .arg(&config_path)
            .spawn()
            .map_err(|e| ConfigError::OpenError(config_path.clone(), e.to_string()))?;
    }

    Ok(config_path)
}

/// Main configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    /// Contrast target, similarity and adjustment settings
    pub analysis: AnalysisConfig,

    /// Dominant color extraction settings
    pub image: ImageConfig,

    /// Directory batch settings
    pub batch: BatchConfig,

    /// Logging settings
    pub logging: LoggingConfig,
}

/// Analysis settings
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct AnalysisConfig {
    /// Contrast ratio suggestions must reach (4.5 = WCAG AA normal text)
    pub desired_ratio: f64,

    /// Similarity metric: "rgb" or "lab"
    pub metric: SimilarityMetric,

    /// Same-group threshold for the rgb metric
    pub rgb_threshold: f64,

    /// Same-group threshold for the lab metric (delta-E)
    pub lab_threshold: f64,

    /// Fraction of the channel range the text color moves per iteration
    pub foreground_step: f64,

    /// Fraction of the channel range the background moves per iteration
    pub background_step: f64,

    /// Hard cap on adjustment iterations
    pub max_iterations: usize,
}

/// Dominant color extraction settings
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ImageConfig {
    /// Images are shrunk so neither side exceeds this many pixels
    pub max_dimension: u32,

    /// Maximum 2-means refinement passes
    pub kmeans_iterations: usize,
}

/// Batch settings
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct BatchConfig {
    /// Descend into subdirectories
    pub recursive: bool,

    /// Follow symbolic links while walking
    pub follow_symlinks: bool,

    /// Worker threads (0 = one per CPU)
    pub threads: usize,
}

/// Logging settings
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level: error, warn, info, debug, trace
    pub level: String,

    /// Also write log lines to `log_file`
    pub log_to_file: bool,

    /// Log file path
    pub log_file: PathBuf,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            desired_ratio: DEFAULT_DESIRED_RATIO,
            metric: SimilarityMetric::Rgb,
            rgb_threshold: DEFAULT_RGB_THRESHOLD,
            lab_threshold: DEFAULT_LAB_THRESHOLD,
            foreground_step: AdjustmentStep::FOREGROUND.fraction(),
            background_step: AdjustmentStep::BACKGROUND.fraction(),
            max_iterations: DEFAULT_MAX_ITERATIONS,
        }
    }
}

impl Default for ImageConfig {
    fn default() -> Self {
        Self {
            max_dimension: 256,
            kmeans_iterations: 20,
        }
    }
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self {
            recursive: true,
            follow_symlinks: false,
            threads: 0,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            log_to_file: false,
            log_file: PathBuf::from("contrast_suggest.log"),
        }
    }
}

impl AnalysisConfig {
    /// Threshold that applies to the configured metric
    pub fn threshold(&self) -> f64 {
        match self.metric {
            SimilarityMetric::Rgb => self.rgb_threshold,
            SimilarityMetric::Lab => self.lab_threshold,
        }
    }

    /// Build validated pipeline options from these settings
    pub fn to_options(&self) -> Result<SuggestOptions, ConfigError> {
        let invalid = |e: crate::core::error::ContrastError| ConfigError::InvalidValue(e.to_string());

        let desired_ratio = validate_ratio(self.desired_ratio).map_err(invalid)?;
        let foreground_step = AdjustmentStep::new(self.foreground_step).map_err(invalid)?;
        let background_step = AdjustmentStep::new(self.background_step).map_err(invalid)?;

        let threshold = self.threshold();
        if !threshold.is_finite() || threshold < 0.0 {
            return Err(ConfigError::InvalidValue(format!(
                "Similarity threshold must be a non-negative number, got {}",
                threshold
            )));
        }
        if self.max_iterations == 0 {
            return Err(ConfigError::InvalidValue(
                "max_iterations must be at least 1".to_string(),
            ));
        }

        Ok(SuggestOptions {
            desired_ratio,
            classifier: Classifier::new(self.metric, threshold),
            adjuster: Adjuster::new()
                .with_foreground_step(foreground_step)
                .with_background_step(background_step)
                .with_max_iterations(self.max_iterations),
        })
    }
}

impl Config {
    /// Check every value the pipeline depends on.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.analysis.to_options()?;
        if self.image.max_dimension == 0 {
            return Err(ConfigError::InvalidValue(
                "image.max_dimension must be at least 1".to_string(),
            ));
        }
        Ok(())
    }

    /// Load configuration from a TOML file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();

        if !path.exists() {
            return Err(ConfigError::FileNotFound(path.to_path_buf()));
        }

        let content = fs::read_to_string(path)
            .map_err(|e| ConfigError::ReadError(path.to_path_buf(), e.to_string()))?;

        let config: Config = toml::from_str(&content)
            .map_err(|e| ConfigError::ParseError(path.to_path_buf(), e.to_string()))?;

        config.validate()?;
        Ok(config)
    }

    /// Load configuration from default locations
    ///
    /// Search order:
    /// 1. ./config.toml
    /// 2. ./contrast_suggest.toml
    /// 3. The standard config location
    ///
    /// If no config file is found, returns default configuration.
    pub fn load_default() -> Result<Self, ConfigError> {
        for path in LOCAL_CONFIG_FILES.iter().map(PathBuf::from) {
            if path.exists() {
                return Self::load(&path);
            }
        }

        if let Some(config_path) = get_config_path() {
            if config_path.exists() {
                return Self::load(&config_path);
            }
        }

        Ok(Self::default())
    }

    /// Get the path where the config file is (or would be) located.
    ///
    /// Returns the first existing config file path, or the standard location if none exists.
    pub fn get_active_config_path() -> PathBuf {
        for path in LOCAL_CONFIG_FILES.iter().map(PathBuf::from) {
            if path.exists() {
                return path;
            }
        }

        get_config_path().unwrap_or_else(|| PathBuf::from(LOCAL_CONFIG_FILES[0]))
    }

    /// Save configuration to a TOML file
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<(), ConfigError> {
        let content =
            toml::to_string_pretty(self).map_err(|e| ConfigError::SerializeError(e.to_string()))?;

        fs::write(path.as_ref(), content)
            .map_err(|e| ConfigError::WriteError(path.as_ref().to_path_buf(), e.to_string()))?;

        Ok(())
    }

    /// Generate a default config file with comments
    pub fn generate_default_config() -> String {
        include_str!("../../config.example.toml").to_string()
    }
}

/// Configuration error types
#[derive(Debug)]
pub enum ConfigError {
    /// Configuration file was not found at the specified path
    FileNotFound(PathBuf),
    /// Failed to read the configuration file
    ReadError(PathBuf, String),
    /// Failed to parse the configuration file (invalid TOML)
    ParseError(PathBuf, String),
    /// A value parsed but is out of range
    InvalidValue(String),
    /// Failed to serialize configuration to TOML
    SerializeError(String),
    /// Failed to write configuration file
    WriteError(PathBuf, String),
    /// Could not determine config directory
    ConfigDirNotFound,
    /// Failed to open config file in editor
    OpenError(PathBuf, String),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::FileNotFound(path) => {
                write!(f, "Configuration file not found: {}", path.display())
            }
            ConfigError::ReadError(path, err) => {
                write!(
                    f,
                    "Failed to read config file '{}': {}",
                    path.display(),
                    err
                )
            }
            ConfigError::ParseError(path, err) => {
                write!(
                    f,
                    "Failed to parse config file '{}': {}",
                    path.display(),
                    err
                )
            }
            ConfigError::InvalidValue(err) => {
                write!(f, "Invalid configuration value: {}", err)
            }
            ConfigError::SerializeError(err) => {
                write!(f, "Failed to serialize configuration: {}", err)
            }
            ConfigError::WriteError(path, err) => {
                write!(
                    f,
                    "Failed to write config file '{}': {}",
                    path.display(),
                    err
                )
            }
            ConfigError::ConfigDirNotFound => {
                write!(f, "Could not determine configuration directory")
            }
            ConfigError::OpenError(path, err) => {
                write!(
                    f,
                    "Failed to open config file '{}': {}",
                    path.display(),
                    err
                )
            }
        }
    }
}

impl std::error::Error for ConfigError {}
