//! Progress bar utilities for CLI output
//!
//! This module provides the batch progress bar, console output helpers and
//! the writer used to log to a file and the console at once.

use crate::batch::BatchProgress;
use indicatif::{ProgressBar, ProgressStyle};
use std::io::Write;
use std::time::{Duration, Instant};

// ============================================================================
// Styles - Consistent visual appearance
// ============================================================================

/// Get the progress bar style for batch analysis
fn progress_bar_style() -> ProgressStyle {
    ProgressStyle::default_bar()
        .template("  {spinner:.green} [{bar:40.cyan/dim}] {pos}/{len} ({percent}%) {msg}")
        .unwrap()
        .progress_chars("━━╾─")
}

/// Get the style for completed progress bars
fn completed_style() -> ProgressStyle {
    ProgressStyle::default_bar()
        .template("  ✓ [{bar:40.green/dim}] {pos}/{len} ({percent}%) {msg}")
        .unwrap()
        .progress_chars("━━━")
}

// ============================================================================
// Console output helpers
// ============================================================================

/// Print a header section with a box
pub fn print_header(title: &str) {
    let width = 68;
    let title_padded = format!("{:^width$}", title, width = width - 4);
    println!();
    println!("╔{}╗", "═".repeat(width - 2));
    println!("║{}║", title_padded);
    println!("╚{}╝", "═".repeat(width - 2));
    println!();
}

/// Print a success message with checkmark
pub fn print_success(msg: &str) {
    println!("  ✓ {}", msg);
}

/// Print an info message with bullet
pub fn print_info(msg: &str) {
    println!("  • {}", msg);
}

/// Print a warning message
pub fn print_warning(msg: &str) {
    println!("  ⚠ {}", msg);
}

/// Print an error message
pub fn print_error(msg: &str) {
    println!("  ✗ {}", msg);
}

/// Pass/fail marker for tables
pub fn mark(passed: bool) -> &'static str {
    if passed {
        "✓"
    } else {
        "✗"
    }
}

// ============================================================================
// Batch progress tracker
// ============================================================================

/// Progress bar for a batch run
///
/// The image count is only known once the directory has been walked, so the
/// bar length is taken from each progress update.
pub struct AnalysisProgress {
    progress_bar: ProgressBar,
    start_time: Instant,
}

impl AnalysisProgress {
    /// Create a new batch progress tracker
    pub fn new() -> Self {
        let progress_bar = ProgressBar::new(0);
        progress_bar.set_style(progress_bar_style());
        progress_bar.enable_steady_tick(Duration::from_millis(100));
        progress_bar.set_message("Scanning...");

        Self {
            progress_bar,
            start_time: Instant::now(),
        }
    }

    /// Apply a progress update from the batch runner
    pub fn update(&self, progress: &BatchProgress) {
        self.progress_bar.set_length(progress.total as u64);
        self.progress_bar.set_position(progress.current as u64);

        let name = progress
            .current_file
            .as_ref()
            .and_then(|p| p.file_name())
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        if progress.errors > 0 {
            self.progress_bar
                .set_message(format!("{} ({} failed)", name, progress.errors));
        } else {
            self.progress_bar.set_message(name);
        }
    }

    /// Log a warning message while suspending the progress display
    pub fn log_warning(&self, msg: &str) {
        self.progress_bar.suspend(|| {
            println!("  ⚠ {}", msg);
        });
    }

    /// Finish the progress display
    pub fn finish(&self) {
        self.progress_bar.set_style(completed_style());
        self.progress_bar.finish_with_message(format!(
            "Complete in {}",
            format_duration(self.start_time.elapsed())
        ));
    }

    /// Finish with an error
    pub fn finish_with_error(&self, msg: &str) {
        self.progress_bar.abandon_with_message(format!("✗ {}", msg));
    }
}

impl Default for AnalysisProgress {
    fn default() -> Self {
        Self::new()
    }
}

// ============================================================================
// Utility functions
// ============================================================================

/// Format duration as human-readable string
pub fn format_duration(duration: Duration) -> String {
    let secs = duration.as_secs();
    if secs >= 3600 {
        let hours = secs / 3600;
        let mins = (secs % 3600) / 60;
        format!("{}h {}m", hours, mins)
    } else if secs >= 60 {
        let mins = secs / 60;
        let secs = secs % 60;
        format!("{}m {}s", mins, secs)
    } else {
        format!("{:.1}s", duration.as_secs_f64())
    }
}

/// Format a pixel share in [0, 1] as a percentage
pub fn format_share(share: f64) -> String {
    format!("{:.1}%", share * 100.0)
}

// ============================================================================
// Dual writer for file + console logging
// ============================================================================

/// A writer that writes to both console and file
///
/// Used for logging to both stderr and a log file simultaneously.
pub struct DualWriter {
    pub console: std::io::Stderr,
    pub file: std::fs::File,
}

impl Write for DualWriter {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        let _ = self.console.write(buf);
        self.file.write(buf)
    }

    fn flush(&mut self) -> std::io::Result<()> {
        let _ = self.console.flush();
        self.file.flush()
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_format_duration() {
        assert_eq!(format_duration(Duration::from_secs(30)), "30.0s");
        assert_eq!(format_duration(Duration::from_secs(90)), "1m 30s");
        assert_eq!(format_duration(Duration::from_secs(3661)), "1h 1m");
    }

    #[test]
    fn test_format_share() {
        assert_eq!(format_share(0.75), "75.0%");
        assert_eq!(format_share(1.0), "100.0%");
    }

    #[test]
    fn test_mark() {
        assert_eq!(mark(true), "✓");
        assert_eq!(mark(false), "✗");
    }

    #[test]
    fn test_analysis_progress_tracks_updates() {
        let progress = AnalysisProgress::new();
        progress.update(&BatchProgress {
            current: 2,
            total: 5,
            current_file: Some(PathBuf::from("shots/login.png")),
            errors: 1,
        });
        assert_eq!(progress.progress_bar.length(), Some(5));
        assert_eq!(progress.progress_bar.position(), 2);
        assert_eq!(progress.progress_bar.message(), "login.png (1 failed)");
        progress.finish();
    }

    #[test]
    fn test_dual_writer_writes_file() {
        let temp_dir = tempfile::TempDir::new().unwrap();
        let path = temp_dir.path().join("log.txt");
        let mut writer = DualWriter {
            console: std::io::stderr(),
            file: std::fs::File::create(&path).unwrap(),
        };
        writer.write_all(b"hello\n").unwrap();
        writer.flush().unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "hello\n");
    }
}
