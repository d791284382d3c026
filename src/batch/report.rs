//! Batch report types
//!
//! A [`BatchReport`] holds one [`BatchEntry`] per image in walk order plus a
//! [`BatchSummary`] of how the runs ended. It is written as pretty JSON.

use crate::core::error::{ContrastError, Result};
use crate::imaging::ImageColors;
use crate::suggest::{Outcome, SuggestOptions, SuggestionResult};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};

/// Analysis of a single image
#[derive(Debug, Clone, Serialize)]
pub struct BatchEntry {
    pub path: PathBuf,
    /// Extracted background and text colors
    pub colors: Option<ImageColors>,
    pub result: Option<SuggestionResult>,
    /// Why the image could not be analyzed
    pub error: Option<String>,
}

impl BatchEntry {
    pub fn analyzed(colors: ImageColors, result: SuggestionResult) -> Self {
        Self {
            path: colors.path.clone(),
            colors: Some(colors),
            result: Some(result),
            error: None,
        }
    }

    pub fn failed(path: &Path, error: &ContrastError) -> Self {
        Self {
            path: path.to_path_buf(),
            colors: None,
            result: None,
            error: Some(error.to_string()),
        }
    }

    pub fn outcome(&self) -> Option<Outcome> {
        self.result.as_ref().map(|r| r.outcome)
    }
}

/// Counts over all entries of a batch
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct BatchSummary {
    pub total: usize,
    pub failed: usize,
    pub no_suggestion_needed: usize,
    pub foreground_suggested: usize,
    pub no_background_suggestion_needed: usize,
    pub background_suggested: usize,
    pub target_unreachable: usize,
}

impl BatchSummary {
    pub fn from_entries(entries: &[BatchEntry]) -> Self {
        let mut summary = Self {
            total: entries.len(),
            ..Self::default()
        };

        for entry in entries {
            match entry.outcome() {
                None => summary.failed += 1,
                Some(Outcome::NoSuggestionNeeded) => summary.no_suggestion_needed += 1,
                Some(Outcome::ForegroundSuggested) => summary.foreground_suggested += 1,
                Some(Outcome::NoBackgroundSuggestionNeeded) => {
                    summary.no_background_suggestion_needed += 1
                }
                Some(Outcome::BackgroundSuggested) => summary.background_suggested += 1,
                Some(Outcome::TargetUnreachable) => summary.target_unreachable += 1,
            }
        }

        summary
    }

    /// Images whose original colors already met the ratio
    pub fn compliant(&self) -> usize {
        self.no_suggestion_needed
    }

    pub fn analyzed(&self) -> usize {
        self.total - self.failed
    }
}

/// Everything one batch run produced
#[derive(Debug, Clone, Serialize)]
pub struct BatchReport {
    pub generated_at: DateTime<Utc>,
    pub root: PathBuf,
    pub options: SuggestOptions,
    pub summary: BatchSummary,
    pub entries: Vec<BatchEntry>,
}

impl BatchReport {
    pub fn new(root: &Path, options: SuggestOptions, entries: Vec<BatchEntry>) -> Self {
        Self {
            generated_at: Utc::now(),
            root: root.to_path_buf(),
            options,
            summary: BatchSummary::from_entries(&entries),
            entries,
        }
    }

    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string_pretty(self)
            .map_err(|e| ContrastError::IoError(format!("Failed to serialize report: {}", e)))
    }

    /// Write the report as pretty JSON, creating parent directories.
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, self.to_json()?)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::space::Rgb;
    use crate::imaging::DominantColor;
    use crate::suggest::SuggestionOrchestrator;
    use tempfile::TempDir;

    fn entry(path: &str, background: &str, text: &str) -> BatchEntry {
        let background: Rgb = background.parse().unwrap();
        let text: Rgb = text.parse().unwrap();
        let colors = ImageColors {
            path: PathBuf::from(path),
            background: DominantColor {
                color: background,
                share: 0.75,
            },
            text: DominantColor {
                color: text,
                share: 0.25,
            },
            recognized_text: None,
        };
        let result = SuggestionOrchestrator::new(SuggestOptions::default())
            .run(background, text)
            .unwrap();
        BatchEntry::analyzed(colors, result)
    }

    #[test]
    fn test_summary_counts_outcomes() {
        let entries = vec![
            entry("a.png", "#ffffff", "#000000"),
            entry("b.png", "#ffffff", "#777777"),
            entry("c.png", "#ffffff", "#cccccc"),
            BatchEntry::failed(Path::new("d.png"), &ContrastError::NotEnoughColors(1)),
        ];
        let summary = BatchSummary::from_entries(&entries);

        assert_eq!(summary.total, 4);
        assert_eq!(summary.failed, 1);
        assert_eq!(summary.analyzed(), 3);
        assert_eq!(summary.compliant(), 1);
        assert_eq!(summary.foreground_suggested, 1);
        // Gray text on white ends with a darker background
        assert_eq!(summary.background_suggested, 1);
        assert_eq!(summary.target_unreachable, 0);
    }

    #[test]
    fn test_failed_entry_keeps_message() {
        let entry = BatchEntry::failed(Path::new("x.png"), &ContrastError::NotEnoughColors(0));
        assert_eq!(entry.outcome(), None);
        assert!(entry.error.unwrap().contains('0'));
    }

    #[test]
    fn test_report_save_writes_json() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("out").join("report.json");

        let report = BatchReport::new(
            temp_dir.path(),
            SuggestOptions::default(),
            vec![entry("a.png", "#ffffff", "#777777")],
        );
        report.save(&path).unwrap();

        let json: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(json["summary"]["total"], 1);
        assert_eq!(json["summary"]["foreground_suggested"], 1);
        assert_eq!(json["entries"][0]["result"]["suggested_text"], "#747474");
        assert_eq!(json["entries"][0]["colors"]["background"]["color"], "#ffffff");
        assert!(json["generated_at"].is_string());
        assert_eq!(json["options"]["desired_ratio"], 4.5);
    }
}
