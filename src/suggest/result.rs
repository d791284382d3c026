//! Suggestion result record
//!
//! A [`SuggestionResult`] is produced once per analysis run and never changed
//! afterwards. It serializes to JSON with serde and renders as plain report
//! lines through `Display`.

use super::Outcome;
use crate::color::contrast::{contrast_ratio, ContrastRatio};
use crate::color::similarity::{Comparison, SimilarityVerdict};
use crate::color::space::Rgb;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Outcome of one analysis run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SuggestionResult {
    pub original_text: Rgb,
    pub original_background: Rgb,
    /// Ratio the run was asked to reach
    pub desired_ratio: f64,
    /// Ratio of the original pair
    pub original_ratio: ContrastRatio,
    pub outcome: Outcome,

    /// Whether the original pair needed a different text color
    pub text_suggestion_needed: bool,
    /// Adjusted text color, when one meeting the ratio was found
    pub suggested_text: Option<Rgb>,
    /// Ratio of the suggested text against the original background
    pub suggested_text_ratio: Option<ContrastRatio>,
    pub text_verdict: Option<SimilarityVerdict>,
    /// Distance between original and suggested text under the run's metric
    pub text_distance: Option<f64>,

    /// Whether the run produced a different background color
    pub background_suggestion_needed: bool,
    /// Adjusted background color, when one meeting the ratio was found
    pub suggested_background: Option<Rgb>,
    /// Ratio of the suggested background against the original text
    pub suggested_background_ratio: Option<ContrastRatio>,
    pub background_verdict: Option<SimilarityVerdict>,
    pub background_distance: Option<f64>,
}

impl SuggestionResult {
    /// Starting point for a run: nothing suggested yet.
    pub(crate) fn unsuggested(background: Rgb, text: Rgb, desired_ratio: f64) -> Self {
        Self {
            original_text: text,
            original_background: background,
            desired_ratio,
            original_ratio: contrast_ratio(text, background),
            outcome: Outcome::NoSuggestionNeeded,
            text_suggestion_needed: false,
            suggested_text: None,
            suggested_text_ratio: None,
            text_verdict: None,
            text_distance: None,
            background_suggestion_needed: false,
            suggested_background: None,
            suggested_background_ratio: None,
            background_verdict: None,
            background_distance: None,
        }
    }

    pub(crate) fn record_text(&mut self, suggested: Rgb, comparison: Comparison) {
        self.text_suggestion_needed = true;
        self.suggested_text = Some(suggested);
        self.suggested_text_ratio = Some(contrast_ratio(suggested, self.original_background));
        self.text_verdict = Some(comparison.verdict);
        self.text_distance = Some(comparison.distance);
    }

    pub(crate) fn record_background(&mut self, suggested: Rgb, comparison: Comparison) {
        self.background_suggestion_needed = true;
        self.suggested_background = Some(suggested);
        self.suggested_background_ratio = Some(contrast_ratio(self.original_text, suggested));
        self.background_verdict = Some(comparison.verdict);
        self.background_distance = Some(comparison.distance);
    }

    /// Whether the original pair already met the desired ratio
    pub fn is_compliant(&self) -> bool {
        self.original_ratio.meets(self.desired_ratio)
    }

    /// The color pair this run recommends using
    ///
    /// Same-group text wins, then any background suggestion, then a
    /// different-group text color. `None` when the run ends unreachable,
    /// even if a different-group text color was recorded along the way.
    pub fn recommended_pair(&self) -> Option<(Rgb, Rgb)> {
        match self.outcome {
            Outcome::NoSuggestionNeeded => Some((self.original_text, self.original_background)),
            Outcome::BackgroundSuggested => self
                .suggested_background
                .map(|bg| (self.original_text, bg)),
            Outcome::ForegroundSuggested | Outcome::NoBackgroundSuggestionNeeded => self
                .suggested_text
                .map(|text| (text, self.original_background)),
            Outcome::TargetUnreachable => None,
        }
    }
}

impl fmt::Display for SuggestionResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Original text color:       {}", self.original_text)?;
        writeln!(f, "Original background color: {}", self.original_background)?;
        writeln!(
            f,
            "Current contrast:          {} (target {:.2}:1)",
            self.original_ratio, self.desired_ratio
        )?;

        if !self.text_suggestion_needed {
            return write!(f, "No text suggestion required");
        }

        match (self.suggested_text, self.text_verdict) {
            (Some(text), Some(verdict)) => {
                writeln!(f, "Suggested text color:      {}", text)?;
                if let Some(ratio) = self.suggested_text_ratio {
                    writeln!(f, "  contrast:                {}", ratio)?;
                }
                writeln!(f, "  suggested text color is from the {}", verdict)?;
            }
            _ => writeln!(f, "Text color cannot reach the target contrast")?,
        }

        match self.outcome {
            Outcome::ForegroundSuggested => Ok(()),
            Outcome::NoBackgroundSuggestionNeeded => write!(f, "No background suggestion required"),
            Outcome::BackgroundSuggested => {
                if let Some(bg) = self.suggested_background {
                    writeln!(f, "Suggested background color: {}", bg)?;
                }
                if let Some(ratio) = self.suggested_background_ratio {
                    writeln!(f, "  contrast:                {}", ratio)?;
                }
                if let Some(verdict) = self.background_verdict {
                    write!(f, "  suggested background color is from the {}", verdict)?;
                }
                Ok(())
            }
            Outcome::TargetUnreachable => {
                write!(f, "Background color cannot reach the target contrast: suggestion unavailable")
            }
            Outcome::NoSuggestionNeeded => Ok(()),
        }
    }
}
