//! Suggestion pipeline
//!
//! Turns a background/text color pair into a [`SuggestionResult`]: first try
//! to fix the text color, and only if the fixed text color lands in a
//! different color group, try the background instead.
//!
//! # Submodules
//!
//! - `orchestrator` - The state machine that drives one analysis run
//! - `result` - The immutable result record and its text rendering

pub mod orchestrator;
pub mod result;

pub use orchestrator::{suggest, SuggestionOrchestrator};
pub use result::SuggestionResult;

use crate::color::adjust::Adjuster;
use crate::color::contrast::{validate_ratio, DEFAULT_DESIRED_RATIO};
use crate::color::similarity::Classifier;
use crate::core::error::Result;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Terminal state of an analysis run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Outcome {
    /// The original pair already meets the desired ratio
    NoSuggestionNeeded,
    /// A text color in the same color group meets the ratio
    ForegroundSuggested,
    /// The text fix changed color group and the background needed no change
    NoBackgroundSuggestionNeeded,
    /// A background color meets the ratio (in either color group)
    BackgroundSuggested,
    /// Neither color could be moved far enough to meet the ratio
    TargetUnreachable,
}

impl Outcome {
    pub fn description(self) -> &'static str {
        match self {
            Outcome::NoSuggestionNeeded => "no suggestion needed",
            Outcome::ForegroundSuggested => "text color suggested",
            Outcome::NoBackgroundSuggestionNeeded => "no background suggestion needed",
            Outcome::BackgroundSuggested => "background color suggested",
            Outcome::TargetUnreachable => "suggestion unavailable",
        }
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.description())
    }
}

/// Parameters of one analysis run
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SuggestOptions {
    /// Contrast ratio the suggestion must reach
    pub desired_ratio: f64,
    /// How "same color group" is decided
    pub classifier: Classifier,
    /// Step sizes and iteration cap for the adjustment loops
    pub adjuster: Adjuster,
}

impl Default for SuggestOptions {
    fn default() -> Self {
        Self {
            desired_ratio: DEFAULT_DESIRED_RATIO,
            classifier: Classifier::default(),
            adjuster: Adjuster::default(),
        }
    }
}

impl SuggestOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_desired_ratio(mut self, ratio: f64) -> Self {
        self.desired_ratio = ratio;
        self
    }

    pub fn with_classifier(mut self, classifier: Classifier) -> Self {
        self.classifier = classifier;
        self
    }

    pub fn with_adjuster(mut self, adjuster: Adjuster) -> Self {
        self.adjuster = adjuster;
        self
    }

    /// Reject a desired ratio outside [1, 21].
    pub fn validate(&self) -> Result<()> {
        validate_ratio(self.desired_ratio).map(|_| ())
    }
}
