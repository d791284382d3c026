//! Analysis run state machine
//!
//! ```text
//! Start ──ratio met──────────────────────────────► NoSuggestionNeeded
//!   │
//!   ▼
//! AdjustForeground ──unchanged───────────────────► NoSuggestionNeeded
//!   │        └──same group───────────────────────► ForegroundSuggested
//!   │ different group / unreachable
//!   ▼
//! AdjustBackground ──unchanged───────────────────► NoBackgroundSuggestionNeeded
//!            ├──adjusted (either verdict)────────► BackgroundSuggested
//!            └──unreachable──────────────────────► TargetUnreachable
//! ```
//!
//! Every terminal state yields a [`SuggestionResult`]. The only retry lives
//! inside the background adjuster, which darkens a background that cannot
//! get any lighter.

use super::{Outcome, SuggestOptions, SuggestionResult};
use crate::color::space::{hex_to_rgb, Rgb};
use crate::core::error::{ContrastError, Result};
use crate::core::observer::{AnalysisObserver, ColorRole, NoopObserver};
use log::{debug, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Stage {
    Start,
    AdjustForeground,
    AdjustBackground,
    Done(Outcome),
}

/// Runs the suggestion pipeline for color pairs
pub struct SuggestionOrchestrator<'a> {
    options: SuggestOptions,
    observer: &'a dyn AnalysisObserver,
}

impl SuggestionOrchestrator<'static> {
    /// Orchestrator without diagnostics
    pub fn new(options: SuggestOptions) -> Self {
        Self {
            options,
            observer: &NoopObserver,
        }
    }
}

impl<'a> SuggestionOrchestrator<'a> {
    pub fn with_observer(options: SuggestOptions, observer: &'a dyn AnalysisObserver) -> Self {
        Self { options, observer }
    }

    pub fn options(&self) -> &SuggestOptions {
        &self.options
    }

    /// Parse both hex strings, then [`run`](Self::run).
    pub fn run_hex(&self, background: &str, text: &str) -> Result<SuggestionResult> {
        let background = hex_to_rgb(background)?;
        let text = hex_to_rgb(text)?;
        self.run(background, text)
    }

    /// Analyze one background/text pair.
    ///
    /// Fails only on invalid options; an unreachable target is reported
    /// through [`Outcome::TargetUnreachable`].
    pub fn run(&self, background: Rgb, text: Rgb) -> Result<SuggestionResult> {
        self.options.validate()?;

        let mut result = SuggestionResult::unsuggested(background, text, self.options.desired_ratio);
        self.observer
            .ratio_computed(text, background, result.original_ratio);

        let mut stage = Stage::Start;
        let outcome = loop {
            debug!("Stage {:?} for {} on {}", stage, text, background);
            stage = match stage {
                Stage::Start => {
                    if result.is_compliant() {
                        Stage::Done(Outcome::NoSuggestionNeeded)
                    } else {
                        Stage::AdjustForeground
                    }
                }
                Stage::AdjustForeground => self.adjust_foreground(&mut result)?,
                Stage::AdjustBackground => self.adjust_background(&mut result)?,
                Stage::Done(outcome) => break outcome,
            };
        };

        result.outcome = outcome;
        self.observer.outcome_reached(outcome);
        Ok(result)
    }

    fn adjust_foreground(&self, result: &mut SuggestionResult) -> Result<Stage> {
        let text = result.original_text;
        let background = result.original_background;

        let adjusted = match self.options.adjuster.increase_foreground_contrast(
            background,
            text,
            self.options.desired_ratio,
            self.observer,
        ) {
            Ok(adjusted) => adjusted,
            Err(err @ ContrastError::UnreachableContrastTarget { .. }) => {
                warn!("No text color for {} reaches the target: {}", background, err);
                result.text_suggestion_needed = true;
                return Ok(Stage::AdjustBackground);
            }
            Err(err) => return Err(err),
        };

        if adjusted == text {
            return Ok(Stage::Done(Outcome::NoSuggestionNeeded));
        }

        let comparison = self.options.classifier.compare(text, adjusted);
        self.observer
            .verdict_reached(ColorRole::Text, text, adjusted, comparison);
        result.record_text(adjusted, comparison);

        if comparison.verdict.is_same() {
            Ok(Stage::Done(Outcome::ForegroundSuggested))
        } else {
            Ok(Stage::AdjustBackground)
        }
    }

    fn adjust_background(&self, result: &mut SuggestionResult) -> Result<Stage> {
        let text = result.original_text;
        let background = result.original_background;

        let adjusted = match self.options.adjuster.increase_background_contrast(
            background,
            text,
            self.options.desired_ratio,
            self.observer,
        ) {
            Ok(adjusted) => adjusted,
            Err(err @ ContrastError::UnreachableContrastTarget { .. }) => {
                warn!("No background color for {} reaches the target: {}", text, err);
                return Ok(Stage::Done(Outcome::TargetUnreachable));
            }
            Err(err) => return Err(err),
        };

        if adjusted == background {
            return Ok(Stage::Done(Outcome::NoBackgroundSuggestionNeeded));
        }

        let comparison = self.options.classifier.compare(background, adjusted);
        self.observer
            .verdict_reached(ColorRole::Background, background, adjusted, comparison);
        result.record_background(adjusted, comparison);

        Ok(Stage::Done(Outcome::BackgroundSuggested))
    }
}

/// Analyze one hex color pair with `options` and no diagnostics.
pub fn suggest(background: &str, text: &str, options: &SuggestOptions) -> Result<SuggestionResult> {
    SuggestionOrchestrator::new(*options).run_hex(background, text)
}
