//! Analysis observers
//!
//! The color math never prints anything itself. Callers that want to see
//! what an analysis run is doing pass an [`AnalysisObserver`], which is told
//! about every computed ratio, every adjustment iteration, every similarity
//! verdict and the final outcome. Observers are purely diagnostic: a run
//! produces the same result whichever observer is attached.

use crate::color::contrast::ContrastRatio;
use crate::color::similarity::Comparison;
use crate::color::space::Rgb;
use crate::suggest::Outcome;
use log::{debug, info, trace};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Which of the two colors a checkpoint is about
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColorRole {
    Text,
    Background,
}

impl fmt::Display for ColorRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ColorRole::Text => write!(f, "text"),
            ColorRole::Background => write!(f, "background"),
        }
    }
}

/// Receives checkpoints from an analysis run.
///
/// Every method has an empty default, so implementors only override the
/// checkpoints they care about.
pub trait AnalysisObserver: Send + Sync {
    /// A contrast ratio was computed for a text/background pair
    fn ratio_computed(&self, _text: Rgb, _background: Rgb, _ratio: ContrastRatio) {}

    /// One iteration of the adjustment loop produced `color`
    fn adjustment_step(&self, _role: ColorRole, _iteration: usize, _color: Rgb, _ratio: ContrastRatio) {}

    /// The similarity classifier compared an original and an adjusted color
    fn verdict_reached(&self, _role: ColorRole, _original: Rgb, _adjusted: Rgb, _comparison: Comparison) {}

    /// The run reached its terminal state
    fn outcome_reached(&self, _outcome: Outcome) {}
}

/// Observer that ignores every checkpoint
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopObserver;

impl AnalysisObserver for NoopObserver {}

/// Observer that forwards checkpoints to the `log` crate
///
/// Ratios and verdicts are logged at debug level, individual iterations at
/// trace level and the outcome at info level.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogObserver;

impl AnalysisObserver for LogObserver {
    fn ratio_computed(&self, text: Rgb, background: Rgb, ratio: ContrastRatio) {
        debug!("Contrast {} on {}: {}", text, background, ratio);
    }

    fn adjustment_step(&self, role: ColorRole, iteration: usize, color: Rgb, ratio: ContrastRatio) {
        trace!("Adjusting {} #{}: {} ({})", role, iteration, color, ratio);
    }

    fn verdict_reached(&self, role: ColorRole, original: Rgb, adjusted: Rgb, comparison: Comparison) {
        debug!(
            "Color distance for {} {} -> {}: {:.2} ({})",
            role, original, adjusted, comparison.distance, comparison.verdict
        );
    }

    fn outcome_reached(&self, outcome: Outcome) {
        info!("Analysis finished: {}", outcome);
    }
}

#[cfg(test)]
pub(crate) mod testing {
    //! Recording observer shared by the unit tests of several modules

    use super::*;
    use std::sync::Mutex;

    #[derive(Debug, Default)]
    pub struct RecordingObserver {
        pub ratios: Mutex<Vec<f64>>,
        pub steps: Mutex<Vec<(ColorRole, usize, Rgb, f64)>>,
        pub verdicts: Mutex<Vec<(ColorRole, Comparison)>>,
        pub outcomes: Mutex<Vec<Outcome>>,
    }

    impl AnalysisObserver for RecordingObserver {
        fn ratio_computed(&self, _text: Rgb, _background: Rgb, ratio: ContrastRatio) {
            self.ratios.lock().unwrap().push(ratio.value());
        }

        fn adjustment_step(&self, role: ColorRole, iteration: usize, color: Rgb, ratio: ContrastRatio) {
            self.steps
                .lock()
                .unwrap()
                .push((role, iteration, color, ratio.value()));
        }

        fn verdict_reached(&self, role: ColorRole, _original: Rgb, _adjusted: Rgb, comparison: Comparison) {
            self.verdicts.lock().unwrap().push((role, comparison));
        }

        fn outcome_reached(&self, outcome: Outcome) {
            self.outcomes.lock().unwrap().push(outcome);
        }
    }
}
