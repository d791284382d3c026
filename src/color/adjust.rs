//! Step-wise color adjustment toward a target contrast ratio
//!
//! One color is held fixed (the partner) while the other is moved a fixed
//! fraction of the channel range per iteration until the pair reaches the
//! desired ratio. The moving color always travels away from the partner's
//! luminance, so every iteration keeps or raises the ratio. The loop ends
//! with [`ContrastError::UnreachableContrastTarget`] when a step no longer
//! changes the color (every moving channel is clamped) or when the iteration
//! cap runs out.
//!
//! A background that cannot get any lighter (white under gray text) gets a
//! second pass that darkens it from its original value instead. That pass
//! crosses the text's luminance, so its ratio dips before it climbs.

use super::contrast::{contrast_ratio, validate_ratio, ContrastRatio};
use super::space::Rgb;
use crate::core::error::{ContrastError, Result};
use crate::core::observer::{AnalysisObserver, ColorRole, NoopObserver};
use log::debug;
use serde::{Deserialize, Serialize};

/// Default cap on adjustment iterations; a full sweep of one channel at the
/// smallest usable step takes 255 moves.
pub const DEFAULT_MAX_ITERATIONS: usize = 256;

/// Fraction of the 0-255 channel range applied per iteration
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize, Deserialize)]
#[serde(try_from = "f64", into = "f64")]
pub struct AdjustmentStep(f64);

impl AdjustmentStep {
    /// Step used for text colors
    pub const FOREGROUND: AdjustmentStep = AdjustmentStep(0.01);

    /// Step used for backgrounds; smaller so background changes stay subtle
    pub const BACKGROUND: AdjustmentStep = AdjustmentStep(0.009);

    /// Create a step, rejecting fractions outside (0, 1) and fractions that
    /// would round to no movement at all.
    ///
    /// Exactly half a channel unit is rejected too: `204 - 0.5` rounds back
    /// up to 204, so darkening would never move.
    pub fn new(fraction: f64) -> Result<Self> {
        if fraction.is_finite() && fraction > 0.0 && fraction < 1.0 && fraction * 255.0 > 0.5 {
            Ok(Self(fraction))
        } else {
            Err(ContrastError::InvalidAdjustmentStep(fraction))
        }
    }

    pub fn fraction(self) -> f64 {
        self.0
    }

    /// Step size in channel units (0-255)
    pub fn channel_delta(self) -> f64 {
        self.0 * 255.0
    }
}

impl TryFrom<f64> for AdjustmentStep {
    type Error = ContrastError;

    fn try_from(value: f64) -> Result<Self> {
        Self::new(value)
    }
}

impl From<AdjustmentStep> for f64 {
    fn from(step: AdjustmentStep) -> Self {
        step.0
    }
}

/// Which way a color moves on each iteration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    /// Every channel moves toward 255
    Lighten,
    /// Every channel moves toward 0
    Darken,
}

impl Direction {
    /// Direction that moves `color` away from `partner` in luminance.
    ///
    /// When both have the same luminance the color heads for whichever
    /// extreme contrasts more with the partner.
    pub fn away_from(color: Rgb, partner: Rgb) -> Self {
        let lc = color.luminance();
        let lp = partner.luminance();
        if lc < lp {
            Direction::Darken
        } else if lc > lp {
            Direction::Lighten
        } else if contrast_ratio(partner, Rgb::BLACK) >= contrast_ratio(partner, Rgb::WHITE) {
            Direction::Darken
        } else {
            Direction::Lighten
        }
    }

    /// Move every channel one step, clamped to [0, 255] and rounded.
    pub fn apply(self, color: Rgb, step: AdjustmentStep) -> Rgb {
        let delta = step.channel_delta();
        let shift = |c: u8| -> u8 {
            let c = f64::from(c);
            let moved = match self {
                Direction::Lighten => (c + delta).min(255.0),
                Direction::Darken => (c - delta).max(0.0),
            };
            moved.round() as u8
        };
        Rgb::new(shift(color.r), shift(color.g), shift(color.b))
    }
}

/// Drives the adjustment loops with configurable steps and iteration cap
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Adjuster {
    pub foreground_step: AdjustmentStep,
    pub background_step: AdjustmentStep,
    pub max_iterations: usize,
}

impl Default for Adjuster {
    fn default() -> Self {
        Self {
            foreground_step: AdjustmentStep::FOREGROUND,
            background_step: AdjustmentStep::BACKGROUND,
            max_iterations: DEFAULT_MAX_ITERATIONS,
        }
    }
}

impl Adjuster {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_foreground_step(mut self, step: AdjustmentStep) -> Self {
        self.foreground_step = step;
        self
    }

    pub fn with_background_step(mut self, step: AdjustmentStep) -> Self {
        self.background_step = step;
        self
    }

    pub fn with_max_iterations(mut self, max_iterations: usize) -> Self {
        self.max_iterations = max_iterations;
        self
    }

    /// Move `text` until it reaches `desired` against the fixed `background`.
    ///
    /// Returns `text` itself when the pair already meets the ratio.
    pub fn increase_foreground_contrast(
        &self,
        background: Rgb,
        text: Rgb,
        desired: f64,
        observer: &dyn AnalysisObserver,
    ) -> Result<Rgb> {
        let desired = validate_ratio(desired)?;
        if contrast_ratio(text, background).meets(desired) {
            return Ok(text);
        }

        let direction = Direction::away_from(text, background);
        self.adjust(ColorRole::Text, text, background, direction, desired, observer)
    }

    /// Move `background` until it reaches `desired` against the fixed `text`.
    ///
    /// Returns `background` itself when the pair already meets the ratio.
    /// When lightening away from the text runs out of room, the background
    /// is darkened from its original value instead, with the same
    /// fixed-point check and iteration cap.
    pub fn increase_background_contrast(
        &self,
        background: Rgb,
        text: Rgb,
        desired: f64,
        observer: &dyn AnalysisObserver,
    ) -> Result<Rgb> {
        let desired = validate_ratio(desired)?;
        if contrast_ratio(background, text).meets(desired) {
            return Ok(background);
        }

        let direction = Direction::away_from(background, text);
        let role = ColorRole::Background;
        match self.adjust(role, background, text, direction, desired, observer) {
            Err(ContrastError::UnreachableContrastTarget { color, ratio, .. })
                if direction == Direction::Lighten =>
            {
                debug!(
                    "Lightening {} stopped at {} ({:.2}:1), darkening instead",
                    background, color, ratio
                );
                self.adjust(role, background, text, Direction::Darken, desired, observer)
            }
            other => other,
        }
    }

    fn adjust(
        &self,
        role: ColorRole,
        color: Rgb,
        partner: Rgb,
        direction: Direction,
        desired: f64,
        observer: &dyn AnalysisObserver,
    ) -> Result<Rgb> {
        let step = match role {
            ColorRole::Text => self.foreground_step,
            ColorRole::Background => self.background_step,
        };
        let mut ratio = contrast_ratio(color, partner);
        let mut current = color;

        for iteration in 1..=self.max_iterations {
            let next = direction.apply(current, step);
            if next == current {
                return Err(unreachable_target(current, ratio, desired));
            }

            current = next;
            ratio = contrast_ratio(current, partner);
            observer.adjustment_step(role, iteration, current, ratio);

            if ratio.meets(desired) {
                return Ok(current);
            }
        }

        Err(unreachable_target(current, ratio, desired))
    }
}

fn unreachable_target(color: Rgb, ratio: ContrastRatio, desired: f64) -> ContrastError {
    ContrastError::UnreachableContrastTarget {
        color: color.to_hex(),
        ratio: ratio.value(),
        desired,
    }
}

/// [`Adjuster::increase_foreground_contrast`] with default steps and no observer
pub fn increase_foreground_contrast(background: Rgb, text: Rgb, desired: f64) -> Result<Rgb> {
    Adjuster::default().increase_foreground_contrast(background, text, desired, &NoopObserver)
}

/// [`Adjuster::increase_background_contrast`] with default steps and no observer
pub fn increase_background_contrast(background: Rgb, text: Rgb, desired: f64) -> Result<Rgb> {
    Adjuster::default().increase_background_contrast(background, text, desired, &NoopObserver)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::observer::testing::RecordingObserver;
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    fn hex(s: &str) -> Rgb {
        s.parse().unwrap()
    }

    // ── Steps ───────────────────────────────────────────────────────

    #[test]
    fn test_step_validation() {
        assert!(AdjustmentStep::new(0.01).is_ok());
        assert!(AdjustmentStep::new(0.5).is_ok());
        assert!(AdjustmentStep::new(0.0).is_err());
        assert!(AdjustmentStep::new(1.0).is_err());
        assert!(AdjustmentStep::new(-0.1).is_err());
        assert!(AdjustmentStep::new(f64::NAN).is_err());
        // Exactly half a unit: 203.5 rounds back to 204 when darkening
        assert!(AdjustmentStep::new(0.5 / 255.0).is_err());
        assert!(AdjustmentStep::new(0.6 / 255.0).is_ok());
        // Less than half a channel unit rounds to no movement
        assert_eq!(
            AdjustmentStep::new(0.001),
            Err(ContrastError::InvalidAdjustmentStep(0.001))
        );
    }

    #[test]
    fn test_default_steps() {
        let adjuster = Adjuster::default();
        assert_eq!(adjuster.foreground_step.fraction(), 0.01);
        assert_eq!(adjuster.background_step.fraction(), 0.009);
        assert!(adjuster.background_step < adjuster.foreground_step);
    }

    // ── Direction ───────────────────────────────────────────────────

    #[test]
    fn test_direction_away_from_partner() {
        assert_eq!(Direction::away_from(hex("#cccccc"), Rgb::WHITE), Direction::Darken);
        assert_eq!(Direction::away_from(hex("#333333"), Rgb::BLACK), Direction::Lighten);
        // Equal luminance: white partner pushes toward black
        assert_eq!(Direction::away_from(Rgb::WHITE, Rgb::WHITE), Direction::Darken);
        assert_eq!(Direction::away_from(Rgb::BLACK, Rgb::BLACK), Direction::Lighten);
    }

    #[test]
    fn test_apply_rounds_and_clamps() {
        // 204 - 2.55 = 201.45
        assert_eq!(Direction::Darken.apply(hex("#cccccc"), AdjustmentStep::FOREGROUND), hex("#c9c9c9"));
        // 1 - 2.55 clamps to 0, 254 + 2.55 clamps to 255
        assert_eq!(Direction::Darken.apply(hex("#01ff80"), AdjustmentStep::FOREGROUND), hex("#00fc7d"));
        assert_eq!(Direction::Lighten.apply(hex("#fe0080"), AdjustmentStep::FOREGROUND), hex("#ff0383"));
        assert_eq!(Direction::Darken.apply(Rgb::BLACK, AdjustmentStep::BACKGROUND), Rgb::BLACK);
    }

    // ── Foreground ──────────────────────────────────────────────────

    #[test]
    fn test_foreground_noop_when_ratio_met() {
        let text = increase_foreground_contrast(Rgb::WHITE, Rgb::BLACK, 4.5).unwrap();
        assert_eq!(text, Rgb::BLACK);
    }

    #[test]
    fn test_foreground_gray_on_white_darkens() {
        let background = Rgb::WHITE;
        let original = hex("#cccccc");
        let text = increase_foreground_contrast(background, original, 4.5).unwrap();

        assert!(contrast_ratio(text, background).meets(4.5));
        assert!(text.luminance() < original.luminance());
        // First gray past 4.5:1; #787878 one step earlier is only 4.42:1
        assert_eq!(text, hex("#757575"));
    }

    #[test]
    fn test_foreground_light_text_on_dark_background_lightens() {
        let background = hex("#202020");
        let original = hex("#404040");
        let text = increase_foreground_contrast(background, original, 4.5).unwrap();
        assert!(contrast_ratio(text, background).meets(4.5));
        assert!(text.luminance() > original.luminance());
    }

    #[test]
    fn test_foreground_unreachable() {
        // Mid gray on mid gray cannot reach 21:1 in either direction
        let err = increase_foreground_contrast(hex("#777777"), hex("#767676"), 21.0).unwrap_err();
        match err {
            ContrastError::UnreachableContrastTarget { color, desired, ratio } => {
                assert_eq!(color, "#000000");
                assert_eq!(desired, 21.0);
                assert!(ratio < 21.0);
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_iteration_cap() {
        let adjuster = Adjuster::default().with_max_iterations(3);
        let err = adjuster
            .increase_foreground_contrast(Rgb::WHITE, hex("#eeeeee"), 4.5, &NoopObserver)
            .unwrap_err();
        assert!(matches!(
            err,
            ContrastError::UnreachableContrastTarget { ref color, .. } if color == "#e5e5e5"
        ));
    }

    #[test]
    fn test_invalid_desired_ratio() {
        assert_eq!(
            increase_foreground_contrast(Rgb::WHITE, Rgb::BLACK, 22.0),
            Err(ContrastError::InvalidRatio(22.0))
        );
    }

    // ── Background ──────────────────────────────────────────────────

    #[test]
    fn test_background_noop_when_ratio_met() {
        let bg = increase_background_contrast(Rgb::WHITE, Rgb::BLACK, 7.0).unwrap();
        assert_eq!(bg, Rgb::WHITE);
    }

    #[test]
    fn test_background_darkens_under_light_text() {
        let original = hex("#3366cc");
        let text = hex("#eeeeee");
        let bg = increase_background_contrast(original, text, 7.0).unwrap();
        assert!(contrast_ratio(bg, text).meets(7.0));
        assert!(bg.luminance() < original.luminance());
    }

    #[test]
    fn test_background_uses_smaller_step() {
        let observer = RecordingObserver::default();
        Adjuster::default()
            .increase_background_contrast(hex("#808080"), hex("#707070"), 4.5, &observer)
            .unwrap();
        let steps = observer.steps.lock().unwrap();
        // 0x80 + 2.295 rounds to 0x82
        assert_eq!(steps[0].2, hex("#828282"));
        assert!(steps.iter().all(|s| s.0 == ColorRole::Background));
    }

    #[test]
    fn test_background_white_darkens_when_lightening_clamps() {
        let observer = RecordingObserver::default();
        let text = hex("#cccccc");
        let bg = Adjuster::default()
            .increase_background_contrast(Rgb::WHITE, text, 4.5, &observer)
            .unwrap();

        assert!(contrast_ratio(bg, text).meets(4.5));
        assert!(bg.luminance() < Rgb::WHITE.luminance());
        // 2.295 per step rounds to 2 channel units: 255 - 85 * 2
        assert_eq!(bg, hex("#555555"));

        // Lightening white never moves, so every recorded step is a darkening one
        let steps = observer.steps.lock().unwrap();
        assert_eq!(steps.len(), 85);
        assert_eq!(steps[0].1, 1);
        assert_eq!(steps[0].2, hex("#fdfdfd"));
    }

    #[test]
    fn test_background_unreachable_after_both_directions() {
        let observer = RecordingObserver::default();
        let err = Adjuster::default()
            .increase_background_contrast(hex("#808080"), hex("#7f7f7f"), 21.0, &observer)
            .unwrap_err();

        // The darkening pass runs last and ends on black
        assert!(matches!(
            err,
            ContrastError::UnreachableContrastTarget { ref color, .. } if color == "#000000"
        ));
        let steps = observer.steps.lock().unwrap();
        assert_eq!(steps.iter().filter(|s| s.1 == 1).count(), 2);
        assert_eq!(steps.last().map(|s| s.2), Some(Rgb::BLACK));
    }

    #[test]
    fn test_background_darkening_pass_is_not_retried() {
        // Dark background under light text already darkens first; no second pass
        let observer = RecordingObserver::default();
        let result = Adjuster::default().increase_background_contrast(
            hex("#202020"),
            hex("#303030"),
            21.0,
            &observer,
        );
        assert!(matches!(result, Err(ContrastError::UnreachableContrastTarget { .. })));
        let steps = observer.steps.lock().unwrap();
        assert_eq!(steps.iter().filter(|s| s.1 == 1).count(), 1);
    }

    // ── Properties ──────────────────────────────────────────────────

    #[test]
    fn test_iterations_are_monotone_and_bounded() {
        let mut rng = StdRng::seed_from_u64(1234);
        let adjuster = Adjuster::default();
        for _ in 0..200 {
            let background = Rgb::from_u32(rng.gen_range(0..=0xff_ffff));
            let text = Rgb::from_u32(rng.gen_range(0..=0xff_ffff));
            let desired = rng.gen_range(1.0..21.0);
            let observer = RecordingObserver::default();

            let result = adjuster.increase_foreground_contrast(background, text, desired, &observer);

            let steps = observer.steps.lock().unwrap();
            assert!(steps.len() <= DEFAULT_MAX_ITERATIONS);
            let mut last = contrast_ratio(text, background).value();
            for &(_, _, _, ratio) in steps.iter() {
                assert!(ratio >= last, "ratio decreased for {text} on {background}");
                last = ratio;
            }
            match result {
                Ok(color) => assert!(contrast_ratio(color, background).meets(desired)),
                Err(e) => assert!(matches!(e, ContrastError::UnreachableContrastTarget { .. })),
            }
        }
    }

    /// Split recorded steps into passes; the iteration counter restarts at 1
    /// for the darkening retry.
    fn passes(steps: &[(ColorRole, usize, Rgb, f64)]) -> Vec<Vec<(usize, Rgb, f64)>> {
        let mut passes: Vec<Vec<(usize, Rgb, f64)>> = Vec::new();
        for &(_, iteration, color, ratio) in steps {
            if iteration == 1 || passes.is_empty() {
                passes.push(Vec::new());
            }
            if let Some(pass) = passes.last_mut() {
                pass.push((iteration, color, ratio));
            }
        }
        passes
    }

    #[test]
    fn test_background_iterations_are_monotone_and_bounded() {
        let mut rng = StdRng::seed_from_u64(5678);
        let adjuster = Adjuster::default();
        for _ in 0..200 {
            let background = Rgb::from_u32(rng.gen_range(0..=0xff_ffff));
            let text = Rgb::from_u32(rng.gen_range(0..=0xff_ffff));
            let desired = rng.gen_range(1.0..21.0);
            let observer = RecordingObserver::default();

            let result = adjuster.increase_background_contrast(background, text, desired, &observer);

            let steps = observer.steps.lock().unwrap();
            assert!(steps.iter().all(|s| s.0 == ColorRole::Background));
            let passes = passes(&steps);
            assert!(passes.len() <= 2, "more than two passes for {background} under {text}");

            for pass in &passes {
                assert!(pass.len() <= DEFAULT_MAX_ITERATIONS);
                for (i, &(iteration, _, _)) in pass.iter().enumerate() {
                    assert_eq!(iteration, i + 1);
                }
            }

            // The away-from-text pass never loses contrast. A darkening retry
            // starts above the text's luminance, so only its end is checked.
            // When lightening clamps on its first move only the retry is recorded.
            let away = Direction::away_from(background, text).apply(background, AdjustmentStep::BACKGROUND);
            let first = passes.first().filter(|p| p.first().map(|s| s.1) == Some(away));
            if let Some(first) = first {
                let mut last = contrast_ratio(background, text).value();
                for &(_, _, ratio) in first {
                    assert!(ratio >= last, "ratio decreased for {background} under {text}");
                    last = ratio;
                }
            }

            match result {
                Ok(color) => {
                    assert!(contrast_ratio(color, text).meets(desired));
                    if let Some(&(_, last_color, _)) = passes.last().and_then(|p| p.last()) {
                        assert_eq!(color, last_color);
                    }
                }
                Err(e) => assert!(matches!(e, ContrastError::UnreachableContrastTarget { .. })),
            }
        }
    }
}
