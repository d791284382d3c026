//! WCAG contrast ratio
//!
//! The ratio is `(L_lighter + 0.05) / (L_darker + 0.05)` over relative
//! luminance, so it always lies in [1, 21] and does not depend on argument
//! order.

use super::space::{relative_luminance, Rgb};
use crate::core::error::{ContrastError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Lowest possible ratio (identical luminance)
pub const MIN_RATIO: f64 = 1.0;

/// Highest possible ratio (black on white)
pub const MAX_RATIO: f64 = 21.0;

/// WCAG "AA normal text" threshold, the default target
pub const DEFAULT_DESIRED_RATIO: f64 = 4.5;

/// A contrast ratio between two colors
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ContrastRatio(f64);

impl ContrastRatio {
    /// Raw ratio value
    pub fn value(self) -> f64 {
        self.0
    }

    /// Ratio rounded to two decimals, as reported to users
    pub fn rounded(self) -> f64 {
        (self.0 * 100.0).round() / 100.0
    }

    /// Whether this ratio meets or exceeds `desired`
    pub fn meets(self, desired: f64) -> bool {
        self.0 >= desired
    }
}

impl fmt::Display for ContrastRatio {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.2}:1", self.0)
    }
}

/// Compute the WCAG contrast ratio between two colors.
pub fn contrast_ratio(a: Rgb, b: Rgb) -> ContrastRatio {
    let la = relative_luminance(a);
    let lb = relative_luminance(b);
    let (lighter, darker) = if la >= lb { (la, lb) } else { (lb, la) };
    ContrastRatio((lighter + 0.05) / (darker + 0.05))
}

/// Check that a desired ratio is achievable at all.
pub fn validate_ratio(desired: f64) -> Result<f64> {
    if desired.is_finite() && (MIN_RATIO..=MAX_RATIO).contains(&desired) {
        Ok(desired)
    } else {
        Err(ContrastError::InvalidRatio(desired))
    }
}

/// WCAG 2.x conformance levels for text contrast
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum WcagLevel {
    /// Level AA, normal-size text
    Aa,
    /// Level AA, large text (18pt, or 14pt bold)
    AaLarge,
    /// Level AAA, normal-size text
    Aaa,
    /// Level AAA, large text
    AaaLarge,
}

impl WcagLevel {
    pub const ALL: [WcagLevel; 4] = [
        WcagLevel::Aa,
        WcagLevel::AaLarge,
        WcagLevel::Aaa,
        WcagLevel::AaaLarge,
    ];

    /// Minimum contrast ratio the level requires
    pub fn min_ratio(self) -> f64 {
        match self {
            WcagLevel::Aa => 4.5,
            WcagLevel::AaLarge => 3.0,
            WcagLevel::Aaa => 7.0,
            WcagLevel::AaaLarge => 4.5,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            WcagLevel::Aa => "AA",
            WcagLevel::AaLarge => "AA (large text)",
            WcagLevel::Aaa => "AAA",
            WcagLevel::AaaLarge => "AAA (large text)",
        }
    }
}

impl FromStr for WcagLevel {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().replace('_', "-").as_str() {
            "aa" => Ok(WcagLevel::Aa),
            "aa-large" => Ok(WcagLevel::AaLarge),
            "aaa" => Ok(WcagLevel::Aaa),
            "aaa-large" => Ok(WcagLevel::AaaLarge),
            other => Err(format!(
                "unknown WCAG level '{}' (expected aa, aa-large, aaa or aaa-large)",
                other
            )),
        }
    }
}

/// Pass/fail of one color pair against every WCAG level
#[derive(Debug, Clone, Serialize)]
pub struct WcagReport {
    pub ratio: ContrastRatio,
    pub levels: Vec<(WcagLevel, bool)>,
}

impl WcagReport {
    pub fn evaluate(a: Rgb, b: Rgb) -> Self {
        let ratio = contrast_ratio(a, b);
        let levels = WcagLevel::ALL
            .iter()
            .map(|&level| (level, ratio.meets(level.min_ratio())))
            .collect();
        Self { ratio, levels }
    }

    pub fn passes(&self, level: WcagLevel) -> bool {
        self.levels
            .iter()
            .any(|&(l, passed)| l == level && passed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    fn hex(s: &str) -> Rgb {
        s.parse().unwrap()
    }

    #[test]
    fn test_black_on_white_is_21() {
        let ratio = contrast_ratio(hex("#000000"), hex("#ffffff"));
        assert!((ratio.value() - 21.0).abs() < 0.01);
        assert_eq!(ratio.rounded(), 21.0);
    }

    #[test]
    fn test_same_color_is_1() {
        for c in ["#000000", "#ffffff", "#7f3a9c"] {
            assert_eq!(contrast_ratio(hex(c), hex(c)).value(), 1.0);
        }
    }

    #[test]
    fn test_known_pairs() {
        // Reference values from WebAIM
        assert_eq!(contrast_ratio(hex("#767676"), hex("#ffffff")).rounded(), 4.54);
        assert_eq!(contrast_ratio(hex("#ff0000"), hex("#ffffff")).rounded(), 4.0);
        assert_eq!(contrast_ratio(hex("#cccccc"), hex("#ffffff")).rounded(), 1.61);
    }

    #[test]
    fn test_symmetric_and_bounded_random() {
        let mut rng = StdRng::seed_from_u64(42);
        for _ in 0..500 {
            let a = Rgb::from_u32(rng.gen_range(0..=0xff_ffff));
            let b = Rgb::from_u32(rng.gen_range(0..=0xff_ffff));
            let ab = contrast_ratio(a, b).value();
            let ba = contrast_ratio(b, a).value();
            assert_eq!(ab, ba, "asymmetric for {a} / {b}");
            assert!((MIN_RATIO..=MAX_RATIO + 1e-9).contains(&ab));
        }
    }

    #[test]
    fn test_display() {
        assert_eq!(contrast_ratio(Rgb::BLACK, Rgb::WHITE).to_string(), "21.00:1");
    }

    #[test]
    fn test_validate_ratio() {
        assert_eq!(validate_ratio(4.5).unwrap(), 4.5);
        assert!(validate_ratio(1.0).is_ok());
        assert!(validate_ratio(21.0).is_ok());
        assert_eq!(validate_ratio(0.5), Err(ContrastError::InvalidRatio(0.5)));
        assert!(validate_ratio(21.5).is_err());
        assert!(validate_ratio(f64::NAN).is_err());
    }

    #[test]
    fn test_wcag_level_from_str() {
        assert_eq!("AA".parse::<WcagLevel>(), Ok(WcagLevel::Aa));
        assert_eq!("aaa_large".parse::<WcagLevel>(), Ok(WcagLevel::AaaLarge));
        assert_eq!("aa-large".parse::<WcagLevel>().unwrap().min_ratio(), 3.0);
        assert!("a".parse::<WcagLevel>().is_err());
    }

    #[test]
    fn test_wcag_levels() {
        let report = WcagReport::evaluate(hex("#767676"), hex("#ffffff"));
        assert!(report.passes(WcagLevel::Aa));
        assert!(report.passes(WcagLevel::AaLarge));
        assert!(report.passes(WcagLevel::AaaLarge));
        assert!(!report.passes(WcagLevel::Aaa));

        let report = WcagReport::evaluate(hex("#cccccc"), hex("#ffffff"));
        assert!(report.levels.iter().all(|&(_, passed)| !passed));
    }
}
