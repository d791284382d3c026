//! "Same color family" classification
//!
//! Two colors belong to the same visual group when their distance under the
//! chosen metric is at or below a threshold. RGB Euclidean distance is the
//! default; CIE76 delta-E in L*a*b* is the perceptual alternative.

use super::space::{lab_distance, rgb_distance, Rgb};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Default threshold for RGB Euclidean distance
pub const DEFAULT_RGB_THRESHOLD: f64 = 50.0;

/// Default threshold for delta-E
pub const DEFAULT_LAB_THRESHOLD: f64 = 10.0;

/// Distance metric used to compare two colors
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SimilarityMetric {
    /// Euclidean distance over 0-255 channels
    #[default]
    Rgb,
    /// CIE76 delta-E over L*a*b*
    Lab,
}

impl SimilarityMetric {
    pub fn distance(self, a: Rgb, b: Rgb) -> f64 {
        match self {
            SimilarityMetric::Rgb => rgb_distance(a, b),
            SimilarityMetric::Lab => lab_distance(a, b),
        }
    }

    pub fn default_threshold(self) -> f64 {
        match self {
            SimilarityMetric::Rgb => DEFAULT_RGB_THRESHOLD,
            SimilarityMetric::Lab => DEFAULT_LAB_THRESHOLD,
        }
    }
}

impl fmt::Display for SimilarityMetric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SimilarityMetric::Rgb => write!(f, "rgb"),
            SimilarityMetric::Lab => write!(f, "lab"),
        }
    }
}

impl FromStr for SimilarityMetric {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "rgb" | "euclidean" => Ok(SimilarityMetric::Rgb),
            "lab" | "delta-e" | "deltae" => Ok(SimilarityMetric::Lab),
            other => Err(format!("unknown similarity metric '{}' (expected rgb or lab)", other)),
        }
    }
}

/// Whether two colors are in the same visual group
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SimilarityVerdict {
    SameGroup,
    DifferentGroup,
}

impl SimilarityVerdict {
    pub fn is_same(self) -> bool {
        self == SimilarityVerdict::SameGroup
    }
}

impl fmt::Display for SimilarityVerdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SimilarityVerdict::SameGroup => write!(f, "same color group"),
            SimilarityVerdict::DifferentGroup => write!(f, "different color group"),
        }
    }
}

/// Raw distance plus the verdict it produced
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Comparison {
    pub distance: f64,
    pub verdict: SimilarityVerdict,
}

/// A metric paired with its threshold
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Classifier {
    pub metric: SimilarityMetric,
    pub threshold: f64,
}

impl Default for Classifier {
    fn default() -> Self {
        Self::for_metric(SimilarityMetric::default())
    }
}

impl Classifier {
    pub fn new(metric: SimilarityMetric, threshold: f64) -> Self {
        Self { metric, threshold }
    }

    /// Classifier using the metric's default threshold
    pub fn for_metric(metric: SimilarityMetric) -> Self {
        Self::new(metric, metric.default_threshold())
    }

    pub fn compare(&self, a: Rgb, b: Rgb) -> Comparison {
        let distance = self.metric.distance(a, b);
        let verdict = if distance <= self.threshold {
            SimilarityVerdict::SameGroup
        } else {
            SimilarityVerdict::DifferentGroup
        };
        Comparison { distance, verdict }
    }

    pub fn classify(&self, a: Rgb, b: Rgb) -> SimilarityVerdict {
        self.compare(a, b).verdict
    }
}

/// Classify two colors with an explicit threshold and metric.
pub fn classify(a: Rgb, b: Rgb, threshold: f64, metric: SimilarityMetric) -> SimilarityVerdict {
    Classifier::new(metric, threshold).classify(a, b)
}
