//! Color math module
//!
//! Pure, allocation-free color computations used by the suggestion pipeline.
//!
//! # Submodules
//!
//! - `space` - Hex parsing, relative luminance and distance metrics
//! - `contrast` - WCAG contrast ratio and conformance levels
//! - `adjust` - Step-wise lightening/darkening toward a target ratio
//! - `similarity` - Same-color-group classification

pub mod adjust;
pub mod contrast;
pub mod similarity;
pub mod space;

pub use adjust::{Adjuster, AdjustmentStep, Direction};
pub use contrast::{contrast_ratio, ContrastRatio, WcagLevel, WcagReport};
pub use similarity::{classify, Classifier, Comparison, SimilarityMetric, SimilarityVerdict};
pub use space::{hex_to_rgb, rgb_to_hex, Rgb};
