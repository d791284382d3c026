//! Error types for contrast analysis
//!
//! This module defines the error types used throughout the library. The color
//! math and the suggestion pipeline only ever produce the first four variants;
//! the rest come from the image collaborator.

use thiserror::Error;

/// Main error type for contrast analysis
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ContrastError {
    /// The string is not six hex digits (with an optional leading `#`)
    #[error("Invalid color format '{0}'. Expected #RRGGBB.")]
    InvalidColorFormat(String),

    /// Adjustment stopped moving before the desired ratio was reached
    #[error("Contrast target {desired:.2} is unreachable: stopped at {color} with ratio {ratio:.2}")]
    UnreachableContrastTarget {
        color: String,
        ratio: f64,
        desired: f64,
    },

    /// Adjustment step outside (0, 1) or too small to move a channel
    #[error("Invalid adjustment step {0}. Expected a fraction in (0, 1) greater than 1/510.")]
    InvalidAdjustmentStep(f64),

    /// Desired contrast ratio outside the WCAG range
    #[error("Invalid contrast ratio {0}. Expected a value between 1 and 21.")]
    InvalidRatio(f64),

    /// Image could not be opened or decoded
    #[error("Image error: {0}")]
    ImageError(String),

    /// The image does not contain two distinct colors
    #[error("Image has {0} distinct color(s); at least 2 are required")]
    NotEnoughColors(usize),

    /// General I/O error
    #[error("IO error: {0}")]
    IoError(String),
}

/// Result type alias for convenience
pub type Result<T> = std::result::Result<T, ContrastError>;

impl From<std::io::Error> for ContrastError {
    fn from(err: std::io::Error) -> Self {
        ContrastError::IoError(err.to_string())
    }
}

impl From<image::ImageError> for ContrastError {
    fn from(err: image::ImageError) -> Self {
        ContrastError::ImageError(err.to_string())
    }
}
