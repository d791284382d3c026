//! Image collaborator
//!
//! Reads local image files and reduces them to the two colors the suggestion
//! pipeline works on. Remote download and OCR are not part of this crate;
//! OCR engines can be attached through [`extract::TextRecognizer`].
//!
//! # Submodules
//!
//! - `extract` - Image decoding and dominant color extraction

pub mod extract;

pub use extract::{
    is_supported_image, ColorExtractor, DominantColor, ImageColors, NoTextRecognizer,
    TextRecognizer,
};
