//! Contrast Suggest Library
//!
//! Checks whether a text color and a background color meet a WCAG contrast
//! ratio and, when they don't, suggests the closest text or background color
//! that does, preferring a suggestion that stays in the original color group.
//!
//! # Architecture
//!
//! The library is organized into the following modules:
//!
//! - [`color`] - Color math: hex parsing, luminance, contrast ratio,
//!   step-wise adjustment and similarity classification
//! - [`suggest`] - The suggestion pipeline and its result record
//! - [`imaging`] - Dominant background/text color extraction from images
//! - [`batch`] - Parallel analysis of a directory of images
//! - [`core`] - Configuration, error handling and analysis observers
//! - [`cli`] - Command-line interface (only used by the binary)
//!
//! # Example Usage
//!
//! ```rust
//! use contrast_suggest::suggest::{suggest, Outcome, SuggestOptions};
//!
//! fn main() -> Result<(), contrast_suggest::core::error::ContrastError> {
//!     let result = suggest("#ffffff", "#777777", &SuggestOptions::default())?;
//!
//!     assert_eq!(result.outcome, Outcome::ForegroundSuggested);
//!     if let Some((text, background)) = result.recommended_pair() {
//!         println!("Use {} on {}", text, background);
//!     }
//!     Ok(())
//! }
//! ```
//!
//! # Diagnostics
//!
//! Pass an observer to see every ratio, adjustment step and verdict:
//!
//! ```rust
//! use contrast_suggest::core::observer::LogObserver;
//! use contrast_suggest::suggest::{SuggestOptions, SuggestionOrchestrator};
//!
//! let orchestrator = SuggestionOrchestrator::with_observer(SuggestOptions::default(), &LogObserver);
//! let result = orchestrator.run_hex("#336699", "#aaaaaa").unwrap();
//! println!("{}", result);
//! ```

pub mod batch;
pub mod cli;
pub mod color;
pub mod core;
pub mod imaging;
pub mod suggest;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name
pub const NAME: &str = env!("CARGO_PKG_NAME");
