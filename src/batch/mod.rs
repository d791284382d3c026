//! Batch analysis module
//!
//! Walks a directory of screenshots, extracts the dominant colors of every
//! image and runs the suggestion pipeline on each pair in parallel.
//!
//! # Submodules
//!
//! - `report` - Per-image entries, summary counts and the JSON report
//! - `runner` - File collection and the parallel analysis loop

pub mod report;
pub mod runner;

pub use report::{BatchEntry, BatchReport, BatchSummary};
pub use runner::{BatchProgress, BatchRunner};
