//! Core functionality module
//!
//! This module contains the pieces every other module leans on:
//! configuration management, error handling, and the diagnostic hooks an
//! analysis run reports to.
//!
//! # Submodules
//!
//! - `config` - Configuration loading, saving, and management
//! - `error` - Error types and result aliases
//! - `observer` - Diagnostic checkpoints of an analysis run

pub mod config;
pub mod error;
pub mod observer;
