//! Error types for Trellis operations.
//!
//! This module provides the main error type [`TrellisError`] which wraps
//! the error conditions that can occur while turning a scene description
//! into an SVG document.

use std::io;

use thiserror::Error;

/// The main error type for Trellis operations.
///
/// # Diagnostic Variants
///
/// The `Scene` variant carries the 1-based line and column reported by the
/// JSON decoder together with the source text, so callers can render a
/// labelled snippet.
#[derive(Debug, Error)]
pub enum TrellisError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("{message}")]
    Scene {
        message: String,
        line: usize,
        column: usize,
        src: String,
    },

    #[error("Build error: {0}")]
    Build(String),

    #[error("Config error: {0}")]
    Config(String),

    #[error("Layout error: {0}")]
    Layout(#[from] trellis_core::Error),

    #[error("Export error: {0}")]
    Export(Box<dyn std::error::Error>),
}

impl TrellisError {
    /// Create a new `Scene` error from a JSON decode failure and the decoded source.
    pub fn new_scene_error(err: &serde_json::Error, src: impl Into<String>) -> Self {
        Self::Scene {
            message: err.to_string(),
            line: err.line(),
            column: err.column(),
            src: src.into(),
        }
    }
}
