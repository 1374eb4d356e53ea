//! Error types for level mutation and level file I/O

use std::path::PathBuf;
use thiserror::Error;

/// Errors reported by level mutation APIs.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum LevelError {
    /// A layer id below zero was requested. The level is left untouched.
    #[error("invalid layer id {0}: layer ids must be non-negative")]
    InvalidLayer(i32),
}

/// Errors reported when loading or saving a level file.
#[derive(Debug, Error)]
pub enum LevelFileError {
    /// The named level has no backing file.
    #[error("level file not found: {0}")]
    NotFound(PathBuf),
    #[error("failed to read level file: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse level file: {0}")]
    Json(#[from] serde_json::Error),
}
