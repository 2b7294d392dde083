//! Error types for data loading and animation lookups.
//!
//! None of these are fatal. Callers log them and fall back to defaults,
//! static frames, or skipped effects.

use thiserror::Error;

/// Errors that can occur when loading tuning data files.
#[derive(Debug, Error)]
pub enum DataLoadError {
    /// File could not be read.
    #[error("Failed to read file '{path}': {details}")]
    ReadError { path: String, details: String },

    /// RON parsing failed.
    #[error("Parse error in '{path}': {details}")]
    ParseError { path: String, details: String },
}

/// Errors raised while registering or resolving sprite animations.
#[derive(Debug, Error, PartialEq)]
pub enum AnimationError {
    /// The clip refers to a sprite sheet that was never registered.
    #[error("Unknown sprite sheet '{0}'")]
    UnknownSheet(String),

    /// No clip with this key exists in the library.
    #[error("Unknown animation '{0}'")]
    UnknownClip(String),

    /// The key exists but failed validation at load time.
    #[error("Animation '{0}' was not validated")]
    NotValidated(String),

    /// The clip needs frames the sheet does not have.
    #[error("Animation '{key}' needs frames up to {last}, sheet has {available}")]
    FramesOutOfRange { key: String, last: usize, available: usize },

    /// The sheet has no frames at all, so not even a fallback is possible.
    #[error("Sprite sheet '{0}' has no frames")]
    EmptySheet(String),
}
