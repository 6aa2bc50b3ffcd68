//! Error types for the entire application.
//!
//! We use `thiserror` for library-style errors with custom types,
//! and `anyhow` for application-level error propagation in main.rs and commands.

use thiserror::Error;

/// Errors that can occur while parsing a map file
///
/// Every variant is fatal to the current parse. Lines that simply do not
/// match a known grammar are skipped by the decoders and never reach here.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    #[error("Cannot find {0} in map file")]
    NotFound(String),

    #[error("Index {found} doesn't match position {expected}")]
    IndexMismatch { expected: usize, found: usize },

    #[error("Function '{0}' is referenced but never declared with a stack size")]
    UndeclaredFunction(String),

    #[error("Line {index} is at depth {depth} but only {open} callers are open")]
    InvalidDepth { index: usize, depth: usize, open: usize },

    #[error("Invalid number '{value}': {reason}")]
    InvalidNumber { value: String, reason: String },
}

/// Errors that can occur during file output
#[derive(Error, Debug)]
pub enum OutputError {
    #[error("Failed to write file: {0}")]
    WriteFailed(#[from] std::io::Error),

    #[error("Failed to serialize JSON: {0}")]
    SerializationFailed(#[from] serde_json::Error),

    #[error("Invalid output path: {0}")]
    InvalidPath(String),
}
