//! Output writers for command results.
//!
//! This module handles:
//! - Writing text results to files
//! - JSON report envelopes

pub mod json;
pub mod text;

// Re-export main functions
pub use json::{report_to_string, Report};
pub use text::{validate_path, write_text};
