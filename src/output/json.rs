//! JSON report output.
//!
//! Wraps a command's structured result in a versioned envelope so the
//! report can be consumed by other tools.

use crate::utils::config::SCHEMA_VERSION;
use crate::utils::error::OutputError;
use chrono::Utc;
use log::debug;
use serde::Serialize;

/// Top-level JSON document produced by `--format json`
#[derive(Debug, Clone, Serialize)]
pub struct Report<T: Serialize> {
    /// Schema version for compatibility checking
    pub version: String,

    /// Timestamp when the report was generated
    pub generated_at: String,

    /// Parser tag the map was read with (e.g. "cosmic")
    pub parser: String,

    /// Command and subcommand that produced `data` (e.g. "calls longest")
    pub command: String,

    pub data: T,
}

impl<T: Serialize> Report<T> {
    pub fn new(parser: impl Into<String>, command: impl Into<String>, data: T) -> Self {
        Self {
            version: SCHEMA_VERSION.to_string(),
            generated_at: Utc::now().to_rfc3339(),
            parser: parser.into(),
            command: command.into(),
            data,
        }
    }
}

/// Serialize a report to pretty-printed JSON
///
/// # Errors
/// * `OutputError::SerializationFailed` - JSON serialization error
pub fn report_to_string<T: Serialize>(report: &Report<T>) -> Result<String, OutputError> {
    let json = serde_json::to_string_pretty(report).map_err(OutputError::SerializationFailed)?;
    debug!("Serialized '{}' report ({} bytes)", report.command, json.len());
    Ok(json)
}
