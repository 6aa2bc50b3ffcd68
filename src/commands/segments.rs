//! `segments` command: memory segment listing.

use super::models::{MapCommand, OutputFormat, SegmentsAction};
use crate::output::{report_to_string, Report};
use crate::parser::MapParser;
use anyhow::{Context, Result};
use log::info;

/// Run a `segments` subcommand and return its printable result
pub fn run(
    maptext: &str,
    parser: &dyn MapParser,
    action: SegmentsAction,
    format: OutputFormat,
) -> Result<String> {
    let segments = parser
        .get_segments(maptext)
        .context("Failed to parse segments")?;

    info!("Found {} segments", segments.len());

    let command = MapCommand::Segments(action).to_string();

    let result = match (action, format) {
        (SegmentsAction::List, OutputFormat::Text) => segments
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join("\n"),
        (SegmentsAction::List, OutputFormat::Json) => {
            report_to_string(&Report::new(parser.name(), command, &segments))?
        }
    };

    Ok(result)
}
