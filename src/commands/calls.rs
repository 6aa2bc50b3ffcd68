//! `calls` command: call tree and stack usage reports.

use super::models::{CallsAction, MapCommand, OutputFormat};
use crate::output::{report_to_string, Report};
use crate::parser::MapParser;
use anyhow::{Context, Result};
use log::info;

/// Run a `calls` subcommand and return its printable result
pub fn run(
    maptext: &str,
    parser: &dyn MapParser,
    action: CallsAction,
    format: OutputFormat,
) -> Result<String> {
    let graph = parser
        .get_call_tree(maptext)
        .context("Failed to parse call tree")?;

    info!(
        "Call graph: {} functions, {} roots",
        graph.len(),
        graph.roots.len()
    );

    let command = MapCommand::Calls(action).to_string();

    let result = match (action, format) {
        (CallsAction::Tree, OutputFormat::Text) => graph.render(),
        (CallsAction::Tree, OutputFormat::Json) => {
            report_to_string(&Report::new(parser.name(), command, &graph))?
        }
        (CallsAction::Paths, OutputFormat::Text) => graph
            .enumerate_paths()
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join("\n"),
        (CallsAction::Paths, OutputFormat::Json) => {
            report_to_string(&Report::new(parser.name(), command, graph.enumerate_paths()))?
        }
        (CallsAction::Longest, OutputFormat::Text) => graph.longest_path().to_string(),
        (CallsAction::Longest, OutputFormat::Json) => {
            report_to_string(&Report::new(parser.name(), command, graph.longest_path()))?
        }
    };

    Ok(result)
}
