//! `modules` command: per-module section listing and size breakdown.

use super::models::{MapCommand, ModulesAction, OutputFormat};
use crate::layout::section_sizes;
use crate::output::{report_to_string, Report};
use crate::parser::MapParser;
use anyhow::{Context, Result};
use log::info;

/// Run a `modules` subcommand and return its printable result
pub fn run(
    maptext: &str,
    parser: &dyn MapParser,
    action: ModulesAction,
    format: OutputFormat,
) -> Result<String> {
    let modules = parser
        .get_modules(maptext)
        .context("Failed to parse modules")?;

    info!("Found {} modules", modules.len());

    let command = MapCommand::Modules(action).to_string();

    let result = match (action, format) {
        (ModulesAction::List, OutputFormat::Text) => modules
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join("\n\n"),
        (ModulesAction::List, OutputFormat::Json) => {
            report_to_string(&Report::new(parser.name(), command, &modules))?
        }
        (ModulesAction::Sizes, OutputFormat::Text) => section_sizes(&modules)
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join("\n\n"),
        (ModulesAction::Sizes, OutputFormat::Json) => {
            report_to_string(&Report::new(parser.name(), command, section_sizes(&modules)))?
        }
    };

    Ok(result)
}
