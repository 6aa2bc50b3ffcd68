//! CLI command implementations.
//!
//! Each command is implemented in its own module.
//! Commands orchestrate the various library components to perform user tasks.

pub mod calls;
pub mod models;
pub mod modules;
pub mod segments;

pub use models::{
    CallsAction, CommandArgs, MapCommand, ModulesAction, OutputFormat, ParserKind, SegmentsAction,
};

use crate::output::{validate_path, write_text};
use anyhow::{Context, Result};
use log::{debug, info};
use std::path::Path;
use std::time::Instant;

/// Execute a command
///
/// **Public** - main entry point called from main.rs
///
/// Reads the map file, runs the command, then prints the result or writes
/// it to the requested output file.
///
/// # Errors
/// * Unreadable input or unwritable output
/// * Missing block or malformed content in the map file
pub fn execute(args: &CommandArgs) -> Result<()> {
    let start_time = Instant::now();

    info!(
        "Running '{}' on {} ({} parser)",
        args.command,
        args.input.display(),
        args.parser.tag()
    );

    // Fail on a bad output path before doing any work
    if let Some(output) = &args.output {
        validate_path(output).context("Invalid output path")?;
    }

    let maptext = read_map_file(&args.input)?;
    let result = run(&maptext, args)?;

    match &args.output {
        Some(output) => {
            write_text(&result, output).context("Failed to write output file")?;
            info!("✓ Output written to: {}", output.display());
        }
        None => println!("{}", result),
    }

    debug!("Command completed in {:.2}s", start_time.elapsed().as_secs_f64());

    Ok(())
}

/// Run a command on map file content and return its printable result
///
/// **Public** - the I/O-free core of `execute`, used by tests
pub fn run(maptext: &str, args: &CommandArgs) -> Result<String> {
    let parser = args
        .parser
        .parser()
        .with_context(|| format!("No parser registered for '{}'", args.parser.tag()))?;

    match args.command {
        MapCommand::Calls(action) => calls::run(maptext, parser, action, args.format),
        MapCommand::Modules(action) => modules::run(maptext, parser, action, args.format),
        MapCommand::Segments(action) => segments::run(maptext, parser, action, args.format),
    }
}

/// Read a map file, normalising line endings to `\n`
pub fn read_map_file(path: &Path) -> Result<String> {
    let raw = std::fs::read(path)
        .with_context(|| format!("Failed to read map file {}", path.display()))?;

    // Map files may carry Latin-1 paths or comments
    let text = String::from_utf8_lossy(&raw);

    debug!("Read {} bytes from {}", raw.len(), path.display());

    Ok(text.replace("\r\n", "\n"))
}
