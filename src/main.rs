//! Mapography CLI
//!
//! Reads a linker map file and reports memory layout and stack usage.

use anyhow::Result;
use clap::{Parser, Subcommand};
use env_logger::Env;
use std::path::PathBuf;

use mapography::commands::{
    execute, CallsAction, CommandArgs, MapCommand, ModulesAction, OutputFormat, ParserKind,
    SegmentsAction,
};

/// Mapography - memory layout and stack usage from linker map files
#[derive(Parser, Debug)]
#[command(name = "mapography")]
#[command(version, about, long_about = None)]
struct Cli {
    /// Map file format
    #[arg(value_enum)]
    parser: ParserKind,

    /// Command to execute
    #[command(subcommand)]
    command: Commands,

    /// Write the result to this file instead of stdout
    #[arg(short, long, global = true)]
    output: Option<PathBuf>,

    /// Result format
    #[arg(long, value_enum, default_value_t = OutputFormat::Text, global = true)]
    format: OutputFormat,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

/// Available commands
#[derive(Subcommand, Debug)]
enum Commands {
    /// Function calls and stack usage
    Calls {
        #[arg(value_enum)]
        action: CallsAction,

        /// Input map file
        input: PathBuf,
    },

    /// Modules and their sections
    Modules {
        #[arg(value_enum)]
        action: ModulesAction,

        /// Input map file
        input: PathBuf,
    },

    /// Memory segments
    Segments {
        #[arg(value_enum)]
        action: SegmentsAction,

        /// Input map file
        input: PathBuf,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Setup logging
    let log_level = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(Env::default().default_filter_or(log_level)).init();

    let (command, input) = match cli.command {
        Commands::Calls { action, input } => (MapCommand::Calls(action), input),
        Commands::Modules { action, input } => (MapCommand::Modules(action), input),
        Commands::Segments { action, input } => (MapCommand::Segments(action), input),
    };

    let args = CommandArgs {
        parser: cli.parser,
        command,
        input,
        output: cli.output,
        format: cli.format,
    };

    execute(&args)
}
