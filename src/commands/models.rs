use crate::parser::{parser_by_name, MapParser};
use clap::ValueEnum;
use std::fmt;
use std::path::PathBuf;

/// Supported map file formats
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ParserKind {
    /// COSMIC linker (clnk) map files
    Cosmic,
}

impl ParserKind {
    pub fn tag(self) -> &'static str {
        match self {
            ParserKind::Cosmic => "cosmic",
        }
    }

    /// Implementation registered for this tag
    pub fn parser(self) -> Option<&'static dyn MapParser> {
        parser_by_name(self.tag())
    }
}

/// How command results are printed
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable text
    #[default]
    Text,
    /// Versioned JSON report
    Json,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum CallsAction {
    /// Indented call tree with stack sizes
    Tree,
    /// Every call path, heaviest first
    Paths,
    /// Worst-case stack path
    Longest,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ModulesAction {
    /// Modules and their sections
    List,
    /// Module sizes grouped by section
    Sizes,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum SegmentsAction {
    /// Memory segments
    List,
}

/// A command and its subcommand
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MapCommand {
    Calls(CallsAction),
    Modules(ModulesAction),
    Segments(SegmentsAction),
}

impl fmt::Display for MapCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (command, action) = match self {
            MapCommand::Calls(CallsAction::Tree) => ("calls", "tree"),
            MapCommand::Calls(CallsAction::Paths) => ("calls", "paths"),
            MapCommand::Calls(CallsAction::Longest) => ("calls", "longest"),
            MapCommand::Modules(ModulesAction::List) => ("modules", "list"),
            MapCommand::Modules(ModulesAction::Sizes) => ("modules", "sizes"),
            MapCommand::Segments(SegmentsAction::List) => ("segments", "list"),
        };
        write!(f, "{} {}", command, action)
    }
}

/// Arguments for running one command against a map file
///
/// **Public** - used by main.rs to construct from CLI args
#[derive(Debug, Clone)]
pub struct CommandArgs {
    /// Map file format
    pub parser: ParserKind,

    pub command: MapCommand,

    /// Map file to read
    pub input: PathBuf,

    /// Output file (stdout when absent)
    pub output: Option<PathBuf>,

    pub format: OutputFormat,
}

impl Default for CommandArgs {
    fn default() -> Self {
        Self {
            parser: ParserKind::Cosmic,
            command: MapCommand::Calls(CallsAction::Tree),
            input: PathBuf::new(),
            output: None,
            format: OutputFormat::Text,
        }
    }
}
