//! Map file parsing and data definitions.
//!
//! This module handles:
//! - Locating blocks inside a linker map report
//! - Decoding the call tree notation into ordered line records
//! - Scanning the segment and module tables
//! - The `MapParser` seam each supported toolchain implements

pub mod cosmic;
pub mod schema;

use crate::calltree::CallGraph;
use crate::utils::error::ParseError;

// Re-export main types
pub use cosmic::{extract_call_tree, parse_call_tree, CosmicParser};
pub use schema::{CallTreeLine, LineKind, Module, Segment};

/// A toolchain-specific map file reader
pub trait MapParser: Sync {
    /// Tag used on the command line
    fn name(&self) -> &'static str;

    fn get_segments(&self, maptext: &str) -> Result<Vec<Segment>, ParseError>;

    fn get_modules(&self, maptext: &str) -> Result<Vec<Module>, ParseError>;

    fn get_call_tree(&self, maptext: &str) -> Result<CallGraph, ParseError>;
}

static COSMIC: CosmicParser = CosmicParser;

/// Every supported parser, looked up by tag
pub static PARSERS: &[&dyn MapParser] = &[&COSMIC];

/// Look up a parser by its command line tag
pub fn parser_by_name(name: &str) -> Option<&'static dyn MapParser> {
    PARSERS.iter().copied().find(|parser| parser.name() == name)
}
