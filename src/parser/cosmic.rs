//! Parser for COSMIC toolchain linker map files.
//!
//! A COSMIC map file is a sequence of blocks, each introduced by a centred
//! banner and closed by a run of blank lines:
//!
//! ```text
//!                               ---------
//!                               Call tree
//!                               ---------
//!
//!    1 > _main: (6)
//!    2   + _init: (2)
//!    3   | + _clock_setup: (4)
//!    4   + _clock_setup --> 3
//! ```
//!
//! This module locates the blocks and decodes the Segments, Modules and
//! Call tree blocks line by line.

use super::schema::{CallTreeLine, LineKind, Module, Segment};
use super::MapParser;
use crate::calltree::CallGraph;
use crate::utils::config::{
    BANNER_INDENT, BLOCK_TERMINATOR, CALL_TREE_TITLE, MODULES_TITLE, SEGMENTS_TITLE,
};
use crate::utils::error::ParseError;
use log::{debug, warn};
use once_cell::sync::Lazy;
use regex::Regex;

// `<index> <markers> [(]<name>[)] <annotation>`
static CALL_TREE_LINE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?x)
        ^\s*(?P<index>\d+)
        (?P<level>[\ >+|]+)
        \(?(?P<name>[^:\ )]+)\)?
        (?:
            [:\s]*\((?P<size>\d+)\)
            |
            \s+[-=>]+\s+(?P<reference>\d+)
            |
            .*(?P<ellipsis>\.{3})
        )",
    )
    .unwrap()
});

static TABLE_ROW: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"^\s*start\s+(?P<start>[0-9a-fA-F]+)\s+end\s+(?P<end>[0-9a-fA-F]+)\s+length\s+(?P<length>\d+)\s+(?:segment|section)\s+(?P<name>.+?)\s*$",
    )
    .unwrap()
});

static MODULE_HEADER: Lazy<Regex> = Lazy::new(|| Regex::new(r"^(?P<name>\S.*):\s*$").unwrap());

/// Parser for maps produced by the COSMIC linker (clnk)
#[derive(Debug, Clone, Copy, Default)]
pub struct CosmicParser;

impl MapParser for CosmicParser {
    fn name(&self) -> &'static str {
        "cosmic"
    }

    fn get_segments(&self, maptext: &str) -> Result<Vec<Segment>, ParseError> {
        parse_segments(extract_block(maptext, SEGMENTS_TITLE)?)
    }

    fn get_modules(&self, maptext: &str) -> Result<Vec<Module>, ParseError> {
        parse_modules(extract_block(maptext, MODULES_TITLE)?)
    }

    fn get_call_tree(&self, maptext: &str) -> Result<CallGraph, ParseError> {
        let lines = parse_call_tree(extract_call_tree(maptext)?)?;
        CallGraph::from_lines(&lines)
    }
}

/// Build the three-line banner that introduces a block
///
/// Each line is indented by `BANNER_INDENT` spaces: a dash rule as wide as
/// the title, the title, and the rule again.
pub fn banner(title: &str) -> String {
    let indent = " ".repeat(BANNER_INDENT);
    let rule = "-".repeat(title.chars().count());
    format!("{indent}{rule}\n{indent}{title}\n{indent}{rule}\n")
}

/// Extract the body of the block titled `title`
///
/// **Public** - shared by every block scanner
///
/// The body starts right after the banner and stops at the first
/// `BLOCK_TERMINATOR` run. The newline ending the last data line is kept,
/// the rest of the blank run is not.
///
/// # Errors
/// * `ParseError::NotFound` - banner missing, or no terminator after it
pub fn extract_block<'a>(maptext: &'a str, title: &str) -> Result<&'a str, ParseError> {
    let header = banner(title);

    let start = maptext
        .find(&header)
        .ok_or_else(|| ParseError::NotFound(title.to_lowercase()))?
        + header.len();

    let end = maptext[start..]
        .find(BLOCK_TERMINATOR)
        .map(|offset| start + offset)
        .ok_or_else(|| ParseError::NotFound(format!("end of {}", title.to_lowercase())))?;

    debug!("Found '{}' block ({} bytes)", title, end + 1 - start);

    Ok(&maptext[start..end + 1])
}

/// Extract the call tree block from map file content
pub fn extract_call_tree(maptext: &str) -> Result<&str, ParseError> {
    extract_block(maptext, CALL_TREE_TITLE)
}

/// Decode the call tree block into its ordered lines
///
/// **Public** - main entry point of the line decoder
///
/// Lines that match none of the annotation patterns (blank separators,
/// notes) are skipped. The remaining lines must be numbered 1, 2, 3...
/// in order; this is the only cross-line consistency check the format
/// offers.
///
/// # Errors
/// * `ParseError::IndexMismatch` - a printed index differs from its position
/// * `ParseError::InvalidNumber` - a numeric field does not fit
pub fn parse_call_tree(block: &str) -> Result<Vec<CallTreeLine>, ParseError> {
    let mut lines = Vec::new();

    for raw in block.lines() {
        if let Some(line) = decode_line(raw)? {
            lines.push(line);
        }
    }

    validate_positions(&lines)?;

    debug!("Decoded {} call tree lines", lines.len());

    Ok(lines)
}

/// Decode a single physical line, `None` if it is not a call tree entry
pub fn decode_line(raw: &str) -> Result<Option<CallTreeLine>, ParseError> {
    let Some(caps) = CALL_TREE_LINE.captures(raw) else {
        return Ok(None);
    };

    let index = parse_decimal(&caps["index"])?;
    let depth = marker_depth(&caps["level"]);

    let kind = if let Some(size) = caps.name("size") {
        LineKind::Size(parse_decimal(size.as_str())?)
    } else if let Some(reference) = caps.name("reference") {
        LineKind::Reference(parse_decimal(reference.as_str())?)
    } else {
        LineKind::Truncated
    };

    Ok(Some(CallTreeLine::new(index, depth, &caps["name"], kind)))
}

/// Nesting depth of an indentation run
///
/// Only `+` and `|` open a level; spaces and the `>` continuation marker
/// are padding.
pub fn marker_depth(level: &str) -> usize {
    level.chars().filter(|c| matches!(c, '+' | '|')).count()
}

/// Check that the line at position `p` is printed with index `p + 1`
///
/// Stops at the first mismatch.
pub fn validate_positions(lines: &[CallTreeLine]) -> Result<(), ParseError> {
    for (position, line) in lines.iter().enumerate() {
        let expected = position + 1;
        if line.index != expected {
            return Err(ParseError::IndexMismatch {
                expected,
                found: line.index,
            });
        }
    }
    Ok(())
}

/// Parse the rows of the Segments block
pub fn parse_segments(block: &str) -> Result<Vec<Segment>, ParseError> {
    let mut segments = Vec::new();

    for raw in block.lines() {
        if let Some(segment) = parse_table_row(raw)? {
            segments.push(segment);
        }
    }

    debug!("Parsed {} segments", segments.len());

    Ok(segments)
}

/// Parse the Modules block
///
/// A non-indented line ending with `:` opens a module, the `start .. end ..`
/// rows that follow are its sections.
pub fn parse_modules(block: &str) -> Result<Vec<Module>, ParseError> {
    let mut modules: Vec<Module> = Vec::new();

    for raw in block.lines() {
        if let Some(section) = parse_table_row(raw)? {
            match modules.last_mut() {
                Some(module) => module.segments.push(section),
                None => warn!("Section '{}' appears before any module, skipping", section.name),
            }
        } else if let Some(caps) = MODULE_HEADER.captures(raw) {
            modules.push(Module::new(caps["name"].trim()));
        }
    }

    debug!("Parsed {} modules", modules.len());

    Ok(modules)
}

/// Parse one `start HEX end HEX length DEC segment|section NAME` row
fn parse_table_row(raw: &str) -> Result<Option<Segment>, ParseError> {
    let Some(caps) = TABLE_ROW.captures(raw) else {
        return Ok(None);
    };

    let segment = Segment::new(
        &caps["name"],
        parse_hex(&caps["start"])?,
        parse_hex(&caps["end"])?,
    );

    let printed: u64 = parse_decimal(&caps["length"])?;
    if printed != segment.len() {
        warn!(
            "Length of '{}' is {} but printed as {}",
            segment.name,
            segment.len(),
            printed
        );
    }

    Ok(Some(segment))
}

fn parse_hex(value: &str) -> Result<u64, ParseError> {
    u64::from_str_radix(value, 16).map_err(|e| ParseError::InvalidNumber {
        value: value.to_string(),
        reason: e.to_string(),
    })
}

fn parse_decimal<T: std::str::FromStr<Err = std::num::ParseIntError>>(
    value: &str,
) -> Result<T, ParseError> {
    value.parse::<T>().map_err(|e| ParseError::InvalidNumber {
        value: value.to_string(),
        reason: e.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn wrap(title: &str, body: &str) -> String {
        format!("header text\n\n{}{}\n\n\n\ntrailer\n", banner(title), body)
    }

    #[test]
    fn test_banner_layout() {
        let banner = banner("Call tree");
        let lines: Vec<&str> = banner.lines().collect();
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0], format!("{}---------", " ".repeat(30)));
        assert_eq!(lines[1], format!("{}Call tree", " ".repeat(30)));
        assert_eq!(lines[2], lines[0]);
    }

    #[test]
    fn test_extract_block_boundaries() {
        let text = wrap(CALL_TREE_TITLE, "\n   1 > _main: (6)\n   2   + _init: (2)");
        let block = extract_call_tree(&text).unwrap();
        assert_eq!(block, "\n   1 > _main: (6)\n   2   + _init: (2)\n");
    }

    #[test]
    fn test_extract_block_missing_header() {
        let err = extract_call_tree("no call tree here\n\n\n\n").unwrap_err();
        assert_eq!(err, ParseError::NotFound("call tree".to_string()));
    }

    #[test]
    fn test_extract_block_missing_terminator() {
        let text = format!("{}   1 > _main: (6)\n", banner(CALL_TREE_TITLE));
        let err = extract_call_tree(&text).unwrap_err();
        assert!(matches!(err, ParseError::NotFound(_)));
    }

    #[test]
    fn test_extract_block_ignores_terminator_before_header() {
        let text = format!("\n\n\n\n{}x\n\n\n\n", banner(SEGMENTS_TITLE));
        assert_eq!(extract_block(&text, SEGMENTS_TITLE).unwrap(), "x\n");
    }

    #[test]
    fn test_decode_sized_line() {
        let line = decode_line("   3   | + _clock_setup: (4)").unwrap().unwrap();
        assert_eq!(line, CallTreeLine::new(3, 2, "_clock_setup", LineKind::Size(4)));
    }

    #[test]
    fn test_decode_reference_line() {
        let line = decode_line("  12   | + _helper --> 7").unwrap().unwrap();
        assert_eq!(line, CallTreeLine::new(12, 2, "_helper", LineKind::Reference(7)));

        let line = decode_line("  13   + _helper => 7").unwrap().unwrap();
        assert_eq!(line.kind, LineKind::Reference(7));
    }

    #[test]
    fn test_decode_truncated_line() {
        let line = decode_line("  20   | | + _deep ...").unwrap().unwrap();
        assert_eq!(line, CallTreeLine::new(20, 3, "_deep", LineKind::Truncated));
    }

    #[test]
    fn test_decode_parenthesized_name() {
        let line = decode_line("   5 > (_it_handler): (12)").unwrap().unwrap();
        assert_eq!(line.function, "_it_handler");
        assert_eq!(line.depth, 0);
        assert_eq!(line.stack_size(), Some(12));
    }

    #[test]
    fn test_decode_skips_non_entries() {
        assert_eq!(decode_line("").unwrap(), None);
        assert_eq!(decode_line("   some note").unwrap(), None);
    }

    #[test]
    fn test_depth_ignores_spaces_and_continuation() {
        let a = decode_line("   4   | + _f: (1)").unwrap().unwrap();
        let b = decode_line("   4 >>|      +   _f: (1)").unwrap().unwrap();
        assert_eq!(a.depth, 2);
        assert_eq!(a.depth, b.depth);
    }

    #[test]
    fn test_parse_call_tree_skips_blank_lines() {
        let block = "\n   1 > _main: (6)\n\n   2   + _init: (2)\n";
        let lines = parse_call_tree(block).unwrap();
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[1].index, 2);
        assert_eq!(lines[1].depth, 1);
    }

    #[test]
    fn test_parse_call_tree_index_mismatch() {
        let block = "   1 > _main: (6)\n   3   + _init: (2)\n   4   + _loop: (1)\n";
        let err = parse_call_tree(block).unwrap_err();
        assert_eq!(err, ParseError::IndexMismatch { expected: 2, found: 3 });
    }

    #[test]
    fn test_parse_segments() {
        let block = "\nstart 00000008 end 00003ae8 length 15072 segment const\nstart 40000000 end 4000a80c length 43020 segment sdata, initialized\n";
        let segments = parse_segments(block).unwrap();
        assert_eq!(segments.len(), 2);
        assert_eq!(segments[0], Segment::new("const", 0x8, 0x3ae8));
        assert_eq!(segments[1].name, "sdata, initialized");
        assert_eq!(segments[1].len(), 43020);
    }

    #[test]
    fn test_parse_modules() {
        let block = "\ncrts.o:\nstart 00008000 end 00008010 length    16 section .text\n\nmain.o:\nstart 00008010 end 00008030 length    32 section .text\nstart 00000000 end 00000004 length     4 section .bss\n";
        let modules = parse_modules(block).unwrap();
        assert_eq!(modules.len(), 2);
        assert_eq!(modules[0].name, "crts.o");
        assert_eq!(modules[1].segments.len(), 2);
        assert_eq!(modules[1].segments[1], Segment::new(".bss", 0, 4));
    }

    #[test]
    fn test_parse_modules_windows_path() {
        let block = "C:\\work\\obj\\main.o:\nstart 00008010 end 00008030 length    32 section .text\n";
        let modules = parse_modules(block).unwrap();
        assert_eq!(modules[0].name, "C:\\work\\obj\\main.o");
    }
}
