//! Data types extracted from map files.
//!
//! Segments and modules are plain value objects consumed by the report
//! commands. `CallTreeLine` is the transient record produced by the call
//! tree decoder and consumed by the graph builder.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A contiguous named address range
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Segment {
    pub name: String,
    pub start: u64,
    pub end: u64,
}

impl Segment {
    pub fn new(name: impl Into<String>, start: u64, end: u64) -> Self {
        Self {
            name: name.into(),
            start,
            end,
        }
    }

    /// Length in bytes (`end - start`)
    pub fn len(&self) -> u64 {
        self.end.saturating_sub(self.start)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl fmt::Display for Segment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Segment '{}', start {:#x}, end {:#x}, length {}",
            self.name,
            self.start,
            self.end,
            self.len()
        )
    }
}

/// A compilation unit and the sections it contributes
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Module {
    pub name: String,
    pub segments: Vec<Segment>,
}

impl Module {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            segments: Vec::new(),
        }
    }

    /// Total bytes over all sections of the module
    pub fn total_size(&self) -> u64 {
        self.segments.iter().map(Segment::len).sum()
    }
}

impl fmt::Display for Module {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Module '{}', {} bytes", self.name, self.total_size())?;
        for segment in &self.segments {
            write!(f, "\n    {}", segment)?;
        }
        Ok(())
    }
}

/// Trailing annotation of a call tree line
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LineKind {
    /// `(<digits>)`: own stack frame size, first printed occurrence
    Size(u32),

    /// `--> <digits>`: the subtree was already printed at that index
    Reference(usize),

    /// `...`: output was cut short by the linker
    Truncated,
}

/// One decoded line of the call tree block
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CallTreeLine {
    /// 1-based position as printed
    pub index: usize,

    /// Nesting level, 0 for roots
    pub depth: usize,

    pub function: String,

    pub kind: LineKind,
}

impl CallTreeLine {
    pub fn new(index: usize, depth: usize, function: impl Into<String>, kind: LineKind) -> Self {
        Self {
            index,
            depth,
            function: function.into(),
            kind,
        }
    }

    pub fn stack_size(&self) -> Option<u32> {
        match self.kind {
            LineKind::Size(size) => Some(size),
            _ => None,
        }
    }
}
