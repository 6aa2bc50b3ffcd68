//! Rebuild the call graph from the indentation-coded call tree.
//!
//! The call tree prints each function's subtree the first time it is
//! reached and a back-reference (`--> n`) on every later call site. A line's
//! caller is the closest line above it that is one level shallower, so the
//! graph is rebuilt in a single forward pass over a stack of open callers.

use crate::parser::schema::{CallTreeLine, LineKind};
use crate::utils::error::ParseError;
use log::{debug, warn};
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};

/// A function in the call graph
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FunctionNode {
    pub name: String,

    /// Own stack frame size in bytes, callees excluded
    pub stack_size: u32,

    /// Names of the functions called directly
    pub callees: BTreeSet<String>,

    /// Called through a function pointer. The COSMIC call tree carries no
    /// such marker, so this stays false for parsed maps.
    pub is_indirect: bool,

    /// Reaches itself through its callees
    pub is_recursive: bool,
}

impl FunctionNode {
    pub fn new(name: impl Into<String>, stack_size: u32) -> Self {
        Self {
            name: name.into(),
            stack_size,
            callees: BTreeSet::new(),
            is_indirect: false,
            is_recursive: false,
        }
    }
}

/// Functions keyed by name, plus the entry points of the call tree
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CallGraph {
    pub functions: BTreeMap<String, FunctionNode>,
    pub roots: BTreeSet<String>,
}

impl CallGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build the graph from validated call tree lines
    ///
    /// **Public** - main entry point of the graph builder
    ///
    /// # Algorithm
    /// 1. Declare a node for every line carrying a stack size
    /// 2. Walk the lines keeping the stack of open callers indexed by depth
    /// 3. Connect each non-root line to the open caller one level up
    /// 4. Flag every function that can reach itself as recursive
    ///
    /// # Errors
    /// * `ParseError::UndeclaredFunction` - a line names a function never
    ///   printed with a size
    /// * `ParseError::InvalidDepth` - a line is nested deeper than its
    ///   open callers allow
    pub fn from_lines(lines: &[CallTreeLine]) -> Result<Self, ParseError> {
        let mut graph = Self::new();

        for line in lines {
            if let LineKind::Size(size) = line.kind {
                graph.declare(&line.function, size);
            }
        }

        debug!("Declared {} functions", graph.functions.len());

        // open[d] is the line currently open at depth d
        let mut open: Vec<&CallTreeLine> = Vec::new();

        for line in lines {
            if let LineKind::Reference(target) = line.kind {
                check_reference(lines, line, target);
            }

            if line.depth == 0 {
                graph.add_root(&line.function)?;
                open.clear();
                open.push(line);
                continue;
            }

            if open.len() < line.depth {
                return Err(ParseError::InvalidDepth {
                    index: line.index,
                    depth: line.depth,
                    open: open.len(),
                });
            }

            open.truncate(line.depth);
            let caller = open[line.depth - 1];
            graph.connect(&line.function, &caller.function)?;
            open.push(line);
        }

        graph.mark_recursion();

        debug!(
            "Built call graph: {} functions, {} roots",
            graph.functions.len(),
            graph.roots.len()
        );

        Ok(graph)
    }

    /// Create or overwrite the node for `name`
    pub fn declare(&mut self, name: &str, stack_size: u32) {
        if let Some(previous) = self.functions.get(name) {
            if previous.stack_size != stack_size {
                warn!(
                    "Function '{}' declared again with stack size {} (was {})",
                    name, stack_size, previous.stack_size
                );
            }
        }
        self.functions
            .insert(name.to_string(), FunctionNode::new(name, stack_size));
    }

    /// Register a declared function as an entry point
    pub fn add_root(&mut self, name: &str) -> Result<(), ParseError> {
        if !self.functions.contains_key(name) {
            return Err(ParseError::UndeclaredFunction(name.to_string()));
        }
        self.roots.insert(name.to_string());
        Ok(())
    }

    /// Record that `caller` calls `callee`
    ///
    /// Both must be declared; on error the graph is left untouched.
    pub fn connect(&mut self, callee: &str, caller: &str) -> Result<(), ParseError> {
        if !self.functions.contains_key(callee) {
            return Err(ParseError::UndeclaredFunction(callee.to_string()));
        }
        let node = self
            .functions
            .get_mut(caller)
            .ok_or_else(|| ParseError::UndeclaredFunction(caller.to_string()))?;
        node.callees.insert(callee.to_string());
        Ok(())
    }

    pub fn get(&self, name: &str) -> Option<&FunctionNode> {
        self.functions.get(name)
    }

    pub fn len(&self) -> usize {
        self.functions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.functions.is_empty()
    }

    /// Set `is_recursive` on every function that reaches itself
    fn mark_recursion(&mut self) {
        let recursive: Vec<String> = self
            .functions
            .keys()
            .filter(|name| self.reaches(name, name))
            .cloned()
            .collect();

        for name in &recursive {
            if let Some(node) = self.functions.get_mut(name) {
                node.is_recursive = true;
            }
        }

        if !recursive.is_empty() {
            debug!("Recursive functions: {}", recursive.join(", "));
        }
    }

    /// Whether `target` is reachable from the callees of `from`
    fn reaches(&self, from: &str, target: &str) -> bool {
        let mut seen: BTreeSet<&str> = BTreeSet::new();
        let mut pending: Vec<&str> = vec![from];

        while let Some(name) = pending.pop() {
            let Some(node) = self.functions.get(name) else {
                continue;
            };
            for callee in &node.callees {
                if callee == target {
                    return true;
                }
                if seen.insert(callee.as_str()) {
                    pending.push(callee.as_str());
                }
            }
        }
        false
    }
}

/// Warn when a back-reference does not point at a sized line of the same function
fn check_reference(lines: &[CallTreeLine], line: &CallTreeLine, target: usize) {
    let points_back = target
        .checked_sub(1)
        .and_then(|position| lines.get(position))
        .filter(|referenced| referenced.index < line.index)
        .is_some_and(|referenced| {
            referenced.function == line.function && referenced.stack_size().is_some()
        });

    if !points_back {
        warn!(
            "Line {}: reference to {} does not point at an earlier declaration of '{}'",
            line.index, target, line.function
        );
    }
}
