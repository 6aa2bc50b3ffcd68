//! Enumerate call paths and find the worst-case stack usage.
//!
//! A call path runs from a root to a function with nothing left to call.
//! Its cost is the sum of the own stack frames along the way, which is the
//! stack depth reached when that chain of calls is active.

use super::graph::CallGraph;
use log::debug;
use serde::Serialize;
use std::cmp::Ordering;
use std::collections::HashSet;
use std::fmt;

/// One function on a call path
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PathFrame {
    pub name: String,
    pub stack_size: u32,
}

/// A root-to-leaf chain of calls and its total stack usage
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CallPath {
    pub frames: Vec<PathFrame>,
    pub total_stack_size: u64,
}

impl CallPath {
    /// Path with no frames and zero cost
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn from_frames(frames: Vec<PathFrame>) -> Self {
        let total_stack_size = frames.iter().map(|f| u64::from(f.stack_size)).sum();
        Self {
            frames,
            total_stack_size,
        }
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.frames.iter().map(|f| f.name.as_str())
    }

    pub fn len(&self) -> usize {
        self.frames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    /// Heaviest first, then by the ordered name sequence
    fn rank(&self, other: &Self) -> Ordering {
        other
            .total_stack_size
            .cmp(&self.total_stack_size)
            .then_with(|| self.names().cmp(other.names()))
    }
}

impl fmt::Display for CallPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let names: Vec<&str> = self.names().collect();
        write!(f, "{} ({})", names.join(" -> "), self.total_stack_size)
    }
}

impl CallGraph {
    /// Every root-to-leaf call path, heaviest first
    ///
    /// **Public** - main entry point for stack analysis
    ///
    /// A function already on the current path is not entered again, so
    /// recursive calls end the branch instead of looping. A function
    /// reached twice through different callers counts on each path.
    pub fn enumerate_paths(&self) -> Vec<CallPath> {
        let mut paths = Vec::new();
        let mut current: Vec<PathFrame> = Vec::new();
        let mut on_path: HashSet<&str> = HashSet::new();

        for root in &self.roots {
            self.walk(root, &mut current, &mut on_path, &mut paths);
        }

        paths.sort_by(CallPath::rank);

        debug!("Enumerated {} call paths", paths.len());

        paths
    }

    /// The path with the largest total stack usage
    ///
    /// Empty with cost 0 when the graph has no roots.
    pub fn longest_path(&self) -> CallPath {
        self.enumerate_paths()
            .into_iter()
            .next()
            .unwrap_or_else(CallPath::empty)
    }

    fn walk<'a>(
        &'a self,
        name: &'a str,
        current: &mut Vec<PathFrame>,
        on_path: &mut HashSet<&'a str>,
        paths: &mut Vec<CallPath>,
    ) {
        let Some(node) = self.functions.get(name) else {
            return;
        };

        current.push(PathFrame {
            name: node.name.clone(),
            stack_size: node.stack_size,
        });
        on_path.insert(name);

        let mut is_leaf = true;
        for callee in &node.callees {
            if on_path.contains(callee.as_str()) {
                continue;
            }
            is_leaf = false;
            self.walk(callee, current, on_path, paths);
        }

        if is_leaf {
            paths.push(CallPath::from_frames(current.clone()));
        }

        on_path.remove(name);
        current.pop();
    }
}
