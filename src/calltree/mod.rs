//! Call graph reconstruction and stack usage analysis.
//!
//! This module turns decoded call tree lines into:
//! - A call graph of named functions with their own stack frame sizes
//! - Every root-to-leaf call path with its summed stack cost
//! - The worst-case (deepest stack) path
//! - An indented text rendering of the graph

pub mod graph;
pub mod paths;
pub mod render;

// Re-export main types
pub use graph::{CallGraph, FunctionNode};
pub use paths::{CallPath, PathFrame};
