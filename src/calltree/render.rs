//! Indented text view of the call graph.

use super::graph::CallGraph;
use crate::utils::config::{RECURSION_MARKER, RENDER_INDENT};
use std::collections::HashSet;

impl CallGraph {
    /// Render the graph as an indented tree
    ///
    /// Roots come in name order and each callee is nested one
    /// `RENDER_INDENT` below its caller. A function shared by several
    /// callers is drawn in full under each of them. A call back into a
    /// function already open above is drawn once with `RECURSION_MARKER`
    /// and not expanded.
    ///
    /// # Example
    /// ```text
    /// main (6)
    ///     init (2)
    ///     loop (8)
    ///         loop (8) [recursive]
    /// ```
    pub fn render(&self) -> String {
        let mut lines: Vec<String> = Vec::new();
        let mut on_path: HashSet<&str> = HashSet::new();

        for root in &self.roots {
            self.render_node(root, 0, &mut on_path, &mut lines);
        }

        lines.join("\n")
    }

    fn render_node<'a>(
        &'a self,
        name: &'a str,
        level: usize,
        on_path: &mut HashSet<&'a str>,
        lines: &mut Vec<String>,
    ) {
        let indent = RENDER_INDENT.repeat(level);

        let Some(node) = self.functions.get(name) else {
            lines.push(format!("{indent}{name}"));
            return;
        };

        if on_path.contains(name) {
            lines.push(format!(
                "{indent}{name} ({}) {RECURSION_MARKER}",
                node.stack_size
            ));
            return;
        }

        lines.push(format!("{indent}{name} ({})", node.stack_size));

        on_path.insert(name);
        for callee in &node.callees {
            self.render_node(callee, level + 1, on_path, lines);
        }
        on_path.remove(name);
    }
}
