//! Constants describing the map file layout and output conventions.

/// Current JSON report schema version
pub const SCHEMA_VERSION: &str = "1.0.0";

/// Block banners are indented by this many spaces on each of their three lines
pub const BANNER_INDENT: usize = 30;

/// Blank-line run that closes every block
pub const BLOCK_TERMINATOR: &str = "\n\n\n\n";

// Block titles as printed in the banners
pub const SEGMENTS_TITLE: &str = "Segments";
pub const MODULES_TITLE: &str = "Modules";
pub const CALL_TREE_TITLE: &str = "Call tree";

/// One nesting level in the rendered call tree
pub const RENDER_INDENT: &str = "    ";

/// Appended to a rendered node whose subtree is already open above it
pub const RECURSION_MARKER: &str = "[recursive]";
