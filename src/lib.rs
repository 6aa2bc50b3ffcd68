//! Mapography
//!
//! Memory layout and worst-case stack analysis for embedded firmware,
//! read from the text map files produced by embedded toolchain linkers.
//!
//! The library reads three blocks of a map file:
//! - Segments: memory ranges of the final image
//! - Modules: the sections each object file contributes
//! - Call tree: the call hierarchy with per-function stack frames
//!
//! The call tree is rebuilt into a [`calltree::CallGraph`] that can list
//! every call path with its stack cost, report the worst case, and render
//! itself as an indented tree.
//!
//! ## Getting Started
//!
//! ```bash
//! mapography cosmic calls longest firmware.map
//! mapography -o sizes.txt cosmic modules sizes firmware.map
//! ```

pub mod calltree;
pub mod commands;
pub mod layout;
pub mod output;
pub mod parser;
pub mod utils;
