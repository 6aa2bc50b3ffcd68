//! Memory layout summaries built from parsed modules.
//!
//! This module regroups module sections by section name so the
//! biggest contributors to each section are easy to spot.

pub mod sections;

pub use sections::{section_sizes, ModuleShare, SectionUsage};
