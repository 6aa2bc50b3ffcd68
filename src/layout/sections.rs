//! Per-section size breakdown across modules.

use crate::parser::schema::Module;
use log::debug;
use serde::Serialize;
use std::collections::BTreeSet;
use std::fmt;

/// One module's contribution to a section
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ModuleShare {
    pub module: String,
    pub size: u64,
}

/// Modules contributing to one section name, biggest first
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SectionUsage {
    pub name: String,
    pub modules: Vec<ModuleShare>,
}

impl SectionUsage {
    pub fn total_size(&self) -> u64 {
        self.modules.iter().map(|m| m.size).sum()
    }
}

impl fmt::Display for SectionUsage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:", self.name)?;
        for share in &self.modules {
            write!(f, "\n{} ({})", share.module, share.size)?;
        }
        Ok(())
    }
}

/// Group module sections by section name
///
/// **Public** - main entry point for the modules sizes report
///
/// # Returns
/// One entry per section name. Sections whose name starts with a letter
/// come first, then the rest (`.text`, `.bss`...), each group sorted by
/// name. Within a section, modules are sorted by size, largest first,
/// keeping map order on ties. Only the first section of a given name is
/// counted for each module.
pub fn section_sizes(modules: &[Module]) -> Vec<SectionUsage> {
    let names: BTreeSet<&str> = modules
        .iter()
        .flat_map(|m| m.segments.iter().map(|s| s.name.as_str()))
        .collect();

    let mut sections: Vec<SectionUsage> = names
        .into_iter()
        .map(|name| {
            let mut shares: Vec<ModuleShare> = modules
                .iter()
                .filter_map(|m| {
                    m.segments.iter().find(|s| s.name == name).map(|s| ModuleShare {
                        module: m.name.clone(),
                        size: s.len(),
                    })
                })
                .collect();
            shares.sort_by(|a, b| b.size.cmp(&a.size));

            SectionUsage {
                name: name.to_string(),
                modules: shares,
            }
        })
        .collect();

    sections.sort_by_key(|s| (!starts_alphabetic(&s.name), s.name.clone()));

    debug!("Grouped {} modules into {} sections", modules.len(), sections.len());

    sections
}

fn starts_alphabetic(name: &str) -> bool {
    name.chars().next().is_some_and(char::is_alphabetic)
}
