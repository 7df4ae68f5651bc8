//! Equipment slot rules loader.

use std::path::Path;

use idle_core::SlotRules;

use crate::loaders::{LoadResult, read_file};

/// Loader for the item type → equipment slot table.
///
/// ```toml
/// [typeSlots]
/// hat = "head"
///
/// [typePresets.sword]
/// slot = "weaponOuter1"
/// ```
///
/// A table that is left out keeps the built-in one.
pub struct TablesLoader;

impl TablesLoader {
    pub fn load(path: &Path) -> LoadResult<SlotRules> {
        let content = read_file(path)?;
        Self::parse(&content)
    }

    pub fn parse(content: &str) -> LoadResult<SlotRules> {
        toml::from_str(content)
            .map_err(|e| anyhow::anyhow!("Failed to parse slot tables TOML: {}", e))
    }
}
