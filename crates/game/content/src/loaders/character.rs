//! Character-creation content loader: races, origins, factions and perks.

use std::path::Path;

use idle_core::env::{PerkDefinition, RaceDefinition, SourceDefinition};
use serde::{Deserialize, Serialize};

use crate::loaders::{LoadResult, read_file};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CharacterCatalog {
    pub perks: Vec<PerkDefinition>,
    pub races: Vec<RaceDefinition>,
    pub origins: Vec<SourceDefinition>,
    pub factions: Vec<SourceDefinition>,
}

pub struct CharacterLoader;

impl CharacterLoader {
    pub fn load(path: &Path) -> LoadResult<CharacterCatalog> {
        let content = read_file(path)?;
        Self::parse(&content)
    }

    /// Parses the catalog. Perk ids referenced by a source but not defined
    /// are accepted; the aggregator skips them.
    pub fn parse(content: &str) -> LoadResult<CharacterCatalog> {
        ron::from_str(content)
            .map_err(|e| anyhow::anyhow!("Failed to parse character RON: {}", e))
    }
}
