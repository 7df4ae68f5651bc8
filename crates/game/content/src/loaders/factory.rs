//! Content factory for building the content registry from data files.

use std::path::{Path, PathBuf};

use idle_core::{ContentTables, GameConfig, SlotRules};

use crate::loaders::{
    AbilityLoader, CharacterCatalog, CharacterLoader, ConfigLoader, ItemLoader, LoadResult,
    NodeCatalog, NodeLoader, TablesLoader,
};

/// Content factory that loads all game content from a data directory.
///
/// # Directory Structure
///
/// ```text
/// data_dir/
/// ├── config.toml      (optional)
/// ├── tables.toml      (optional)
/// ├── nodes.ron
/// ├── character.ron
/// ├── items.ron
/// └── abilities.ron
/// ```
pub struct ContentFactory {
    data_dir: PathBuf,
}

impl ContentFactory {
    /// Creates a new content factory pointing to a data directory.
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
        }
    }

    /// Load game configuration from `config.toml`, or defaults if absent.
    pub fn load_config(&self) -> LoadResult<GameConfig> {
        let path = self.data_dir.join("config.toml");
        if !path.exists() {
            return Ok(GameConfig::default());
        }
        ConfigLoader::load(&path)
    }

    /// Load equipment slot rules from `tables.toml`, or the built-in table if absent.
    pub fn load_slot_rules(&self) -> LoadResult<SlotRules> {
        let path = self.data_dir.join("tables.toml");
        if !path.exists() {
            return Ok(SlotRules::default());
        }
        TablesLoader::load(&path)
    }

    /// Load stat and resource nodes from `nodes.ron`.
    pub fn load_nodes(&self) -> LoadResult<NodeCatalog> {
        NodeLoader::load(&self.data_dir.join("nodes.ron"))
    }

    /// Load races, origins, factions and perks from `character.ron`.
    pub fn load_character(&self) -> LoadResult<CharacterCatalog> {
        CharacterLoader::load(&self.data_dir.join("character.ron"))
    }

    /// Load item catalog from `items.ron`.
    pub fn load_items(&self) -> LoadResult<Vec<idle_core::ItemDefinition>> {
        ItemLoader::load(&self.data_dir.join("items.ron"))
    }

    /// Load abilities from `abilities.ron`.
    pub fn load_abilities(&self) -> LoadResult<Vec<idle_core::AbilityDefinition>> {
        AbilityLoader::load(&self.data_dir.join("abilities.ron"))
    }

    /// Loads every table into one registry.
    pub fn load_content(&self) -> LoadResult<ContentTables> {
        let nodes = self.load_nodes()?;
        let character = self.load_character()?;

        let mut tables = ContentTables::new().with_slot_rules(self.load_slot_rules()?);
        tables.stats = nodes.stats;
        tables.resources = nodes.resources;
        tables.races = character.races;
        tables.origins = character.origins;
        tables.factions = character.factions;

        let tables = character
            .perks
            .into_iter()
            .fold(tables, ContentTables::with_perk);
        let tables = self
            .load_items()?
            .into_iter()
            .fold(tables, ContentTables::with_item);
        let tables = self
            .load_abilities()?
            .into_iter()
            .fold(tables, ContentTables::with_ability);

        Ok(tables)
    }

    /// Returns the data directory path.
    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }
}
