//! Traits describing read-only content.
//!
//! Oracles expose node definitions, character-creation sources, item
//! definitions and abilities. Content is loaded once and injected into the
//! pure functions of this crate; nothing here is a global.
mod abilities;
mod character;
mod items;
mod nodes;
mod tables;

pub use abilities::{AbilityDefinition, AbilityKind, BuffSpec};
pub use character::{
    PerkDefinition, PerkSource, RaceDefinition, RaceVariant, SourceDefinition, SourceLevel,
    StatBlock,
};
pub use items::{
    ItemDefinition, ItemEffect, RawItemDefinition, SlotRules, TypePreset, item_types, slot_ids,
};
pub use nodes::{Modifier, ModifierKind, NodeDefinition};
pub use tables::ContentTables;

/// Stat and resource node definitions.
pub trait NodeOracle {
    fn stat_nodes(&self) -> &[NodeDefinition];

    fn resource_nodes(&self) -> &[NodeDefinition];

    fn resource_node(&self, id: &str) -> Option<&NodeDefinition> {
        self.resource_nodes().iter().find(|node| node.id == id)
    }
}

/// Races, origins, factions and the perks they grant.
pub trait CharacterOracle {
    fn perk(&self, id: &str) -> Option<&PerkDefinition>;

    /// Looks up a race variant by its id across all races.
    fn race_variant(&self, variant_id: &str) -> Option<&RaceVariant>;

    /// Looks up an origin by id or name.
    fn origin(&self, key: &str) -> Option<&SourceDefinition>;

    /// Looks up a faction by id or name.
    fn faction(&self, key: &str) -> Option<&SourceDefinition>;
}

pub trait ItemOracle {
    fn item(&self, id: &str) -> Option<&ItemDefinition>;

    fn slot_rules(&self) -> &SlotRules;
}

pub trait AbilityOracle {
    fn ability(&self, id: &str) -> Option<&AbilityDefinition>;
}

/// Everything the simulation reads from content.
pub trait ContentOracle: NodeOracle + CharacterOracle + ItemOracle + AbilityOracle {}

impl<T> ContentOracle for T where T: NodeOracle + CharacterOracle + ItemOracle + AbilityOracle {}
