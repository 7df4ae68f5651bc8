//! In-memory content tables.
//!
//! [`ContentTables`] is the one concrete registry: loaders fill it once and
//! every pure function reads it through the oracle traits.

use std::collections::BTreeMap;

use super::{
    AbilityDefinition, AbilityOracle, CharacterOracle, ItemDefinition, ItemOracle, NodeDefinition,
    NodeOracle, PerkDefinition, RaceDefinition, RaceVariant, SlotRules, SourceDefinition,
};

/// Immutable content registry keyed by id.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default, rename_all = "camelCase"))]
pub struct ContentTables {
    pub stats: Vec<NodeDefinition>,
    pub resources: Vec<NodeDefinition>,
    pub perks: BTreeMap<String, PerkDefinition>,
    pub races: Vec<RaceDefinition>,
    pub origins: Vec<SourceDefinition>,
    pub factions: Vec<SourceDefinition>,
    pub items: BTreeMap<String, ItemDefinition>,
    pub abilities: BTreeMap<String, AbilityDefinition>,
    pub slot_rules: SlotRules,
}

impl ContentTables {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_stat(mut self, node: NodeDefinition) -> Self {
        self.stats.push(node);
        self
    }

    pub fn with_resource(mut self, node: NodeDefinition) -> Self {
        self.resources.push(node);
        self
    }

    pub fn with_perk(mut self, perk: PerkDefinition) -> Self {
        self.perks.insert(perk.id.clone(), perk);
        self
    }

    pub fn with_race(mut self, race: RaceDefinition) -> Self {
        self.races.push(race);
        self
    }

    pub fn with_origin(mut self, origin: SourceDefinition) -> Self {
        self.origins.push(origin);
        self
    }

    pub fn with_faction(mut self, faction: SourceDefinition) -> Self {
        self.factions.push(faction);
        self
    }

    pub fn with_item(mut self, item: ItemDefinition) -> Self {
        self.items.insert(item.id.clone(), item);
        self
    }

    pub fn with_ability(mut self, ability: AbilityDefinition) -> Self {
        self.abilities.insert(ability.id.clone(), ability);
        self
    }

    pub fn with_slot_rules(mut self, rules: SlotRules) -> Self {
        self.slot_rules = rules;
        self
    }
}

impl NodeOracle for ContentTables {
    fn stat_nodes(&self) -> &[NodeDefinition] {
        &self.stats
    }

    fn resource_nodes(&self) -> &[NodeDefinition] {
        &self.resources
    }
}

impl CharacterOracle for ContentTables {
    fn perk(&self, id: &str) -> Option<&PerkDefinition> {
        self.perks.get(id)
    }

    fn race_variant(&self, variant_id: &str) -> Option<&RaceVariant> {
        self.races
            .iter()
            .flat_map(|race| race.variants.iter())
            .find(|variant| variant.id == variant_id)
    }

    fn origin(&self, key: &str) -> Option<&SourceDefinition> {
        self.origins.iter().find(|o| o.matches(key))
    }

    fn faction(&self, key: &str) -> Option<&SourceDefinition> {
        self.factions.iter().find(|f| f.matches(key))
    }
}

impl ItemOracle for ContentTables {
    fn item(&self, id: &str) -> Option<&ItemDefinition> {
        self.items.get(id)
    }

    fn slot_rules(&self) -> &SlotRules {
        &self.slot_rules
    }
}

impl AbilityOracle for ContentTables {
    fn ability(&self, id: &str) -> Option<&AbilityDefinition> {
        self.abilities.get(id)
    }
}
