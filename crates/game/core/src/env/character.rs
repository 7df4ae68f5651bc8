//! Character creation content: races, origins, factions and perks.
//!
//! Each source contributes a base stat block plus a list of granted perk ids.
//! Origins and factions are levelled; races are picked by variant.

use std::collections::BTreeMap;

/// Additive per-id numeric contributions (stat id → amount).
pub type StatBlock = BTreeMap<String, f64>;

/// Static perk definition.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default, rename_all = "camelCase"))]
pub struct PerkDefinition {
    pub id: String,
    pub name: String,
    pub stats: StatBlock,
    /// Resources that become tracked while this perk is held.
    pub unlock_resources: Vec<String>,
    /// Abilities granted while this perk is held.
    pub unlock_abilities: Vec<String>,
}

/// Which character-creation source granted a perk.
#[derive(
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    strum::Display,
    strum::EnumString,
    strum::AsRefStr,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum PerkSource {
    Race,
    Origin,
    Faction,
}

#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default, rename_all = "camelCase"))]
pub struct RaceDefinition {
    pub id: String,
    pub name: String,
    pub variants: Vec<RaceVariant>,
}

#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default, rename_all = "camelCase"))]
pub struct RaceVariant {
    pub id: String,
    pub name: String,
    pub stats: StatBlock,
    pub perks: Vec<String>,
}

/// A levelled source: origins and factions share this shape.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default, rename_all = "camelCase"))]
pub struct SourceDefinition {
    pub id: String,
    pub name: String,
    pub levels: Vec<SourceLevel>,
}

#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default, rename_all = "camelCase"))]
pub struct SourceLevel {
    pub level: u32,
    pub stats: StatBlock,
    pub perks: Vec<String>,
}

impl SourceDefinition {
    /// Returns true if `key` names this source by id or (case-insensitively) by name.
    pub fn matches(&self, key: &str) -> bool {
        self.id == key || self.name.eq_ignore_ascii_case(key)
    }

    /// Exact level if defined, otherwise the highest level below it.
    pub fn level(&self, level: u32) -> Option<&SourceLevel> {
        self.levels
            .iter()
            .find(|l| l.level == level)
            .or_else(|| {
                self.levels
                    .iter()
                    .filter(|l| l.level < level)
                    .max_by_key(|l| l.level)
            })
    }
}
