//! Item definitions, declarative item effects, and equipment slot rules.
//!
//! # Design: Normalize at the Boundary
//!
//! Content tables describe item kinds loosely: some records carry a single
//! `type`, others a `types` list, and `slot` is optional. Deserialization goes
//! through [`RawItemDefinition`] and always produces one canonical
//! [`ItemDefinition`] shape, so equip resolution never inspects raw data.
//!
//! Effects are externally tagged, one variant per effect type:
//!
//! ```text
//! effects: [
//!     restore_resource(resourceId: "stamina", amount: 4.0),
//!     unlock_skills(abilityIds: ["dig"], learnAll: false),
//! ]
//! ```
//!
//! Unrecognized effect types are accepted as bare identifiers and load as
//! [`ItemEffect::Unknown`].

use std::collections::BTreeMap;

use super::character::StatBlock;

/// Well-known equipment slot ids.
pub mod slot_ids {
    pub const HEAD: &str = "head";
    pub const NECK: &str = "neck";
    pub const CHEST: &str = "chest";
    pub const BACK: &str = "back";
    pub const HANDS: &str = "hands";
    pub const LEGS: &str = "legs";
    pub const FEET: &str = "feet";
    pub const RING_LEFT: &str = "ringLeft";
    pub const RING_RIGHT: &str = "ringRight";
    pub const EARRING_LEFT: &str = "earringLeft";
    pub const EARRING_RIGHT: &str = "earringRight";
    pub const WEAPON_OUTER_1: &str = "weaponOuter1";
    pub const WEAPON_OUTER_2: &str = "weaponOuter2";
    pub const BAG: &str = "bag";
}

/// Item type tags with special meaning to the inventory.
pub mod item_types {
    pub const BAG: &str = "bag";
    pub const HELMET: &str = "helmet";
}

/// Canonical item definition.
///
/// # Stacking
///
/// `max_stack` is optional in content; [`crate::GameConfig::default_max_stack`]
/// applies when it is absent. Bags never stack regardless of the declared value.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(
    feature = "serde",
    serde(from = "RawItemDefinition", rename_all = "camelCase")
)]
pub struct ItemDefinition {
    pub id: String,
    pub name: String,
    pub slot: Option<String>,
    pub types: Vec<String>,
    pub max_stack: Option<u32>,
    /// Slot count for bag items.
    pub capacity: Option<usize>,
    /// Stat bonuses granted while equipped.
    pub stats: StatBlock,
    pub effects: Vec<ItemEffect>,
}

impl ItemDefinition {
    pub fn new(id: impl Into<String>) -> Self {
        let id = id.into();
        Self {
            name: id.clone(),
            id,
            ..Default::default()
        }
    }

    pub fn with_slot(mut self, slot: impl Into<String>) -> Self {
        self.slot = Some(slot.into());
        self
    }

    pub fn with_type(mut self, ty: impl Into<String>) -> Self {
        self.types.push(ty.into());
        self
    }

    pub fn with_max_stack(mut self, max_stack: u32) -> Self {
        self.max_stack = Some(max_stack);
        self
    }

    pub fn with_capacity(mut self, capacity: usize) -> Self {
        self.capacity = Some(capacity);
        self
    }

    pub fn with_stat(mut self, stat: impl Into<String>, value: f64) -> Self {
        self.stats.insert(stat.into(), value);
        self
    }

    pub fn with_effect(mut self, effect: ItemEffect) -> Self {
        self.effects.push(effect);
        self
    }

    pub fn has_type(&self, ty: &str) -> bool {
        self.types.iter().any(|t| t == ty)
    }

    /// Bags are containers: typed `bag` or pinned to the `bag` slot.
    pub fn is_bag(&self) -> bool {
        self.has_type(item_types::BAG) || self.slot.as_deref() == Some(slot_ids::BAG)
    }

    /// Stack limit, never below 1. Bags are always unique.
    pub fn max_stack_or(&self, default: u32) -> u32 {
        if self.is_bag() {
            return 1;
        }
        self.max_stack.unwrap_or(default).max(1)
    }
}

/// Loose on-disk item shape, converted into [`ItemDefinition`].
#[derive(Clone, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default, rename_all = "camelCase"))]
pub struct RawItemDefinition {
    pub id: String,
    pub name: Option<String>,
    pub slot: Option<String>,
    #[cfg_attr(
        feature = "serde",
        serde(rename = "type", deserialize_with = "non_empty_string")
    )]
    pub single_type: Option<String>,
    pub types: Vec<String>,
    pub max_stack: Option<u32>,
    pub capacity: Option<usize>,
    pub stats: StatBlock,
    pub effects: Vec<ItemEffect>,
}

/// Reads a bare string as `Some`, treating `""` as absent.
#[cfg(feature = "serde")]
fn non_empty_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    use serde::Deserialize;

    let value = String::deserialize(deserializer)?;
    Ok(Some(value).filter(|v| !v.is_empty()))
}

impl From<RawItemDefinition> for ItemDefinition {
    fn from(raw: RawItemDefinition) -> Self {
        let mut types = raw.types;
        if let Some(single) = raw.single_type.filter(|t| !types.contains(t)) {
            types.insert(0, single);
        }
        let stats = raw
            .stats
            .into_iter()
            .filter(|(_, v)| v.is_finite())
            .collect();

        Self {
            name: raw.name.unwrap_or_else(|| raw.id.clone()),
            id: raw.id,
            slot: raw.slot.filter(|s| !s.is_empty()),
            types,
            max_stack: raw.max_stack,
            capacity: raw.capacity,
            stats,
            effects: raw.effects,
        }
    }
}

/// Declarative effect applied when an item is used.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum ItemEffect {
    /// Add `amount` to a resource's current value.
    RestoreResource {
        #[cfg_attr(feature = "serde", serde(rename = "resourceId", alias = "resource"))]
        resource_id: String,
        #[cfg_attr(feature = "serde", serde(default))]
        amount: f64,
    },

    /// Unlock the skill screen and optionally teach abilities.
    UnlockSkills {
        #[cfg_attr(
            feature = "serde",
            serde(default, rename = "abilityIds", alias = "learnAbilityIds")
        )]
        ability_ids: Vec<String>,
        #[cfg_attr(
            feature = "serde",
            serde(default, rename = "learnAll", alias = "learnAllAbilities")
        )]
        learn_all: bool,
    },

    /// Effect types this version does not interpret.
    #[cfg_attr(feature = "serde", serde(other))]
    Unknown,
}

/// Type-driven equipment slot table.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default, rename_all = "camelCase"))]
pub struct SlotRules {
    /// Item type → slot id.
    pub type_slots: BTreeMap<String, String>,
    /// Item type → preset; a preset may name its own slot.
    pub type_presets: BTreeMap<String, TypePreset>,
}

#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default, rename_all = "camelCase"))]
pub struct TypePreset {
    pub slot: Option<String>,
}

impl SlotRules {
    pub fn empty() -> Self {
        Self {
            type_slots: BTreeMap::new(),
            type_presets: BTreeMap::new(),
        }
    }

    pub fn with_type_slot(mut self, ty: impl Into<String>, slot: impl Into<String>) -> Self {
        self.type_slots.insert(ty.into(), slot.into());
        self
    }

    pub fn with_preset(mut self, ty: impl Into<String>, slot: Option<&str>) -> Self {
        self.type_presets.insert(
            ty.into(),
            TypePreset {
                slot: slot.map(str::to_string),
            },
        );
        self
    }

    /// Direct mapping first, then the type preset's slot.
    pub fn slot_for_type(&self, ty: &str) -> Option<&str> {
        self.type_slots
            .get(ty)
            .map(String::as_str)
            .or_else(|| self.type_presets.get(ty).and_then(|p| p.slot.as_deref()))
    }
}

impl Default for SlotRules {
    fn default() -> Self {
        use slot_ids::*;

        // `helmet` is intentionally absent: the head fallback covers it.
        Self::empty()
            .with_type_slot("hat", HEAD)
            .with_type_slot("amulet", NECK)
            .with_type_slot("armor", CHEST)
            .with_type_slot("chest", CHEST)
            .with_type_slot("cloak", BACK)
            .with_type_slot("gloves", HANDS)
            .with_type_slot("legs", LEGS)
            .with_type_slot("boots", FEET)
            .with_type_slot("ring", RING_LEFT)
            .with_type_slot("earring", EARRING_LEFT)
            .with_type_slot("weapon", WEAPON_OUTER_1)
            .with_type_slot("tool", WEAPON_OUTER_1)
            .with_type_slot("offhand", WEAPON_OUTER_2)
            .with_type_slot(item_types::BAG, BAG)
            .with_preset("sword", Some(WEAPON_OUTER_1))
            .with_preset("pickaxe", Some(WEAPON_OUTER_1))
            .with_preset("trinket", None)
    }
}
