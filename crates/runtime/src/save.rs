//! Persistence boundary.
//!
//! The session is saved as one JSON blob. Only stored state goes in: resource
//! maxima, the attribute sheet and anything else derived from content are
//! recomputed on load.
use std::collections::BTreeSet;

use idle_core::inventory::{BagSlots, EquippedItems};
use idle_core::{ActiveAuras, ActiveBuffs, AvatarSelection, SlotArray, ValueMap};
use serde::{Deserialize, Serialize};

use crate::error::Result;

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SaveState {
    pub version: u32,
    pub selection: AvatarSelection,
    pub inventory: SlotArray,
    pub bag_slots: BagSlots,
    pub equipped: EquippedItems,
    /// Current (not max) resource values.
    pub resources: ValueMap,
    pub auras: ActiveAuras,
    pub buffs: ActiveBuffs,
    pub learned_abilities: BTreeSet<String>,
    pub skills_unlocked: bool,
}

impl SaveState {
    pub const VERSION: u32 = 1;

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    /// Parses a blob. Missing fields take their defaults.
    pub fn from_json(blob: &str) -> Result<Self> {
        Ok(serde_json::from_str(blob)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::RuntimeError;

    #[test]
    fn partial_blob_fills_defaults() {
        let save = SaveState::from_json(r#"{"version":1,"resources":{"stamina":4.5}}"#).unwrap();
        assert_eq!(save.resources.get("stamina"), Some(&4.5));
        assert!(save.inventory.is_empty());
        assert!(save.learned_abilities.is_empty());
    }

    #[test]
    fn garbage_is_a_save_error() {
        let err = SaveState::from_json("not json").unwrap_err();
        assert!(matches!(err, RuntimeError::Save(_)));
    }
}
