//! Item effect resolver.
//!
//! Turns an item's declarative `effects` list into a delta. The resolver does
//! not touch state: the caller applies `resources_delta` to resource state
//! (capped at max) and merges `learn_ability_ids` into what is already known.

use crate::env::{ItemDefinition, ItemEffect};
use crate::stats::ValueMap;

/// Combined result of every effect on one item.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct ItemEffectOutcome {
    /// Resource id → amount to restore. Repeated targets sum.
    pub resources_delta: ValueMap,
    pub unlock_skills: bool,
    pub learn_all_abilities: bool,
    /// In declaration order, possibly with duplicates.
    pub learn_ability_ids: Vec<String>,
}

impl ItemEffectOutcome {
    /// True when using the item would change nothing.
    pub fn is_empty(&self) -> bool {
        self.resources_delta.is_empty()
            && !self.unlock_skills
            && !self.learn_all_abilities
            && self.learn_ability_ids.is_empty()
    }
}

pub fn apply_item_effects(item: &ItemDefinition) -> ItemEffectOutcome {
    resolve_effects(&item.effects)
}

/// Folds a list of effects. Unknown effects and non-finite amounts are skipped.
pub fn resolve_effects(effects: &[ItemEffect]) -> ItemEffectOutcome {
    let mut outcome = ItemEffectOutcome::default();

    for effect in effects {
        match effect {
            ItemEffect::RestoreResource {
                resource_id,
                amount,
            } => {
                if resource_id.is_empty() || !amount.is_finite() {
                    continue;
                }
                *outcome
                    .resources_delta
                    .entry(resource_id.clone())
                    .or_insert(0.0) += amount;
            }
            ItemEffect::UnlockSkills {
                ability_ids,
                learn_all,
            } => {
                outcome.unlock_skills = true;
                outcome.learn_all_abilities |= *learn_all;
                outcome
                    .learn_ability_ids
                    .extend(ability_ids.iter().cloned());
            }
            ItemEffect::Unknown => {}
        }
    }

    outcome
}
