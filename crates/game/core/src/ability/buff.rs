//! Timed, stacking buffs.
//!
//! Buffs are keyed by ability id, so one ability never has two entries; using
//! it again refreshes the existing entry. An entry counts only while
//! `stacks > 0` and `expires_at_ms > now`; anything else is inert.

use std::collections::BTreeMap;

use crate::env::{AbilityDefinition, AbilityOracle};
use crate::stats::{Contributions, ValueMap};

/// Wall-clock milliseconds supplied by the caller.
pub type Millis = u64;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct ActiveBuff {
    pub stacks: u32,
    pub expires_at_ms: Millis,
}

impl ActiveBuff {
    pub fn is_active(&self, now: Millis) -> bool {
        self.stacks > 0 && self.expires_at_ms > now
    }
}

/// Ability id → buff entry.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct ActiveBuffs {
    buffs: BTreeMap<String, ActiveBuff>,
}

impl ActiveBuffs {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, ability_id: &str) -> Option<&ActiveBuff> {
        self.buffs.get(ability_id)
    }

    pub fn insert(&mut self, ability_id: impl Into<String>, buff: ActiveBuff) {
        self.buffs.insert(ability_id.into(), buff);
    }

    /// Stacks currently in effect (0 when expired or absent).
    pub fn active_stacks(&self, ability_id: &str, now: Millis) -> u32 {
        self.buffs
            .get(ability_id)
            .filter(|b| b.is_active(now))
            .map_or(0, |b| b.stacks)
    }

    /// Applies one use of a buff ability.
    ///
    /// Adds `stacks_per_use` to the stacks still in effect, capped at
    /// `max_stacks`, and restarts the duration from `now`. Expired entries
    /// restart from zero. Returns `None` for abilities without a buff payload.
    pub fn apply_use(&mut self, ability: &AbilityDefinition, now: Millis) -> Option<ActiveBuff> {
        let spec = ability.buff.as_ref()?;
        let cap = spec.max_stacks.max(1);
        let stacks = self
            .active_stacks(&ability.id, now)
            .saturating_add(spec.stacks_per_use.max(1))
            .min(cap);
        let buff = ActiveBuff {
            stacks,
            expires_at_ms: now.saturating_add(spec.duration_ms),
        };
        self.buffs.insert(ability.id.clone(), buff);
        Some(buff)
    }

    pub fn remove(&mut self, ability_id: &str) -> Option<ActiveBuff> {
        self.buffs.remove(ability_id)
    }

    /// Drops inert entries. Returns true if anything was removed.
    pub fn prune(&mut self, now: Millis) -> bool {
        let before = self.buffs.len();
        self.buffs.retain(|_, b| b.is_active(now));
        self.buffs.len() != before
    }

    pub fn active_at(&self, now: Millis) -> impl Iterator<Item = (&str, &ActiveBuff)> + '_ {
        self.buffs
            .iter()
            .filter(move |(_, b)| b.is_active(now))
            .map(|(id, b)| (id.as_str(), b))
    }

    pub fn is_empty(&self) -> bool {
        self.buffs.is_empty()
    }
}

/// Summed contributions of all active buffs.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct BuffModifiers {
    pub mana_regen: f64,
    pub stat_bonuses: ValueMap,
    pub resource_bonuses: ValueMap,
}

impl BuffModifiers {
    /// Feeds stat bonuses into the override layer and resource bonuses into maxima.
    pub fn apply_to(&self, contributions: &mut Contributions) {
        contributions.add_stats(&self.stat_bonuses);
        contributions.add_resource_bonuses(&self.resource_bonuses);
    }
}

/// Accumulates `stacks × per-stack value` over every active buff.
pub fn buff_modifiers<A>(abilities: &A, buffs: &ActiveBuffs, now: Millis) -> BuffModifiers
where
    A: AbilityOracle + ?Sized,
{
    let mut out = BuffModifiers::default();

    for (id, buff) in buffs.active_at(now) {
        let Some(spec) = abilities.ability(id).and_then(|a| a.buff.as_ref()) else {
            continue;
        };
        let stacks = f64::from(buff.stacks);

        if spec.mana_regen_per_stack.is_finite() {
            out.mana_regen += stacks * spec.mana_regen_per_stack;
        }
        for (stat, per_stack) in spec.stat_bonuses.iter().filter(|(_, v)| v.is_finite()) {
            *out.stat_bonuses.entry(stat.clone()).or_insert(0.0) += stacks * per_stack;
        }
        for (resource, per_stack) in spec.resource_bonuses.iter().filter(|(_, v)| v.is_finite()) {
            *out.resource_bonuses.entry(resource.clone()).or_insert(0.0) += stacks * per_stack;
        }
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::env::{AbilityKind, BuffSpec, ContentTables};

    fn content() -> ContentTables {
        ContentTables::new()
            .with_ability(
                AbilityDefinition::new("meditate", AbilityKind::Buff).with_buff(
                    BuffSpec::new(3, 1_000)
                        .with_mana_regen(0.5)
                        .with_stat_bonus("wisdom", 2.0)
                        .with_resource_bonus("mana", 10.0),
                ),
            )
            .with_ability(
                AbilityDefinition::new("warcry", AbilityKind::Buff).with_buff(
                    BuffSpec::new(1, 500)
                        .with_stat_bonus("wisdom", 1.0)
                        .with_stat_bonus("strength", 4.0),
                ),
            )
            .with_ability(AbilityDefinition::new("chop", AbilityKind::Work))
    }

    #[test]
    fn activity_requires_stacks_and_future_expiry() {
        assert!(ActiveBuff { stacks: 1, expires_at_ms: 10 }.is_active(9));
        assert!(!ActiveBuff { stacks: 1, expires_at_ms: 10 }.is_active(10));
        assert!(!ActiveBuff { stacks: 0, expires_at_ms: 10 }.is_active(0));
    }

    #[test]
    fn repeated_use_refreshes_single_entry_up_to_cap() {
        let content = content();
        let meditate = &content.abilities["meditate"];
        let mut buffs = ActiveBuffs::new();

        buffs.apply_use(meditate, 0);
        buffs.apply_use(meditate, 100);
        buffs.apply_use(meditate, 200);
        let last = buffs.apply_use(meditate, 300).unwrap();

        assert_eq!(last.stacks, 3);
        assert_eq!(last.expires_at_ms, 1_300);
        assert_eq!(buffs.active_at(300).count(), 1);
    }

    #[test]
    fn expired_buff_restarts_from_zero() {
        let content = content();
        let meditate = &content.abilities["meditate"];
        let mut buffs = ActiveBuffs::new();
        buffs.apply_use(meditate, 0);
        buffs.apply_use(meditate, 0);

        let refreshed = buffs.apply_use(meditate, 5_000).unwrap();
        assert_eq!(refreshed.stacks, 1);
    }

    #[test]
    fn non_buff_ability_is_rejected() {
        let content = content();
        let mut buffs = ActiveBuffs::new();
        assert!(buffs.apply_use(&content.abilities["chop"], 0).is_none());
        assert!(buffs.is_empty());
    }

    #[test]
    fn modifiers_sum_stacks_across_buffs() {
        let content = content();
        let mut buffs = ActiveBuffs::new();
        buffs.insert("meditate", ActiveBuff { stacks: 2, expires_at_ms: 1_000 });
        buffs.insert("warcry", ActiveBuff { stacks: 1, expires_at_ms: 1_000 });

        let mods = buff_modifiers(&content, &buffs, 500);
        assert_eq!(mods.mana_regen, 1.0);
        assert_eq!(mods.stat_bonuses["wisdom"], 5.0);
        assert_eq!(mods.stat_bonuses["strength"], 4.0);
        assert_eq!(mods.resource_bonuses["mana"], 20.0);
    }

    #[test]
    fn inert_entries_contribute_nothing() {
        let content = content();
        let mut buffs = ActiveBuffs::new();
        buffs.insert("meditate", ActiveBuff { stacks: 3, expires_at_ms: 100 });
        buffs.insert("warcry", ActiveBuff { stacks: 0, expires_at_ms: 9_999 });

        let mods = buff_modifiers(&content, &buffs, 100);
        assert_eq!(mods, BuffModifiers::default());

        assert!(buffs.prune(100));
        assert!(buffs.is_empty());
        assert!(!buffs.prune(100));
    }

    #[test]
    fn apply_to_feeds_contributions() {
        let content = content();
        let mut buffs = ActiveBuffs::new();
        buffs.insert("meditate", ActiveBuff { stacks: 1, expires_at_ms: 10 });

        let mut contributions = Contributions::new();
        buff_modifiers(&content, &buffs, 0).apply_to(&mut contributions);
        assert_eq!(contributions.stats["wisdom"], 2.0);
        assert_eq!(contributions.resource_bonuses["mana"], 10.0);
    }
}
