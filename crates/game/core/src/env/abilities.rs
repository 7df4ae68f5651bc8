//! Ability definitions.
//!
//! Abilities come in a few behavioural kinds. Auras are toggled and contribute
//! multipliers while enabled; buffs are used, stack, and expire.

use std::collections::BTreeMap;

use super::character::StatBlock;

#[derive(
    Clone,
    Copy,
    Debug,
    Default,
    PartialEq,
    Eq,
    Hash,
    strum::Display,
    strum::EnumString,
    strum::AsRefStr,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum AbilityKind {
    /// Toggled on/off, no expiry.
    Aura,
    /// Used for timed, stacking effects.
    Buff,
    /// Performs timed work.
    Work,
    Passive,
    #[default]
    #[cfg_attr(feature = "serde", serde(other))]
    Other,
}

#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default, rename_all = "camelCase"))]
pub struct AbilityDefinition {
    pub id: String,
    pub name: String,
    pub kind: AbilityKind,
    /// Aura multiplier applied to stamina costs of work.
    pub stamina_cost_multiplier: Option<f64>,
    /// Aura multiplier applied to work duration.
    pub work_duration_multiplier: Option<f64>,
    pub buff: Option<BuffSpec>,
    /// Resource costs paid on use (resource id → amount).
    pub cost: BTreeMap<String, f64>,
    /// Base duration of timed work.
    pub duration_ms: Option<u64>,
    /// Items granted when timed work completes (item id → count).
    pub yields: BTreeMap<String, u32>,
}

impl AbilityDefinition {
    pub fn new(id: impl Into<String>, kind: AbilityKind) -> Self {
        let id = id.into();
        Self {
            name: id.clone(),
            id,
            kind,
            ..Default::default()
        }
    }

    pub fn with_multipliers(mut self, stamina_cost: Option<f64>, work_duration: Option<f64>) -> Self {
        self.stamina_cost_multiplier = stamina_cost;
        self.work_duration_multiplier = work_duration;
        self
    }

    pub fn with_buff(mut self, buff: BuffSpec) -> Self {
        self.buff = Some(buff);
        self
    }

    pub fn with_cost(mut self, resource: impl Into<String>, amount: f64) -> Self {
        self.cost.insert(resource.into(), amount);
        self
    }

    pub fn with_duration(mut self, duration_ms: u64) -> Self {
        self.duration_ms = Some(duration_ms);
        self
    }

    pub fn with_yield(mut self, item: impl Into<String>, count: u32) -> Self {
        self.yields.insert(item.into(), count);
        self
    }
}

/// Stacking and payload of a buff ability.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default, rename_all = "camelCase"))]
pub struct BuffSpec {
    pub max_stacks: u32,
    pub stacks_per_use: u32,
    pub duration_ms: u64,
    pub mana_regen_per_stack: f64,
    pub stat_bonuses: StatBlock,
    pub resource_bonuses: StatBlock,
}

impl Default for BuffSpec {
    fn default() -> Self {
        Self {
            max_stacks: 1,
            stacks_per_use: 1,
            duration_ms: 0,
            mana_regen_per_stack: 0.0,
            stat_bonuses: StatBlock::new(),
            resource_bonuses: StatBlock::new(),
        }
    }
}

impl BuffSpec {
    pub fn new(max_stacks: u32, duration_ms: u64) -> Self {
        Self {
            max_stacks,
            duration_ms,
            ..Default::default()
        }
    }

    pub fn with_mana_regen(mut self, per_stack: f64) -> Self {
        self.mana_regen_per_stack = per_stack;
        self
    }

    pub fn with_stat_bonus(mut self, stat: impl Into<String>, per_stack: f64) -> Self {
        self.stat_bonuses.insert(stat.into(), per_stack);
        self
    }

    pub fn with_resource_bonus(mut self, resource: impl Into<String>, per_stack: f64) -> Self {
        self.resource_bonuses.insert(resource.into(), per_stack);
        self
    }
}
