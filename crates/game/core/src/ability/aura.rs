//! Toggled auras.
//!
//! An aura contributes its declared multipliers for as long as it is enabled.
//! Multipliers from simultaneously enabled auras combine by multiplication.

use std::collections::BTreeMap;

use crate::env::{AbilityKind, AbilityOracle};

/// Ability id → enabled flag.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct ActiveAuras {
    enabled: BTreeMap<String, bool>,
}

impl ActiveAuras {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&mut self, ability_id: impl Into<String>, enabled: bool) {
        self.enabled.insert(ability_id.into(), enabled);
    }

    /// Flips the flag and returns the new state.
    pub fn toggle(&mut self, ability_id: &str) -> bool {
        let flag = self.enabled.entry(ability_id.to_string()).or_insert(false);
        *flag = !*flag;
        *flag
    }

    pub fn is_enabled(&self, ability_id: &str) -> bool {
        self.enabled.get(ability_id).copied().unwrap_or(false)
    }

    pub fn enabled_ids(&self) -> impl Iterator<Item = &str> {
        self.enabled
            .iter()
            .filter(|(_, on)| **on)
            .map(|(id, _)| id.as_str())
    }
}

/// Combined aura multipliers; 1.0 means "no effect".
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct AuraMultipliers {
    pub stamina_cost: f64,
    pub work_duration: f64,
}

impl AuraMultipliers {
    pub const IDENTITY: Self = Self {
        stamina_cost: 1.0,
        work_duration: 1.0,
    };
}

impl Default for AuraMultipliers {
    fn default() -> Self {
        Self::IDENTITY
    }
}

/// Multiplies the declared factors of every enabled aura.
///
/// Non-positive and non-finite factors are ignored, as are enabled ids that
/// are not aura abilities.
pub fn aura_multipliers<A>(abilities: &A, auras: &ActiveAuras) -> AuraMultipliers
where
    A: AbilityOracle + ?Sized,
{
    auras
        .enabled_ids()
        .filter_map(|id| abilities.ability(id))
        .filter(|ability| ability.kind == AbilityKind::Aura)
        .fold(AuraMultipliers::IDENTITY, |acc, ability| AuraMultipliers {
            stamina_cost: acc.stamina_cost * valid_factor(ability.stamina_cost_multiplier),
            work_duration: acc.work_duration * valid_factor(ability.work_duration_multiplier),
        })
}

fn valid_factor(factor: Option<f64>) -> f64 {
    factor.filter(|f| f.is_finite() && *f > 0.0).unwrap_or(1.0)
}
