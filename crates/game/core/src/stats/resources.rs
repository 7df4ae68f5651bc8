//! Resource runtime state.
//!
//! Resource pools are partially stored:
//! - Maximum values: computed by the aggregator (NOT stored)
//! - Current values: session state (MUST be stored)
//!
//! A resource is tracked only while some held perk unlocks it. Locked
//! resources are absent from the state, not zeroed.

use std::borrow::Cow;
use std::collections::{BTreeMap, BTreeSet};

use crate::env::NodeOracle;
use crate::error::{ErrorSeverity, GameError};

use super::ValueMap;

/// Errors from spending resources. State is unchanged when one is returned.
#[derive(Clone, Debug, PartialEq, thiserror::Error)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ResourceError {
    /// Resource is locked or unknown.
    #[error("Resource {resource} is not tracked")]
    Untracked { resource: String },

    /// Not enough of the resource.
    #[error("Insufficient {resource}: required {required}, available {available}")]
    Insufficient {
        resource: String,
        required: f64,
        available: f64,
    },
}

impl GameError for ResourceError {
    fn severity(&self) -> ErrorSeverity {
        match self {
            ResourceError::Untracked { .. } => ErrorSeverity::Validation,
            ResourceError::Insufficient { .. } => ErrorSeverity::Recoverable,
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            ResourceError::Untracked { .. } => "RESOURCE_UNTRACKED",
            ResourceError::Insufficient { .. } => "RESOURCE_INSUFFICIENT",
        }
    }
}

/// Maximum for `id`: the aggregator's resolved value, else the node's static base.
pub fn resource_max<N>(nodes: &N, maxima: &ValueMap, id: &str) -> Option<f64>
where
    N: NodeOracle + ?Sized,
{
    maxima
        .get(id)
        .copied()
        .or_else(|| nodes.resource_node(id).map(|node| node.base))
        .filter(|max| max.is_finite())
        .map(|max| max.max(0.0))
}

/// Current (not max) values of unlocked resources.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct ResourceState {
    current: BTreeMap<String, f64>,
}

impl ResourceState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds state for the unlocked set, clamping saved values into `[0, max]`.
    ///
    /// Resources missing from `initial` (or saved as non-finite) start full.
    pub fn init<N>(
        nodes: &N,
        unlocked: &BTreeSet<String>,
        maxima: &ValueMap,
        initial: &ValueMap,
    ) -> Self
    where
        N: NodeOracle + ?Sized,
    {
        let current = unlocked
            .iter()
            .filter_map(|id| {
                let max = resource_max(nodes, maxima, id)?;
                let value = initial
                    .get(id)
                    .copied()
                    .filter(|v| v.is_finite())
                    .map_or(max, |v| v.clamp(0.0, max));
                Some((id.clone(), value))
            })
            .collect();
        Self { current }
    }

    pub fn get(&self, id: &str) -> Option<f64> {
        self.current.get(id).copied()
    }

    pub fn is_tracked(&self, id: &str) -> bool {
        self.current.contains_key(id)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.current.iter().map(|(id, v)| (id.as_str(), *v))
    }

    pub fn as_map(&self) -> &BTreeMap<String, f64> {
        &self.current
    }

    /// Brings the state in line with a new unlocked set and new maxima.
    ///
    /// - values above their new max are clamped down
    /// - resources no longer unlocked are removed
    /// - newly unlocked resources start at max
    ///
    /// Returns `Cow::Borrowed(self)` when nothing changed.
    pub fn reconcile<N>(
        &self,
        nodes: &N,
        unlocked: &BTreeSet<String>,
        maxima: &ValueMap,
    ) -> Cow<'_, Self>
    where
        N: NodeOracle + ?Sized,
    {
        let next: BTreeMap<String, f64> = unlocked
            .iter()
            .filter_map(|id| {
                let max = resource_max(nodes, maxima, id)?;
                let value = self.current.get(id).map_or(max, |v| v.min(max));
                Some((id.clone(), value))
            })
            .collect();

        if next == self.current {
            Cow::Borrowed(self)
        } else {
            Cow::Owned(Self { current: next })
        }
    }

    /// Spends `amount`, returning the remaining value.
    ///
    /// Non-positive or non-finite amounts spend nothing.
    pub fn consume(&mut self, id: &str, amount: f64) -> Result<f64, ResourceError> {
        let current = self.get(id).ok_or_else(|| ResourceError::Untracked {
            resource: id.to_string(),
        })?;
        if !amount.is_finite() || amount <= 0.0 {
            return Ok(current);
        }
        if current < amount {
            return Err(ResourceError::Insufficient {
                resource: id.to_string(),
                required: amount,
                available: current,
            });
        }

        let remaining = (current - amount).max(0.0);
        self.current.insert(id.to_string(), remaining);
        Ok(remaining)
    }

    /// Returns true if every cost could be paid.
    pub fn can_afford(&self, costs: &ValueMap) -> bool {
        self.check_costs(costs).is_ok()
    }

    /// Pays all costs or none.
    pub fn consume_all(&mut self, costs: &ValueMap) -> Result<(), ResourceError> {
        self.check_costs(costs)?;
        for (id, amount) in costs {
            self.consume(id, *amount)?;
        }
        Ok(())
    }

    /// Adds `amount`, capped at `max`. Untracked resources are left alone.
    ///
    /// Returns the new value, or `None` if the resource is not tracked.
    pub fn add(&mut self, id: &str, amount: f64, max: f64) -> Option<f64> {
        let current = self.current.get_mut(id)?;
        if amount.is_finite() && amount > 0.0 {
            let capped = (*current + amount).min(max);
            if capped > *current {
                *current = capped;
            }
        }
        Some(*current)
    }

    /// One regeneration step. No-op once at max.
    ///
    /// Returns true if the value changed.
    pub fn regen_tick(&mut self, id: &str, max: f64, amount: f64) -> bool {
        match self.get(id) {
            Some(current) if current < max => {
                self.add(id, amount, max);
                self.get(id) != Some(current)
            }
            _ => false,
        }
    }

    fn check_costs(&self, costs: &ValueMap) -> Result<(), ResourceError> {
        for (id, amount) in costs {
            let available = self.get(id).ok_or_else(|| ResourceError::Untracked {
                resource: id.clone(),
            })?;
            if amount.is_finite() && *amount > available {
                return Err(ResourceError::Insufficient {
                    resource: id.clone(),
                    required: *amount,
                    available,
                });
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::env::{ContentTables, NodeDefinition};

    fn content() -> ContentTables {
        ContentTables::new()
            .with_resource(NodeDefinition::new("stamina", 10.0))
            .with_resource(NodeDefinition::new("mana", 5.0))
            .with_resource(NodeDefinition::new("focus", 3.0))
    }

    fn set(ids: &[&str]) -> BTreeSet<String> {
        ids.iter().map(|s| s.to_string()).collect()
    }

    fn map(pairs: &[(&str, f64)]) -> ValueMap {
        pairs.iter().map(|(k, v)| (k.to_string(), *v)).collect()
    }

    fn state() -> ResourceState {
        ResourceState::init(
            &content(),
            &set(&["stamina", "mana"]),
            &map(&[("stamina", 20.0)]),
            &map(&[("stamina", 12.0)]),
        )
    }

    #[test]
    fn init_clamps_and_falls_back_to_node_base() {
        let state = ResourceState::init(
            &content(),
            &set(&["stamina", "mana", "ghost"]),
            &map(&[("stamina", 20.0)]),
            &map(&[("stamina", 99.0), ("mana", -4.0)]),
        );
        assert_eq!(state.get("stamina"), Some(20.0));
        assert_eq!(state.get("mana"), Some(0.0));
        assert!(!state.is_tracked("ghost"));
        assert!(!state.is_tracked("focus"));
    }

    #[test]
    fn init_defaults_missing_values_to_max() {
        assert_eq!(state().get("mana"), Some(5.0));
        assert_eq!(state().get("stamina"), Some(12.0));
    }

    #[test]
    fn reconcile_is_noop_when_nothing_changed() {
        let state = state();
        let result = state.reconcile(&content(), &set(&["stamina", "mana"]), &map(&[("stamina", 20.0)]));
        assert!(matches!(result, Cow::Borrowed(_)));
    }

    #[test]
    fn reconcile_clamps_prunes_and_adds() {
        let state = state();
        let result = state.reconcile(&content(), &set(&["stamina", "focus"]), &map(&[("stamina", 8.0)]));
        let next = match result {
            Cow::Owned(next) => next,
            Cow::Borrowed(_) => panic!("expected a new state"),
        };
        assert_eq!(next.get("stamina"), Some(8.0));
        assert!(!next.is_tracked("mana"));
        assert_eq!(next.get("focus"), Some(3.0));
        // original untouched
        assert_eq!(state.get("stamina"), Some(12.0));
    }

    #[test]
    fn consume_rejects_overdraw_without_change() {
        let mut state = state();
        let err = state.consume("stamina", 13.0).unwrap_err();
        assert_eq!(err.error_code(), "RESOURCE_INSUFFICIENT");
        assert_eq!(state.get("stamina"), Some(12.0));

        assert!(matches!(
            state.consume("focus", 1.0),
            Err(ResourceError::Untracked { .. })
        ));
    }

    #[test]
    fn consume_subtracts_never_below_zero() {
        let mut state = state();
        assert_eq!(state.consume("stamina", 12.0), Ok(0.0));
        assert_eq!(state.get("stamina"), Some(0.0));
        assert_eq!(state.consume("stamina", 0.0), Ok(0.0));
    }

    #[test]
    fn consume_all_is_atomic() {
        let mut state = state();
        let costs = map(&[("stamina", 2.0), ("mana", 50.0)]);
        assert!(!state.can_afford(&costs));
        assert!(state.consume_all(&costs).is_err());
        assert_eq!(state.get("stamina"), Some(12.0));

        let costs = map(&[("stamina", 2.0), ("mana", 1.0)]);
        state.consume_all(&costs).unwrap();
        assert_eq!(state.get("stamina"), Some(10.0));
        assert_eq!(state.get("mana"), Some(4.0));
    }

    #[test]
    fn add_caps_at_max_and_ignores_untracked() {
        let mut state = state();
        assert_eq!(state.add("stamina", 100.0, 20.0), Some(20.0));
        assert_eq!(state.add("focus", 1.0, 3.0), None);
        assert!(!state.is_tracked("focus"));
    }

    #[test]
    fn regen_stops_at_max() {
        let mut state = state();
        assert!(state.regen_tick("stamina", 13.0, 1.0));
        assert_eq!(state.get("stamina"), Some(13.0));
        assert!(!state.regen_tick("stamina", 13.0, 1.0));
        assert_eq!(state.get("stamina"), Some(13.0));

        assert!(state.regen_tick("stamina", 13.5, 1.0));
        assert_eq!(state.get("stamina"), Some(13.5));
    }
}
