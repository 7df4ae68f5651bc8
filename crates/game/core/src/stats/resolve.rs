//! Modifier Resolution Engine.
//!
//! Bounded fixed-point propagation over a graph of stat/resource nodes:
//!
//! ```text
//! initial[id]  = base[id] + override[id]            (fixed for the whole run)
//! pass k:      calc = initial
//!              for each source node s, modifier (t, v):
//!                  calc[t] += current[s] × v        (current = output of pass k-1)
//!              stop if calc == current
//! ```
//!
//! Each pass restarts from the initial vector, so a chain `A → B → C` settles
//! after as many passes as it is long. Amplifying cycles never settle; the
//! run stops after [`GameConfig::MAX_RESOLVE_PASSES`] and the last vector is the
//! answer. That cap is the accepted approximation, not a convergence guarantee.

use crate::config::GameConfig;
use crate::env::NodeDefinition;

use super::ValueMap;

/// Outcome of one resolution run, with diagnostics.
#[derive(Clone, Debug, PartialEq)]
pub struct Resolution {
    pub values: ValueMap,
    /// Number of propagation passes executed (1..=max).
    pub passes: usize,
    /// False when the pass cap was hit before a fixed point.
    pub converged: bool,
}

/// Resolves final values for every node.
///
/// Pure function of its inputs. Modifiers with no target, a non-finite value,
/// an unknown kind, or a target outside `nodes` are skipped. Override entries
/// for ids outside `nodes` are ignored.
pub fn resolve(nodes: &[NodeDefinition], overrides: &ValueMap) -> ValueMap {
    resolve_detailed(nodes, overrides).values
}

/// Like [`resolve`] but also reports pass count and convergence.
pub fn resolve_detailed(nodes: &[NodeDefinition], overrides: &ValueMap) -> Resolution {
    resolve_with_limit(nodes, overrides, GameConfig::MAX_RESOLVE_PASSES)
}

/// Resolution with an explicit pass cap (at least one pass always runs).
pub fn resolve_with_limit(
    nodes: &[NodeDefinition],
    overrides: &ValueMap,
    max_passes: usize,
) -> Resolution {
    let initial = initial_values(nodes, overrides);
    let mut current = initial.clone();
    let mut passes = 0;

    while passes < max_passes.max(1) {
        passes += 1;

        let mut calculated = initial.clone();
        for node in nodes {
            let Some(&source) = current.get(&node.id) else {
                continue;
            };
            for modifier in node.modifiers.iter().filter(|m| m.is_applicable()) {
                if let Some(target) = calculated.get_mut(&modifier.target_id) {
                    *target += source * modifier.value;
                }
            }
        }

        if calculated == current {
            return Resolution {
                values: current,
                passes,
                converged: true,
            };
        }
        current = calculated;
    }

    Resolution {
        values: current,
        passes,
        converged: false,
    }
}

fn initial_values(nodes: &[NodeDefinition], overrides: &ValueMap) -> ValueMap {
    nodes
        .iter()
        .map(|node| {
            let base = finite_or_zero(node.base);
            let extra = overrides.get(&node.id).copied().map_or(0.0, finite_or_zero);
            (node.id.clone(), base + extra)
        })
        .collect()
}

fn finite_or_zero(value: f64) -> f64 {
    if value.is_finite() { value } else { 0.0 }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::env::{Modifier, ModifierKind};

    fn overrides(pairs: &[(&str, f64)]) -> ValueMap {
        pairs.iter().map(|(k, v)| (k.to_string(), *v)).collect()
    }

    #[test]
    fn no_modifiers_returns_base_plus_override() {
        let nodes = vec![
            NodeDefinition::new("strength", 10.0),
            NodeDefinition::new("agility", 4.0),
        ];
        let result = resolve_detailed(&nodes, &overrides(&[("agility", 3.0), ("ghost", 99.0)]));

        assert_eq!(result.values["strength"], 10.0);
        assert_eq!(result.values["agility"], 7.0);
        assert!(!result.values.contains_key("ghost"));
        assert_eq!(result.passes, 1);
        assert!(result.converged);
    }

    #[test]
    fn single_flat_modifier_settles_and_is_idempotent() {
        let nodes = vec![
            NodeDefinition::new("a", 10.0).with_modifier("b", 0.5),
            NodeDefinition::new("b", 0.0),
        ];
        let first = resolve_detailed(&nodes, &ValueMap::new());
        assert_eq!(first.values["b"], 5.0);
        assert_eq!(first.values["a"], 10.0);
        assert!(first.converged);
        assert_eq!(first.passes, 2);

        let second = resolve(&nodes, &ValueMap::new());
        assert_eq!(second, first.values);
    }

    #[test]
    fn chains_propagate_through_intermediate_nodes() {
        // agility boosts stamina, stamina boosts max energy
        let nodes = vec![
            NodeDefinition::new("agility", 10.0).with_modifier("stamina", 1.0),
            NodeDefinition::new("stamina", 5.0).with_modifier("energy", 2.0),
            NodeDefinition::new("energy", 0.0),
        ];
        let result = resolve_detailed(&nodes, &ValueMap::new());
        assert_eq!(result.values["stamina"], 15.0);
        assert_eq!(result.values["energy"], 30.0);
        assert!(result.converged);
    }

    #[test]
    fn amplifying_cycle_stops_at_pass_cap() {
        let nodes = vec![
            NodeDefinition::new("a", 1.0).with_modifier("b", 2.0),
            NodeDefinition::new("b", 1.0).with_modifier("a", 2.0),
        ];
        let result = resolve_detailed(&nodes, &ValueMap::new());
        assert_eq!(result.passes, GameConfig::MAX_RESOLVE_PASSES);
        assert!(!result.converged);
        assert!(result.values["a"].is_finite());
    }

    #[test]
    fn explicit_limit_bounds_iterations() {
        let nodes = vec![NodeDefinition::new("a", 1.0).with_modifier("a", 1.0)];
        let result = resolve_with_limit(&nodes, &ValueMap::new(), 3);
        assert_eq!(result.passes, 3);
        // pass1: 1 + 1, pass2: 1 + 2, pass3: 1 + 3
        assert_eq!(result.values["a"], 4.0);

        let zero = resolve_with_limit(&nodes, &ValueMap::new(), 0);
        assert_eq!(zero.passes, 1);
    }

    #[test]
    fn malformed_modifiers_are_skipped() {
        let mut source = NodeDefinition::new("a", 10.0)
            .with_modifier("", 1.0)
            .with_modifier("b", f64::NAN)
            .with_modifier("b", f64::INFINITY)
            .with_modifier("missing", 1.0);
        source.modifiers.push(Modifier {
            target_id: "b".into(),
            value: 1.0,
            kind: ModifierKind::Unknown,
        });
        let nodes = vec![source, NodeDefinition::new("b", 1.0)];

        let values = resolve(&nodes, &ValueMap::new());
        assert_eq!(values["b"], 1.0);
        assert!(!values.contains_key("missing"));
    }

    #[test]
    fn non_finite_base_and_override_count_as_zero() {
        let nodes = vec![NodeDefinition::new("a", f64::NAN), NodeDefinition::new("b", 2.0)];
        let values = resolve(&nodes, &overrides(&[("b", f64::INFINITY)]));
        assert_eq!(values["a"], 0.0);
        assert_eq!(values["b"], 2.0);
    }

    #[test]
    fn overrides_feed_into_propagation() {
        let nodes = vec![
            NodeDefinition::new("a", 0.0).with_modifier("b", 0.5),
            NodeDefinition::new("b", 0.0),
        ];
        let values = resolve(&nodes, &overrides(&[("a", 8.0)]));
        assert_eq!(values["b"], 4.0);
    }
}
