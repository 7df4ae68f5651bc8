//! Attribute Aggregator.
//!
//! Layers character-creation sources into one override map and resolves it:
//!
//! ```text
//! [ race variant | origin level | faction level ]  base stat blocks + perk ids
//!      ↓ perks resolved per source (no dedup)
//! [ Override Map ]  Σ source stats + Σ perk stats + extra (equipment, buffs)
//!      ↓ resolve(stat nodes)
//! [ final stats ]
//!      ↓ resolve(stat nodes pinned to final values + resource nodes)
//! [ final resources ] + resource bonuses
//! ```
//!
//! Resources are resolved in a second pass so they see already-resolved stats
//! rather than raw bases.
//!
//! The same perk granted by two sources yields two [`ResolvedPerk`] records and
//! counts its stats twice. Sources stack; they are not unioned.

use std::collections::BTreeSet;

use crate::env::{CharacterOracle, NodeDefinition, NodeOracle, PerkSource, StatBlock};

use super::{ValueMap, resolve};

/// A selected level of a levelled source (origin or faction).
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LevelledChoice {
    pub name: String,
    pub level: u32,
}

impl LevelledChoice {
    pub fn new(name: impl Into<String>, level: u32) -> Self {
        Self {
            name: name.into(),
            level,
        }
    }
}

/// The avatar descriptor chosen at character creation.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default, rename_all = "camelCase"))]
pub struct AvatarSelection {
    pub race_variant: Option<String>,
    pub origin: Option<LevelledChoice>,
    pub faction: Option<LevelledChoice>,
}

impl AvatarSelection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_race_variant(mut self, variant: impl Into<String>) -> Self {
        self.race_variant = Some(variant.into());
        self
    }

    pub fn with_origin(mut self, name: impl Into<String>, level: u32) -> Self {
        self.origin = Some(LevelledChoice::new(name, level));
        self
    }

    pub fn with_faction(mut self, name: impl Into<String>, level: u32) -> Self {
        self.faction = Some(LevelledChoice::new(name, level));
        self
    }
}

/// A perk instance attributed to the source that granted it.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct ResolvedPerk {
    pub id: String,
    pub name: String,
    pub source_type: PerkSource,
    pub source_name: String,
    pub stats: StatBlock,
}

/// A source block picked from the selection: its own stats and granted perk ids.
#[derive(Clone, Copy, Debug)]
pub struct SelectedSource<'a> {
    pub kind: PerkSource,
    pub name: &'a str,
    pub stats: &'a StatBlock,
    pub perks: &'a [String],
}

/// Extra additive contributions layered on top of character sources.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Contributions {
    /// Stat (or resource base) additions: equipment stats, buff stat bonuses.
    pub stats: ValueMap,
    /// Added to resolved resource maxima.
    pub resource_bonuses: ValueMap,
}

impl Contributions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_stats<'a>(&mut self, block: impl IntoIterator<Item = (&'a String, &'a f64)>) {
        accumulate(&mut self.stats, block);
    }

    pub fn add_resource_bonuses<'a>(
        &mut self,
        block: impl IntoIterator<Item = (&'a String, &'a f64)>,
    ) {
        accumulate(&mut self.resource_bonuses, block);
    }
}

/// Perks plus the stat layer of the attribute computation.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct StatSummary {
    pub perks: Vec<ResolvedPerk>,
    pub overrides: ValueMap,
    pub final_stats: ValueMap,
}

/// Everything derived from the selection in one snapshot.
///
/// Recomputed wholesale whenever an input changes; never patched.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct AttributeSheet {
    pub perks: Vec<ResolvedPerk>,
    pub overrides: ValueMap,
    pub final_stats: ValueMap,
    pub final_resources: ValueMap,
    pub unlocked_resources: BTreeSet<String>,
}

impl AttributeSheet {
    pub fn stat(&self, id: &str) -> f64 {
        self.final_stats.get(id).copied().unwrap_or(0.0)
    }

    pub fn resource_max(&self, id: &str) -> Option<f64> {
        self.final_resources.get(id).copied()
    }

    pub fn is_unlocked(&self, resource: &str) -> bool {
        self.unlocked_resources.contains(resource)
    }

    /// Abilities granted by held perks, deduplicated.
    pub fn perk_abilities<C>(&self, content: &C) -> BTreeSet<String>
    where
        C: CharacterOracle + ?Sized,
    {
        self.perks
            .iter()
            .filter_map(|p| content.perk(&p.id))
            .flat_map(|def| def.unlock_abilities.iter().cloned())
            .collect()
    }
}

/// Picks the race variant, origin level and faction level named by `selection`.
///
/// Unknown sources are skipped.
pub fn selected_sources<'a, C>(content: &'a C, selection: &AvatarSelection) -> Vec<SelectedSource<'a>>
where
    C: CharacterOracle + ?Sized,
{
    let mut sources = Vec::new();

    if let Some(variant) = selection
        .race_variant
        .as_deref()
        .and_then(|id| content.race_variant(id))
    {
        sources.push(SelectedSource {
            kind: PerkSource::Race,
            name: &variant.name,
            stats: &variant.stats,
            perks: &variant.perks,
        });
    }

    let levelled = [
        (PerkSource::Origin, selection.origin.as_ref()),
        (PerkSource::Faction, selection.faction.as_ref()),
    ];
    for (kind, choice) in levelled {
        let Some(choice) = choice else {
            continue;
        };
        let source = match kind {
            PerkSource::Origin => content.origin(&choice.name),
            _ => content.faction(&choice.name),
        };
        if let Some((source, level)) = source.and_then(|s| s.level(choice.level).map(|l| (s, l))) {
            sources.push(SelectedSource {
                kind,
                name: &source.name,
                stats: &level.stats,
                perks: &level.perks,
            });
        }
    }

    sources
}

/// Resolves every source's perk list independently; unknown perk ids are skipped.
pub fn resolve_perks<C>(content: &C, sources: &[SelectedSource<'_>]) -> Vec<ResolvedPerk>
where
    C: CharacterOracle + ?Sized,
{
    sources
        .iter()
        .flat_map(|source| {
            source.perks.iter().filter_map(move |perk_id| {
                content.perk(perk_id).map(|perk| ResolvedPerk {
                    id: perk.id.clone(),
                    name: perk.name.clone(),
                    source_type: source.kind,
                    source_name: source.name.to_string(),
                    stats: perk.stats.clone(),
                })
            })
        })
        .collect()
}

/// Plain additive aggregation; non-finite values are dropped.
pub fn build_override_map<'a>(blocks: impl IntoIterator<Item = &'a StatBlock>) -> ValueMap {
    let mut overrides = ValueMap::new();
    for block in blocks {
        accumulate(&mut overrides, block);
    }
    overrides
}

/// Resolves perks and final stats for a selection.
pub fn aggregate_stats<C>(content: &C, selection: &AvatarSelection, extra: &ValueMap) -> StatSummary
where
    C: NodeOracle + CharacterOracle + ?Sized,
{
    let sources = selected_sources(content, selection);
    let perks = resolve_perks(content, &sources);

    let mut overrides = build_override_map(
        sources
            .iter()
            .map(|s| s.stats)
            .chain(perks.iter().map(|p| &p.stats)),
    );
    accumulate(&mut overrides, extra);

    let final_stats = resolve(content.stat_nodes(), &overrides);

    StatSummary {
        perks,
        overrides,
        final_stats,
    }
}

/// Second pass: resource maxima against already-resolved stats.
///
/// Stat nodes enter the graph pinned at their final values and keep only
/// modifiers that target resources, so stats cannot shift again. Override
/// entries that name resources are applied to the resource bases.
pub fn resolve_resources(
    stat_nodes: &[NodeDefinition],
    resource_nodes: &[NodeDefinition],
    final_stats: &ValueMap,
    overrides: &ValueMap,
) -> ValueMap {
    let resource_ids: BTreeSet<&str> = resource_nodes.iter().map(|n| n.id.as_str()).collect();
    let targets_resource = |id: &String| resource_ids.contains(id.as_str());

    let pinned_stats = stat_nodes.iter().map(|stat| NodeDefinition {
        id: stat.id.clone(),
        base: final_stats.get(&stat.id).copied().unwrap_or(stat.base),
        modifiers: stat
            .modifiers
            .iter()
            .filter(|m| targets_resource(&m.target_id))
            .cloned()
            .collect(),
        regen: None,
    });
    let resources = resource_nodes.iter().map(|res| NodeDefinition {
        modifiers: res
            .modifiers
            .iter()
            .filter(|m| targets_resource(&m.target_id))
            .cloned()
            .collect(),
        ..res.clone()
    });
    let graph: Vec<NodeDefinition> = pinned_stats.chain(resources).collect();

    let resource_overrides: ValueMap = overrides
        .iter()
        .filter(|(id, _)| targets_resource(id))
        .map(|(id, v)| (id.clone(), *v))
        .collect();

    resolve(&graph, &resource_overrides)
        .into_iter()
        .filter(|(id, _)| targets_resource(id))
        .collect()
}

/// Resources unlocked by the held perks.
pub fn unlocked_resources<C>(content: &C, perks: &[ResolvedPerk]) -> BTreeSet<String>
where
    C: CharacterOracle + ?Sized,
{
    perks
        .iter()
        .filter_map(|p| content.perk(&p.id))
        .flat_map(|def| def.unlock_resources.iter().cloned())
        .collect()
}

/// Full attribute computation: perks, stats, resources, unlocked set.
pub fn compute_sheet<C>(
    content: &C,
    selection: &AvatarSelection,
    contributions: &Contributions,
) -> AttributeSheet
where
    C: NodeOracle + CharacterOracle + ?Sized,
{
    let StatSummary {
        perks,
        overrides,
        final_stats,
    } = aggregate_stats(content, selection, &contributions.stats);

    let mut final_resources = resolve_resources(
        content.stat_nodes(),
        content.resource_nodes(),
        &final_stats,
        &overrides,
    );
    for (id, bonus) in &contributions.resource_bonuses {
        if let Some(max) = final_resources.get_mut(id) {
            *max += bonus;
        }
    }

    let unlocked_resources = unlocked_resources(content, &perks);

    AttributeSheet {
        perks,
        overrides,
        final_stats,
        final_resources,
        unlocked_resources,
    }
}

fn accumulate<'a>(target: &mut ValueMap, block: impl IntoIterator<Item = (&'a String, &'a f64)>) {
    for (id, value) in block {
        if value.is_finite() {
            *target.entry(id.clone()).or_insert(0.0) += value;
        }
    }
}
