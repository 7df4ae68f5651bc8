//! Item catalog loader.

use std::collections::BTreeSet;
use std::path::Path;

use idle_core::ItemDefinition;
use serde::{Deserialize, Serialize};

use crate::loaders::{LoadResult, read_file};

/// Item catalog structure for RON files.
///
/// Items go through the raw record shape, so both `type: "ring"` and
/// `types: ["ring"]` are accepted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ItemCatalog {
    pub items: Vec<ItemDefinition>,
}

/// Loader for item catalog from RON files.
pub struct ItemLoader;

impl ItemLoader {
    /// Load item catalog from a RON file.
    pub fn load(path: &Path) -> LoadResult<Vec<ItemDefinition>> {
        let content = read_file(path)?;
        Self::parse(&content)
    }

    pub fn parse(content: &str) -> LoadResult<Vec<ItemDefinition>> {
        let catalog: ItemCatalog = ron::from_str(content)
            .map_err(|e| anyhow::anyhow!("Failed to parse item catalog RON: {}", e))?;

        let mut seen = BTreeSet::new();
        for item in &catalog.items {
            if item.id.is_empty() {
                anyhow::bail!("Item without id");
            }
            if !seen.insert(item.id.as_str()) {
                anyhow::bail!("Duplicate item id: {}", item.id);
            }
        }
        Ok(catalog.items)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use idle_core::env::ItemEffect;

    #[test]
    fn single_type_and_type_list_both_normalize() {
        let items = ItemLoader::parse(
            r#"(items: [
                (id: "silver_ring", type: "ring"),
                (id: "iron_helm", types: ["helmet", "metal"]),
                (id: "cap", type: "hat", types: ["hat", "cloth"]),
                (id: "rock", type: ""),
            ])"#,
        )
        .unwrap();

        assert_eq!(items[0].types, vec!["ring"]);
        assert_eq!(items[1].types, vec!["helmet", "metal"]);
        assert_eq!(items[2].types, vec!["hat", "cloth"]);
        assert!(items[3].types.is_empty());
    }

    #[test]
    fn effects_parse_with_unknown_fallback() {
        let items = ItemLoader::parse(
            r#"(items: [
                (id: "tome", effects: [
                    unlock_skills(abilityIds: ["dig", "chop"], learnAll: true),
                    glitter,
                    restore_resource(resourceId: "mana", amount: 2.5),
                ]),
                (id: "scroll", effects: [unlock_skills(abilityIds: ["fish"])]),
            ])"#,
        )
        .unwrap();

        let tome = &items[0];
        assert_eq!(
            tome.effects[0],
            ItemEffect::UnlockSkills {
                ability_ids: vec!["dig".into(), "chop".into()],
                learn_all: true,
            }
        );
        assert_eq!(tome.effects[1], ItemEffect::Unknown);
        assert_eq!(
            tome.effects[2],
            ItemEffect::RestoreResource {
                resource_id: "mana".into(),
                amount: 2.5,
            }
        );
        assert_eq!(
            items[1].effects,
            vec![ItemEffect::UnlockSkills {
                ability_ids: vec!["fish".into()],
                learn_all: false,
            }]
        );
    }

    #[test]
    fn item_without_id_is_rejected() {
        assert!(ItemLoader::parse(r#"(items: [(name: "Nameless")])"#).is_err());
    }
}
