//! Equipment slot rules: where an item goes and where it may go.
//!
//! # Paired Slots
//!
//! Rings, earrings and outer weapons come in pairs. Content only ever names
//! the primary member; the sibling is reached by redirect when the primary is
//! taken, and compatibility treats both members as the same slot.
//!
//! ```text
//! ringLeft     <-> ringRight
//! earringLeft  <-> earringRight
//! weaponOuter1 <-> weaponOuter2
//! ```

use crate::env::{ItemDefinition, SlotRules, item_types, slot_ids};

use super::EquippedItems;

const SLOT_PAIRS: [(&str, &str); 3] = [
    (slot_ids::RING_LEFT, slot_ids::RING_RIGHT),
    (slot_ids::EARRING_LEFT, slot_ids::EARRING_RIGHT),
    (slot_ids::WEAPON_OUTER_1, slot_ids::WEAPON_OUTER_2),
];

/// The other member of a paired slot.
pub fn sibling_slot(slot: &str) -> Option<&'static str> {
    SLOT_PAIRS.iter().find_map(|(a, b)| {
        if *a == slot {
            Some(*b)
        } else if *b == slot {
            Some(*a)
        } else {
            None
        }
    })
}

fn same_family(a: &str, b: &str) -> bool {
    a == b || sibling_slot(a) == Some(b)
}

/// Slot the item declares: explicit `slot`, then the first type with a slot,
/// then the helmet fallback.
pub fn declared_slot<'a>(item: &'a ItemDefinition, rules: &'a SlotRules) -> Option<&'a str> {
    item.slot
        .as_deref()
        .or_else(|| item.types.iter().find_map(|ty| rules.slot_for_type(ty)))
        .or_else(|| item.has_type(item_types::HELMET).then_some(slot_ids::HEAD))
}

/// Destination slot for a quick equip.
///
/// A paired slot redirects to its sibling only when the primary is taken and
/// the sibling is free; in every other case the primary is used, replacing
/// whatever is there.
pub fn resolve_equip_target(
    item: &ItemDefinition,
    rules: &SlotRules,
    equipped: &EquippedItems,
) -> Option<String> {
    let primary = declared_slot(item, rules)?;
    let target = match sibling_slot(primary) {
        Some(sibling) if equipped.contains_key(primary) && !equipped.contains_key(sibling) => {
            sibling
        }
        _ => primary,
    };
    Some(target.to_string())
}

/// True if the item may be dropped onto `slot`.
pub fn is_compatible(item: &ItemDefinition, rules: &SlotRules, slot: &str) -> bool {
    if item.slot.as_deref().is_some_and(|s| same_family(s, slot)) {
        return true;
    }
    if item
        .types
        .iter()
        .filter_map(|ty| rules.slot_for_type(ty))
        .any(|s| same_family(s, slot))
    {
        return true;
    }
    slot == slot_ids::HEAD && item.has_type(item_types::HELMET)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::inventory::EquippedItem;

    fn ring() -> ItemDefinition {
        ItemDefinition::new("silver_ring").with_type("ring")
    }

    fn equipped(slots: &[&str]) -> EquippedItems {
        slots
            .iter()
            .map(|s| (s.to_string(), EquippedItem::new("x")))
            .collect()
    }

    #[test]
    fn explicit_slot_wins_over_types() {
        let item = ItemDefinition::new("crown")
            .with_slot("neck")
            .with_type("hat");
        assert_eq!(declared_slot(&item, &SlotRules::default()), Some("neck"));
    }

    #[test]
    fn first_matching_type_is_used() {
        let item = ItemDefinition::new("mystery")
            .with_type("trinket")
            .with_type("sword")
            .with_type("boots");
        assert_eq!(
            declared_slot(&item, &SlotRules::default()),
            Some(slot_ids::WEAPON_OUTER_1)
        );
    }

    #[test]
    fn ring_redirects_then_overwrites_primary() {
        let rules = SlotRules::default();
        let item = ring();

        assert_eq!(
            resolve_equip_target(&item, &rules, &equipped(&[])).as_deref(),
            Some("ringLeft")
        );
        assert_eq!(
            resolve_equip_target(&item, &rules, &equipped(&["ringLeft"])).as_deref(),
            Some("ringRight")
        );
        assert_eq!(
            resolve_equip_target(&item, &rules, &equipped(&["ringLeft", "ringRight"])).as_deref(),
            Some("ringLeft")
        );
        assert_eq!(
            resolve_equip_target(&item, &rules, &equipped(&["ringRight"])).as_deref(),
            Some("ringLeft")
        );
    }

    #[test]
    fn item_without_slot_has_no_target() {
        let item = ItemDefinition::new("ore").with_type("material");
        assert_eq!(
            resolve_equip_target(&item, &SlotRules::default(), &equipped(&[])),
            None
        );
    }

    #[test]
    fn helmet_fits_head_without_table_entry() {
        let rules = SlotRules::empty();
        let helmet = ItemDefinition::new("iron_helm").with_type("helmet");
        assert!(is_compatible(&helmet, &rules, "head"));
        assert!(!is_compatible(&helmet, &rules, "chest"));
        assert_eq!(declared_slot(&helmet, &rules), Some("head"));
    }

    #[test]
    fn paired_slots_are_interchangeable() {
        let rules = SlotRules::default();
        assert!(is_compatible(&ring(), &rules, "ringRight"));
        assert!(is_compatible(&ring(), &rules, "ringLeft"));
        assert!(!is_compatible(&ring(), &rules, "earringLeft"));

        let sword = ItemDefinition::new("blade").with_type("sword");
        assert!(is_compatible(&sword, &rules, "weaponOuter2"));

        let pinned = ItemDefinition::new("stud").with_slot("earringRight");
        assert!(is_compatible(&pinned, &rules, "earringLeft"));
    }

    #[test]
    fn preset_without_slot_matches_nothing() {
        let charm = ItemDefinition::new("charm").with_type("trinket");
        let rules = SlotRules::default();
        assert!(!is_compatible(&charm, &rules, "neck"));
        assert_eq!(declared_slot(&charm, &rules), None);
    }
}
