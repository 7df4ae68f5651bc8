//! Inventory/equipment manager.
//!
//! [`InventoryState`] owns the base slot array, one slot array per bag
//! instance, and the equipped-items map. All mutation goes through the
//! commands below; a command that returns an error has changed nothing.
//!
//! # Invariants
//!
//! - An item in the `bag` equipment slot has exactly one entry in `bags`.
//! - No bag instance is reachable from its own slot array.
//! - Stacks never exceed the item's max stack; overflow is reported, not dropped.

use std::iter;

use crate::config::GameConfig;
use crate::env::{ItemDefinition, ItemOracle, SlotRules, slot_ids};
use crate::stats::ValueMap;

use super::bag::{self, BagSlots, InstanceIdSource};
use super::equipment::{is_compatible, resolve_equip_target};
use super::{
    BagInstanceId, ContainerId, EquippedItem, EquippedItems, InventoryError, InventorySlot,
    SlotArray, SlotRef,
};

/// Read-only inputs for inventory commands.
#[derive(Clone, Copy)]
pub struct InventoryEnv<'a> {
    items: &'a dyn ItemOracle,
    config: &'a GameConfig,
}

impl<'a> InventoryEnv<'a> {
    pub fn new(items: &'a dyn ItemOracle, config: &'a GameConfig) -> Self {
        Self { items, config }
    }

    pub fn item(&self, id: &str) -> Result<&'a ItemDefinition, InventoryError> {
        let items: &'a dyn ItemOracle = self.items;
        items.item(id).ok_or_else(|| InventoryError::UnknownItem {
            item: id.to_string(),
        })
    }

    pub fn rules(&self) -> &'a SlotRules {
        let items: &'a dyn ItemOracle = self.items;
        items.slot_rules()
    }

    pub fn config(&self) -> &'a GameConfig {
        self.config
    }

    /// Max stack for an item id; unknown items use the configured default.
    pub fn max_stack(&self, id: &str) -> u32 {
        let default = self.config.default_max_stack;
        self.items
            .item(id)
            .map_or(default.max(1), |def| def.max_stack_or(default))
    }
}

/// Result of moving one inventory slot onto another.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MoveOutcome {
    /// Source and destination were the same slot.
    Unchanged,
    Moved,
    Swapped,
    /// Counts combined; `overflow` units stayed in the source slot.
    Stacked { moved: u32, overflow: u32 },
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default, rename_all = "camelCase"))]
pub struct InventoryState {
    base: SlotArray,
    bags: BagSlots,
    equipped: EquippedItems,
}

impl InventoryState {
    pub fn new(config: &GameConfig) -> Self {
        Self {
            base: SlotArray::new(config.base_inventory_slots),
            bags: BagSlots::new(),
            equipped: EquippedItems::new(),
        }
    }

    /// Rebuilds state from saved parts.
    ///
    /// The equipped bag gets an empty slot array if the save lost it.
    pub fn from_parts<C>(
        content: &C,
        base: SlotArray,
        mut bags: BagSlots,
        equipped: EquippedItems,
    ) -> Self
    where
        C: ItemOracle + ?Sized,
    {
        if let Some(EquippedItem {
            id,
            instance_id: Some(instance),
        }) = equipped.get(slot_ids::BAG)
        {
            let capacity = content.item(id).and_then(|d| d.capacity).unwrap_or(0);
            bags.entry(instance.clone())
                .or_insert_with(|| SlotArray::new(capacity));
        }
        Self {
            base,
            bags,
            equipped,
        }
    }

    pub fn base(&self) -> &SlotArray {
        &self.base
    }

    pub fn bags(&self) -> &BagSlots {
        &self.bags
    }

    pub fn equipped(&self) -> &EquippedItems {
        &self.equipped
    }

    pub fn equipped_in(&self, slot: &str) -> Option<&EquippedItem> {
        self.equipped.get(slot)
    }

    /// The bag being viewed: the one in the `bag` equipment slot.
    pub fn open_bag(&self) -> Option<&BagInstanceId> {
        self.equipped
            .get(slot_ids::BAG)
            .and_then(|item| item.instance_id.as_ref())
    }

    pub fn container(&self, id: &ContainerId) -> Result<&SlotArray, InventoryError> {
        match id {
            ContainerId::Base => Ok(&self.base),
            ContainerId::Bag(instance) => {
                self.bags
                    .get(instance)
                    .ok_or_else(|| InventoryError::UnknownContainer {
                        instance: instance.clone(),
                    })
            }
        }
    }

    fn container_mut(&mut self, id: &ContainerId) -> Result<&mut SlotArray, InventoryError> {
        match id {
            ContainerId::Base => Ok(&mut self.base),
            ContainerId::Bag(instance) => {
                self.bags
                    .get_mut(instance)
                    .ok_or_else(|| InventoryError::UnknownContainer {
                        instance: instance.clone(),
                    })
            }
        }
    }

    /// Contents of one slot. Errors if the address does not exist.
    pub fn slot(&self, at: &SlotRef) -> Result<Option<&InventorySlot>, InventoryError> {
        let slots = self.container(&at.container)?;
        slots.check_index(at.index)?;
        Ok(slots.get(at.index))
    }

    fn occupied(&self, at: &SlotRef) -> Result<&InventorySlot, InventoryError> {
        self.slot(at)?.ok_or(InventoryError::EmptySlot)
    }

    fn take(&mut self, at: &SlotRef) -> Result<InventorySlot, InventoryError> {
        let slots = self.container_mut(&at.container)?;
        slots.check_index(at.index)?;
        slots.take(at.index).ok_or(InventoryError::EmptySlot)
    }

    /// Takes a single unit, leaving the rest of the stack in place.
    fn take_one(&mut self, at: &SlotRef) -> Result<InventorySlot, InventoryError> {
        let slots = self.container_mut(&at.container)?;
        match slots.get_mut(at.index) {
            Some(slot) if slot.count > 1 => {
                slot.count -= 1;
                Ok(InventorySlot {
                    count: 1,
                    ..slot.clone()
                })
            }
            _ => self.take(at),
        }
    }

    fn put(
        &mut self,
        at: &SlotRef,
        slot: Option<InventorySlot>,
    ) -> Result<Option<InventorySlot>, InventoryError> {
        self.container_mut(&at.container)?.put(at.index, slot)
    }

    /// Runs `f` on a copy and commits only if it succeeds.
    fn transact<T>(
        &mut self,
        f: impl FnOnce(&mut Self) -> Result<T, InventoryError>,
    ) -> Result<T, InventoryError> {
        let mut next = self.clone();
        let out = f(&mut next)?;
        *self = next;
        Ok(out)
    }

    /// True if `container` is `held` itself or lies anywhere inside it.
    fn lies_within(&self, held: Option<&BagInstanceId>, container: &ContainerId) -> bool {
        match (held, container) {
            (Some(root), ContainerId::Bag(target)) => bag::contains_bag(&self.bags, root, target),
            _ => false,
        }
    }

    fn guard_nesting(
        &self,
        held: Option<&BagInstanceId>,
        container: &ContainerId,
    ) -> Result<(), InventoryError> {
        match held {
            Some(instance) if self.lies_within(held, container) => {
                Err(InventoryError::BagInsideItself {
                    instance: instance.clone(),
                })
            }
            _ => Ok(()),
        }
    }

    // ===== inventory commands =====

    /// Moves, stacks or swaps the contents of two inventory slots.
    pub fn move_item(
        &mut self,
        env: &InventoryEnv<'_>,
        from: &SlotRef,
        to: &SlotRef,
    ) -> Result<MoveOutcome, InventoryError> {
        let source = self.occupied(from)?.clone();
        let target = self.slot(to)?.cloned();
        if from == to {
            return Ok(MoveOutcome::Unchanged);
        }
        self.guard_nesting(source.instance_id.as_ref(), &to.container)?;

        let Some(target) = target else {
            return self.transact(|inv| {
                let item = inv.take(from)?;
                inv.put(to, Some(item))?;
                Ok(MoveOutcome::Moved)
            });
        };

        let max = env.max_stack(&source.id);
        let stackable = target.id == source.id
            && source.instance_id.is_none()
            && target.instance_id.is_none()
            && max > 1;

        if stackable {
            let moved = max.saturating_sub(target.count).min(source.count);
            let overflow = source.count - moved;
            if moved == 0 {
                return Ok(MoveOutcome::Stacked { moved, overflow });
            }
            return self.transact(|inv| {
                if let Some(slot) = inv.container_mut(&to.container)?.get_mut(to.index) {
                    slot.count += moved;
                }
                if overflow == 0 {
                    inv.take(from)?;
                } else if let Some(slot) = inv.container_mut(&from.container)?.get_mut(from.index)
                {
                    slot.count = overflow;
                }
                Ok(MoveOutcome::Stacked { moved, overflow })
            });
        }

        self.guard_nesting(target.instance_id.as_ref(), &from.container)?;
        self.transact(|inv| {
            let a = inv.take(from)?;
            let b = inv.take(to)?;
            inv.put(to, Some(a))?;
            inv.put(from, Some(b))?;
            Ok(MoveOutcome::Swapped)
        })
    }

    /// Adds `count` units: tops up existing stacks first, then fills empty
    /// slots (base inventory, then the open bag).
    ///
    /// Returns the units that did not fit.
    pub fn add_item(
        &mut self,
        env: &InventoryEnv<'_>,
        item_id: &str,
        count: u32,
    ) -> Result<u32, InventoryError> {
        let def = env.item(item_id)?;
        let max = def.max_stack_or(env.config().default_max_stack);
        let containers: Vec<ContainerId> = iter::once(ContainerId::Base)
            .chain(self.open_bag().cloned().map(ContainerId::Bag))
            .collect();

        self.transact(|inv| {
            let mut remaining = count;

            if max > 1 {
                for container in &containers {
                    let slots = inv.container_mut(container)?;
                    for index in 0..slots.len() {
                        if remaining == 0 {
                            break;
                        }
                        if let Some(slot) = slots.get_mut(index) {
                            if slot.id == item_id && slot.instance_id.is_none() && slot.count < max
                            {
                                let added = (max - slot.count).min(remaining);
                                slot.count += added;
                                remaining -= added;
                            }
                        }
                    }
                }
            }

            for container in &containers {
                let slots = inv.container_mut(container)?;
                while remaining > 0 {
                    let Some(index) = slots.first_empty() else {
                        break;
                    };
                    let placed = remaining.min(max);
                    slots.put(index, Some(InventorySlot::new(item_id, placed)))?;
                    remaining -= placed;
                }
            }

            Ok(remaining)
        })
    }

    /// Removes `count` units from a slot and returns them.
    ///
    /// A bag instance can only be removed once it and everything inside it
    /// is empty; use [`Self::discard_bag`] to throw contents away.
    pub fn remove_at(&mut self, at: &SlotRef, count: u32) -> Result<InventorySlot, InventoryError> {
        let slot = self.occupied(at)?.clone();
        if count == 0 || count > slot.count {
            return Err(InventoryError::InvalidQuantity {
                requested: count,
                available: slot.count,
            });
        }
        if let Some(instance) = &slot.instance_id {
            if bag::has_any_contents(&self.bags, instance) {
                return Err(InventoryError::BagNotEmpty {
                    instance: instance.clone(),
                });
            }
        }

        self.transact(|inv| {
            if count == slot.count {
                inv.take(at)?;
                if let Some(instance) = &slot.instance_id {
                    inv.remove_bag_tree(instance);
                }
            } else if let Some(remaining) = inv.container_mut(&at.container)?.get_mut(at.index) {
                remaining.count -= count;
            }
            Ok(InventorySlot {
                count,
                ..slot.clone()
            })
        })
    }

    /// Deletes a slot's contents; for a bag, also every bag nested inside it.
    ///
    /// Refuses with [`InventoryError::BagNotEmpty`] when items would be lost
    /// and `confirmed` is false. Returns every item that was destroyed.
    pub fn discard_bag(
        &mut self,
        at: &SlotRef,
        confirmed: bool,
    ) -> Result<Vec<InventorySlot>, InventoryError> {
        let slot = self.occupied(at)?.clone();
        if let Some(instance) = &slot.instance_id {
            if !confirmed && bag::has_any_contents(&self.bags, instance) {
                return Err(InventoryError::BagNotEmpty {
                    instance: instance.clone(),
                });
            }
        }

        self.transact(|inv| {
            let mut lost = vec![inv.take(at)?];
            if let Some(instance) = &slot.instance_id {
                lost.extend(inv.remove_bag_tree(instance));
            }
            Ok(lost)
        })
    }

    /// Moves `count` units of a stack into an empty slot.
    pub fn split_stack(
        &mut self,
        from: &SlotRef,
        to: &SlotRef,
        count: u32,
    ) -> Result<(), InventoryError> {
        let source = self.occupied(from)?.clone();
        if self.slot(to)?.is_some() {
            return Err(InventoryError::NoSpace);
        }
        if count == 0 || count >= source.count {
            return Err(InventoryError::InvalidQuantity {
                requested: count,
                available: source.count,
            });
        }

        self.transact(|inv| {
            if let Some(slot) = inv.container_mut(&from.container)?.get_mut(from.index) {
                slot.count -= count;
            }
            inv.put(to, Some(InventorySlot::new(source.id.clone(), count)))?;
            Ok(())
        })
    }

    /// Drops the slot arrays of `root` and every bag inside it, returning
    /// the items they held.
    fn remove_bag_tree(&mut self, root: &BagInstanceId) -> Vec<InventorySlot> {
        bag::reachable_bags(&self.bags, root)
            .iter()
            .filter_map(|id| self.bags.remove(id))
            .flat_map(|slots| slots.occupied().map(|(_, s)| s.clone()).collect::<Vec<_>>())
            .collect()
    }

    // ===== equipment commands =====

    /// Equips one unit from `from`.
    ///
    /// With `target` the item must be compatible with that slot; without it
    /// the slot comes from [`resolve_equip_target`]. A bag without an instance
    /// gets one, with an empty slot array of its declared capacity. Whatever
    /// was in the slot goes back to `from`, or to the first free base slot when
    /// `from` is still occupied or lies inside the displaced bag.
    ///
    /// Returns the slot the item went into.
    pub fn equip(
        &mut self,
        env: &InventoryEnv<'_>,
        ids: &mut dyn InstanceIdSource,
        from: &SlotRef,
        target: Option<&str>,
    ) -> Result<String, InventoryError> {
        let source = self.occupied(from)?.clone();
        let def = env.item(&source.id)?;
        let slot = match target {
            Some(slot) if is_compatible(def, env.rules(), slot) => slot.to_string(),
            Some(slot) => {
                return Err(InventoryError::IncompatibleSlot {
                    item: source.id,
                    slot: slot.to_string(),
                });
            }
            None => resolve_equip_target(def, env.rules(), &self.equipped).ok_or_else(|| {
                InventoryError::NoEquipSlot {
                    item: source.id.clone(),
                }
            })?,
        };

        self.transact(|inv| {
            let mut item = inv.take_one(from)?;
            if def.is_bag() {
                let instance = match item.instance_id.take() {
                    Some(instance) => instance,
                    None => ids.next_instance_id(&item.id),
                };
                inv.bags
                    .entry(instance.clone())
                    .or_insert_with(|| SlotArray::new(def.capacity.unwrap_or(0)));
                item.instance_id = Some(instance);
            }

            if let Some(displaced) = inv.equipped.insert(slot.clone(), item.into()) {
                if !inv.stack_back(env, &displaced, from)? {
                    let back = Some(from)
                        .filter(|f| !inv.lies_within(displaced.instance_id.as_ref(), &f.container));
                    inv.place_unequipped(displaced, back)?;
                }
            }
            Ok(slot)
        })
    }

    /// Moves an equipped item into the inventory.
    ///
    /// Goes to `to` when that slot is free, else to the first free base
    /// slot; fails with [`InventoryError::NoSpace`] when there is none.
    pub fn unequip(&mut self, slot: &str, to: Option<&SlotRef>) -> Result<SlotRef, InventoryError> {
        let item = self
            .equipped
            .get(slot)
            .cloned()
            .ok_or_else(|| InventoryError::SlotNotEquipped {
                slot: slot.to_string(),
            })?;

        self.transact(|inv| {
            inv.equipped.remove(slot);
            inv.place_unequipped(item, to)
        })
    }

    /// Moves (or swaps) items between two equipment slots.
    pub fn move_equipped(
        &mut self,
        env: &InventoryEnv<'_>,
        from: &str,
        to: &str,
    ) -> Result<MoveOutcome, InventoryError> {
        let item = self
            .equipped
            .get(from)
            .ok_or_else(|| InventoryError::SlotNotEquipped {
                slot: from.to_string(),
            })?;
        if from == to {
            return Ok(MoveOutcome::Unchanged);
        }
        if !is_compatible(env.item(&item.id)?, env.rules(), to) {
            return Err(InventoryError::IncompatibleSlot {
                item: item.id.clone(),
                slot: to.to_string(),
            });
        }
        if let Some(other) = self.equipped.get(to) {
            if !is_compatible(env.item(&other.id)?, env.rules(), from) {
                return Err(InventoryError::IncompatibleSlot {
                    item: other.id.clone(),
                    slot: from.to_string(),
                });
            }
        }

        let moving = self.equipped.remove(from);
        let other = self.equipped.remove(to);
        let outcome = match other {
            Some(other) => {
                self.equipped.insert(from.to_string(), other);
                MoveOutcome::Swapped
            }
            None => MoveOutcome::Moved,
        };
        if let Some(moving) = moving {
            self.equipped.insert(to.to_string(), moving);
        }
        Ok(outcome)
    }

    /// Returns a displaced unit to the stack it was equipped from, if it fits.
    fn stack_back(
        &mut self,
        env: &InventoryEnv<'_>,
        item: &EquippedItem,
        at: &SlotRef,
    ) -> Result<bool, InventoryError> {
        if item.instance_id.is_some() {
            return Ok(false);
        }
        let max = env.max_stack(&item.id);
        match self.container_mut(&at.container)?.get_mut(at.index) {
            Some(slot) if slot.id == item.id && slot.instance_id.is_none() && slot.count < max => {
                slot.count += 1;
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    fn place_unequipped(
        &mut self,
        item: EquippedItem,
        preferred: Option<&SlotRef>,
    ) -> Result<SlotRef, InventoryError> {
        if let Some(instance) = &item.instance_id {
            if let Some(at) = preferred {
                self.guard_nesting(Some(instance), &at.container)?;
            }
            if bag::has_nested_contents(&self.bags, instance) {
                return Err(InventoryError::BagHasNestedContents {
                    instance: instance.clone(),
                });
            }
        }

        let dest = match preferred {
            Some(at) if self.slot(at)?.is_none() => at.clone(),
            _ => SlotRef::base(self.base.first_empty().ok_or(InventoryError::NoSpace)?),
        };
        self.put(&dest, Some(item.into()))?;
        Ok(dest)
    }

    /// Summed `stats` of every equipped item.
    pub fn equipment_stats<C>(&self, content: &C) -> ValueMap
    where
        C: ItemOracle + ?Sized,
    {
        let mut total = ValueMap::new();
        for def in self.equipped.values().filter_map(|e| content.item(&e.id)) {
            for (stat, value) in def.stats.iter().filter(|(_, v)| v.is_finite()) {
                *total.entry(stat.clone()).or_insert(0.0) += value;
            }
        }
        total
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::env::ContentTables;
    use crate::inventory::SequentialInstanceIds;

    fn content() -> ContentTables {
        ContentTables::new()
            .with_item(ItemDefinition::new("ore").with_max_stack(10))
            .with_item(ItemDefinition::new("gem"))
            .with_item(
                ItemDefinition::new("copper_ring")
                    .with_type("ring")
                    .with_max_stack(5),
            )
            .with_item(
                ItemDefinition::new("silver_ring")
                    .with_type("ring")
                    .with_stat("wisdom", 1.0),
            )
            .with_item(
                ItemDefinition::new("iron_helm")
                    .with_type("helmet")
                    .with_stat("armor", 3.0),
            )
            .with_item(ItemDefinition::new("pouch").with_type("bag").with_capacity(2))
            .with_item(ItemDefinition::new("satchel").with_type("bag").with_capacity(4))
    }

    fn config() -> GameConfig {
        GameConfig::new().with_base_inventory_slots(4)
    }

    struct World {
        content: ContentTables,
        config: GameConfig,
        ids: SequentialInstanceIds,
    }

    impl World {
        fn new() -> Self {
            Self {
                content: content(),
                config: config(),
                ids: SequentialInstanceIds::new(),
            }
        }

        fn env(&self) -> InventoryEnv<'_> {
            InventoryEnv::new(&self.content, &self.config)
        }

        fn inventory(&self) -> InventoryState {
            InventoryState::new(&self.config)
        }
    }

    /// Adds a fresh bag, equips it and returns its instance id.
    fn equip_bag(world: &mut World, inv: &mut InventoryState, item: &str) -> BagInstanceId {
        inv.add_item(&world.env(), item, 1).unwrap();
        let index = inv
            .base()
            .occupied()
            .find(|(_, s)| s.id == item)
            .map(|(i, _)| i)
            .unwrap();
        let at = SlotRef::base(index);
        let env = InventoryEnv::new(&world.content, &world.config);
        inv.equip(&env, &mut world.ids, &at, None).unwrap();
        inv.open_bag().cloned().unwrap()
    }

    #[test]
    fn add_item_stacks_then_fills_and_reports_overflow() {
        let world = World::new();
        let mut inv = world.inventory();

        assert_eq!(inv.add_item(&world.env(), "ore", 7), Ok(0));
        assert_eq!(inv.add_item(&world.env(), "ore", 5), Ok(0));
        assert_eq!(inv.base().get(0).map(|s| s.count), Some(10));
        assert_eq!(inv.base().get(1).map(|s| s.count), Some(2));

        assert_eq!(inv.add_item(&world.env(), "ore", 100), Ok(72));
        assert_eq!(inv.base().first_empty(), None);

        assert!(matches!(
            inv.add_item(&world.env(), "nothing", 1),
            Err(InventoryError::UnknownItem { .. })
        ));
    }

    #[test]
    fn stacking_surfaces_overflow() {
        let world = World::new();
        let mut inv = world.inventory();
        inv.add_item(&world.env(), "ore", 8).unwrap();
        inv.split_stack(&SlotRef::base(0), &SlotRef::base(1), 3).unwrap();
        inv.add_item(&world.env(), "ore", 8).unwrap();
        assert_eq!(inv.base().get(0).map(|s| s.count), Some(10));
        assert_eq!(inv.base().get(1).map(|s| s.count), Some(6));

        let outcome = inv
            .move_item(&world.env(), &SlotRef::base(1), &SlotRef::base(0))
            .unwrap();
        assert_eq!(outcome, MoveOutcome::Stacked { moved: 0, overflow: 6 });

        inv.remove_at(&SlotRef::base(0), 4).unwrap();
        let outcome = inv
            .move_item(&world.env(), &SlotRef::base(1), &SlotRef::base(0))
            .unwrap();
        assert_eq!(outcome, MoveOutcome::Stacked { moved: 4, overflow: 2 });
        assert_eq!(inv.base().get(0).map(|s| s.count), Some(10));
        assert_eq!(inv.base().get(1).map(|s| s.count), Some(2));
    }

    #[test]
    fn non_stackable_items_swap() {
        let world = World::new();
        let mut inv = world.inventory();
        inv.add_item(&world.env(), "gem", 1).unwrap();
        inv.add_item(&world.env(), "ore", 1).unwrap();

        let outcome = inv
            .move_item(&world.env(), &SlotRef::base(0), &SlotRef::base(1))
            .unwrap();
        assert_eq!(outcome, MoveOutcome::Swapped);
        assert_eq!(inv.base().get(0).map(|s| s.id.as_str()), Some("ore"));
        assert_eq!(inv.base().get(1).map(|s| s.id.as_str()), Some("gem"));
    }

    #[test]
    fn rings_fill_both_slots_then_overwrite_left() {
        let mut world = World::new();
        let mut inv = world.inventory();
        inv.add_item(&world.env(), "silver_ring", 3).unwrap();
        let env = InventoryEnv::new(&world.content, &world.config);

        let first = inv.equip(&env, &mut world.ids, &SlotRef::base(0), None).unwrap();
        let second = inv.equip(&env, &mut world.ids, &SlotRef::base(1), None).unwrap();
        let third = inv.equip(&env, &mut world.ids, &SlotRef::base(2), None).unwrap();

        assert_eq!(first, "ringLeft");
        assert_eq!(second, "ringRight");
        assert_eq!(third, "ringLeft");
        assert_eq!(inv.equipped().len(), 2);
        // the displaced ring went back to the emptied slot
        assert_eq!(inv.base().get(2).map(|s| s.id.as_str()), Some("silver_ring"));
    }

    #[test]
    fn displaced_unit_stacks_back_onto_its_source() {
        let mut world = World::new();
        let mut inv = world.inventory();
        inv.add_item(&world.env(), "copper_ring", 4).unwrap();
        let env = InventoryEnv::new(&world.content, &world.config);
        inv.equip(&env, &mut world.ids, &SlotRef::base(0), None).unwrap();
        inv.equip(&env, &mut world.ids, &SlotRef::base(0), None).unwrap();
        inv.add_item(&env, "gem", 3).unwrap();
        assert_eq!(inv.base().first_empty(), None);

        let slot = inv.equip(&env, &mut world.ids, &SlotRef::base(0), None).unwrap();
        assert_eq!(slot, "ringLeft");
        assert_eq!(inv.base().get(0).map(|s| s.count), Some(2));
        assert_eq!(inv.equipped().len(), 2);
    }

    #[test]
    fn helmet_equips_on_head_with_empty_table() {
        let mut world = World::new();
        world.content.slot_rules = SlotRules::empty();
        let mut inv = world.inventory();
        inv.add_item(&world.env(), "iron_helm", 1).unwrap();
        let env = InventoryEnv::new(&world.content, &world.config);

        let slot = inv
            .equip(&env, &mut world.ids, &SlotRef::base(0), Some("head"))
            .unwrap();
        assert_eq!(slot, "head");
        assert_eq!(inv.equipment_stats(&world.content)["armor"], 3.0);
    }

    #[test]
    fn incompatible_slot_is_rejected_unchanged() {
        let mut world = World::new();
        let mut inv = world.inventory();
        inv.add_item(&world.env(), "gem", 1).unwrap();
        let before = inv.clone();
        let env = InventoryEnv::new(&world.content, &world.config);

        let err = inv
            .equip(&env, &mut world.ids, &SlotRef::base(0), Some("head"))
            .unwrap_err();
        assert!(matches!(err, InventoryError::IncompatibleSlot { .. }));
        assert!(matches!(
            inv.equip(&env, &mut world.ids, &SlotRef::base(0), None),
            Err(InventoryError::NoEquipSlot { .. })
        ));
        assert_eq!(inv, before);
    }

    #[test]
    fn equipping_bag_creates_instance_with_capacity() {
        let mut world = World::new();
        let mut inv = world.inventory();
        let pouch = equip_bag(&mut world, &mut inv, "pouch");

        assert_eq!(pouch.item_id(), "pouch");
        assert_eq!(inv.bags().get(&pouch).map(SlotArray::len), Some(2));
        assert_eq!(inv.equipped_in("bag").map(|e| e.id.as_str()), Some("pouch"));
    }

    #[test]
    fn open_bag_dropped_on_own_slot_is_rejected_unchanged() {
        let mut world = World::new();
        let mut inv = world.inventory();
        let pouch = equip_bag(&mut world, &mut inv, "pouch");
        let before = inv.clone();

        let err = inv
            .unequip("bag", Some(&SlotRef::bag(pouch.clone(), 0)))
            .unwrap_err();
        assert_eq!(err, InventoryError::BagInsideItself { instance: pouch });
        assert_eq!(inv, before);
    }

    #[test]
    fn bag_cannot_move_into_a_bag_it_contains() {
        let mut world = World::new();
        let mut inv = world.inventory();
        let satchel = equip_bag(&mut world, &mut inv, "satchel");

        inv.add_item(&world.env(), "pouch", 1).unwrap();
        let env = InventoryEnv::new(&world.content, &world.config);
        inv.equip(&env, &mut world.ids, &SlotRef::base(0), None).unwrap();
        let pouch = inv.open_bag().cloned().unwrap();
        // satchel was displaced to base 0
        assert_eq!(inv.base().get(0).map(|s| s.id.as_str()), Some("satchel"));

        // satchel now lives inside the open pouch
        inv.move_item(&env, &SlotRef::base(0), &SlotRef::bag(pouch.clone(), 0))
            .unwrap();
        let before = inv.clone();
        let err = inv
            .unequip("bag", Some(&SlotRef::bag(satchel.clone(), 0)))
            .unwrap_err();
        assert_eq!(err, InventoryError::BagInsideItself { instance: pouch });
        assert_eq!(inv, before);
    }

    #[test]
    fn unequip_with_nested_contents_is_rejected() {
        let mut world = World::new();
        let mut inv = world.inventory();
        let satchel = equip_bag(&mut world, &mut inv, "satchel");

        // pouch holding ore, nested inside the open satchel
        inv.add_item(&world.env(), "pouch", 1).unwrap();
        let env = InventoryEnv::new(&world.content, &world.config);
        inv.equip(&env, &mut world.ids, &SlotRef::base(0), None).unwrap();
        let pouch = inv.open_bag().cloned().unwrap();
        inv.add_item(&env, "ore", 3).unwrap();
        let ore_at = SlotRef::base(1);
        inv.move_item(&env, &ore_at, &SlotRef::bag(pouch.clone(), 0)).unwrap();
        inv.equip(&env, &mut world.ids, &SlotRef::base(0), None).unwrap();
        assert_eq!(inv.open_bag(), Some(&satchel));
        inv.move_item(&env, &SlotRef::base(0), &SlotRef::bag(satchel.clone(), 0))
            .unwrap();

        let before = inv.clone();
        let err = inv.unequip("bag", Some(&SlotRef::base(0))).unwrap_err();
        assert_eq!(err, InventoryError::BagHasNestedContents { instance: satchel });
        assert_eq!(inv, before);
    }

    #[test]
    fn unequip_falls_back_to_free_base_slot_or_reports_no_space() {
        let mut world = World::new();
        let mut inv = world.inventory();
        inv.add_item(&world.env(), "silver_ring", 1).unwrap();
        let env = InventoryEnv::new(&world.content, &world.config);
        inv.equip(&env, &mut world.ids, &SlotRef::base(0), None).unwrap();

        inv.add_item(&env, "gem", 1).unwrap();
        let to = inv.unequip("ringLeft", Some(&SlotRef::base(0))).unwrap();
        assert_eq!(to, SlotRef::base(1));

        inv.equip(&env, &mut world.ids, &SlotRef::base(1), None).unwrap();
        inv.add_item(&env, "gem", 4).unwrap();
        let before = inv.clone();
        assert_eq!(inv.unequip("ringLeft", None), Err(InventoryError::NoSpace));
        assert_eq!(inv, before);
    }

    #[test]
    fn discarding_bag_requires_confirmation_when_not_empty() {
        let mut world = World::new();
        let mut inv = world.inventory();
        let pouch = equip_bag(&mut world, &mut inv, "pouch");
        inv.add_item(&world.env(), "ore", 14).unwrap();
        inv.move_item(&world.env(), &SlotRef::base(1), &SlotRef::bag(pouch.clone(), 1))
            .unwrap();
        inv.unequip("bag", None).unwrap();
        let at = SlotRef::base(1);
        assert_eq!(inv.slot(&at).unwrap().map(|s| s.id.as_str()), Some("pouch"));

        assert!(matches!(
            inv.remove_at(&at, 1),
            Err(InventoryError::BagNotEmpty { .. })
        ));
        assert!(matches!(
            inv.discard_bag(&at, false),
            Err(InventoryError::BagNotEmpty { .. })
        ));

        let lost = inv.discard_bag(&at, true).unwrap();
        assert_eq!(lost.len(), 2);
        assert!(inv.bags().is_empty());
        assert_eq!(inv.slot(&at).unwrap(), None);
    }

    #[test]
    fn split_stack_validates_quantity_and_target() {
        let world = World::new();
        let mut inv = world.inventory();
        inv.add_item(&world.env(), "ore", 5).unwrap();
        inv.add_item(&world.env(), "gem", 1).unwrap();

        assert!(matches!(
            inv.split_stack(&SlotRef::base(0), &SlotRef::base(2), 5),
            Err(InventoryError::InvalidQuantity { .. })
        ));
        assert_eq!(
            inv.split_stack(&SlotRef::base(0), &SlotRef::base(1), 2),
            Err(InventoryError::NoSpace)
        );
        inv.split_stack(&SlotRef::base(0), &SlotRef::base(2), 2).unwrap();
        assert_eq!(inv.base().get(0).map(|s| s.count), Some(3));
        assert_eq!(inv.base().get(2).map(|s| s.count), Some(2));
    }

    #[test]
    fn move_equipped_between_paired_slots() {
        let mut world = World::new();
        let mut inv = world.inventory();
        inv.add_item(&world.env(), "silver_ring", 1).unwrap();
        let env = InventoryEnv::new(&world.content, &world.config);
        inv.equip(&env, &mut world.ids, &SlotRef::base(0), None).unwrap();

        assert_eq!(
            inv.move_equipped(&env, "ringLeft", "ringRight"),
            Ok(MoveOutcome::Moved)
        );
        assert!(inv.equipped_in("ringRight").is_some());
        assert!(matches!(
            inv.move_equipped(&env, "ringRight", "head"),
            Err(InventoryError::IncompatibleSlot { .. })
        ));
    }
}
