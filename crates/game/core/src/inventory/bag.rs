//! Bag instances and containment.
//!
//! # Containment Graph
//!
//! Bag slot arrays form a graph: an edge runs from bag `A` to bag `B` when one
//! of `A`'s slots holds `B`. The manager keeps this graph acyclic; the
//! traversals below still carry a visited set so corrupted save data cannot
//! send them into a loop.

use std::collections::{BTreeMap, BTreeSet};

use super::{BagInstanceId, SlotArray};

/// Bag instance id → its slot array.
pub type BagSlots = BTreeMap<BagInstanceId, SlotArray>;

/// Allocates ids for newly created bag instances.
pub trait InstanceIdSource {
    fn next_instance_id(&mut self, item_id: &str) -> BagInstanceId;
}

/// Counter-based ids, deterministic for tests and replays.
#[derive(Clone, Debug, Default)]
pub struct SequentialInstanceIds {
    next: u64,
}

impl SequentialInstanceIds {
    pub fn new() -> Self {
        Self::default()
    }
}

impl InstanceIdSource for SequentialInstanceIds {
    fn next_instance_id(&mut self, item_id: &str) -> BagInstanceId {
        let id = BagInstanceId::new(item_id, self.next, "seq");
        self.next += 1;
        id
    }
}

/// Bags held directly in `slots`.
fn child_bags(slots: &SlotArray) -> impl Iterator<Item = &BagInstanceId> {
    slots.iter().flatten().filter_map(|s| s.instance_id.as_ref())
}

/// Every bag instance reachable from `root`, `root` included.
pub fn reachable_bags(bags: &BagSlots, root: &BagInstanceId) -> BTreeSet<BagInstanceId> {
    let mut visited = BTreeSet::new();
    let mut stack = vec![root.clone()];

    while let Some(current) = stack.pop() {
        if !visited.insert(current.clone()) {
            continue;
        }
        if let Some(slots) = bags.get(&current) {
            stack.extend(child_bags(slots).filter(|c| !visited.contains(*c)).cloned());
        }
    }

    visited
}

/// True if `needle` is `root` or sits anywhere inside it.
pub fn contains_bag(bags: &BagSlots, root: &BagInstanceId, needle: &BagInstanceId) -> bool {
    root == needle || reachable_bags(bags, root).contains(needle)
}

/// True if some bag nested (at any depth) inside `root` holds items.
///
/// `root`'s own direct items do not count.
pub fn has_nested_contents(bags: &BagSlots, root: &BagInstanceId) -> bool {
    reachable_bags(bags, root)
        .iter()
        .filter(|id| *id != root)
        .any(|id| bags.get(id).is_some_and(SlotArray::has_items))
}

/// True if `root` or anything nested inside it holds items.
pub fn has_any_contents(bags: &BagSlots, root: &BagInstanceId) -> bool {
    reachable_bags(bags, root)
        .iter()
        .any(|id| bags.get(id).is_some_and(SlotArray::has_items))
}
