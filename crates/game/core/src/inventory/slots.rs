//! Slot-level data: slot contents, slot arrays, bag instance ids and the
//! addresses the manager operates on.

use std::collections::BTreeMap;
use std::fmt;

use super::InventoryError;

/// Identity of one bag container: `"<bagItemId>:<creationTimestamp>_<suffix>"`.
///
/// Two bags of the same item id are different containers; the instance id is
/// what tells them apart.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct BagInstanceId(String);

impl BagInstanceId {
    pub const SEPARATOR: char = ':';

    pub fn new(item_id: &str, created_at: impl fmt::Display, suffix: &str) -> Self {
        Self(format!("{item_id}{}{created_at}_{suffix}", Self::SEPARATOR))
    }

    /// Wraps an id produced elsewhere (save files).
    pub fn from_raw(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Base item id: everything before the first separator.
    pub fn item_id(&self) -> &str {
        self.0
            .split_once(Self::SEPARATOR)
            .map_or(self.0.as_str(), |(item, _)| item)
    }
}

impl fmt::Display for BagInstanceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// One occupied inventory slot.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct InventorySlot {
    pub id: String,
    pub count: u32,
    /// Present only on bags that own a slot array.
    #[cfg_attr(
        feature = "serde",
        serde(default, skip_serializing_if = "Option::is_none")
    )]
    pub instance_id: Option<BagInstanceId>,
}

impl InventorySlot {
    pub fn new(id: impl Into<String>, count: u32) -> Self {
        Self {
            id: id.into(),
            count,
            instance_id: None,
        }
    }

    pub fn bag(instance_id: BagInstanceId) -> Self {
        Self {
            id: instance_id.item_id().to_string(),
            count: 1,
            instance_id: Some(instance_id),
        }
    }
}

/// Fixed-size array of optional slots. Empty slots are `None`.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct SlotArray {
    slots: Vec<Option<InventorySlot>>,
}

impl SlotArray {
    pub fn new(len: usize) -> Self {
        Self {
            slots: vec![None; len],
        }
    }

    pub fn from_slots(slots: Vec<Option<InventorySlot>>) -> Self {
        Self { slots }
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// True if any slot is occupied.
    pub fn has_items(&self) -> bool {
        self.slots.iter().any(Option::is_some)
    }

    pub fn get(&self, index: usize) -> Option<&InventorySlot> {
        self.slots.get(index).and_then(Option::as_ref)
    }

    pub fn get_mut(&mut self, index: usize) -> Option<&mut InventorySlot> {
        self.slots.get_mut(index).and_then(Option::as_mut)
    }

    pub fn check_index(&self, index: usize) -> Result<(), InventoryError> {
        if index < self.slots.len() {
            Ok(())
        } else {
            Err(InventoryError::SlotOutOfRange {
                index,
                len: self.slots.len(),
            })
        }
    }

    pub fn take(&mut self, index: usize) -> Option<InventorySlot> {
        self.slots.get_mut(index).and_then(Option::take)
    }

    /// Replaces the slot contents, returning what was there.
    pub fn put(
        &mut self,
        index: usize,
        slot: Option<InventorySlot>,
    ) -> Result<Option<InventorySlot>, InventoryError> {
        self.check_index(index)?;
        Ok(std::mem::replace(&mut self.slots[index], slot))
    }

    pub fn first_empty(&self) -> Option<usize> {
        self.slots.iter().position(Option::is_none)
    }

    pub fn iter(&self) -> impl Iterator<Item = Option<&InventorySlot>> {
        self.slots.iter().map(Option::as_ref)
    }

    /// Occupied slots with their indices.
    pub fn occupied(&self) -> impl Iterator<Item = (usize, &InventorySlot)> {
        self.slots
            .iter()
            .enumerate()
            .filter_map(|(i, s)| s.as_ref().map(|s| (i, s)))
    }
}

/// Item in a named equipment slot.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct EquippedItem {
    pub id: String,
    #[cfg_attr(
        feature = "serde",
        serde(default, skip_serializing_if = "Option::is_none")
    )]
    pub instance_id: Option<BagInstanceId>,
}

impl EquippedItem {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            instance_id: None,
        }
    }
}

impl From<InventorySlot> for EquippedItem {
    fn from(slot: InventorySlot) -> Self {
        Self {
            id: slot.id,
            instance_id: slot.instance_id,
        }
    }
}

impl From<EquippedItem> for InventorySlot {
    fn from(item: EquippedItem) -> Self {
        Self {
            id: item.id,
            count: 1,
            instance_id: item.instance_id,
        }
    }
}

/// Equipment slot id → equipped item.
pub type EquippedItems = BTreeMap<String, EquippedItem>;

/// Which slot array a slot belongs to.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum ContainerId {
    Base,
    Bag(BagInstanceId),
}

/// Address of one inventory slot.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SlotRef {
    pub container: ContainerId,
    pub index: usize,
}

impl SlotRef {
    pub fn base(index: usize) -> Self {
        Self {
            container: ContainerId::Base,
            index,
        }
    }

    pub fn bag(instance: BagInstanceId, index: usize) -> Self {
        Self {
            container: ContainerId::Bag(instance),
            index,
        }
    }

    /// Bag instance owning this slot, if it is not a base slot.
    pub fn bag_instance(&self) -> Option<&BagInstanceId> {
        match &self.container {
            ContainerId::Base => None,
            ContainerId::Bag(id) => Some(id),
        }
    }
}

/// Either an inventory slot or a character equipment slot.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum Location {
    Inventory(SlotRef),
    Equipped(String),
}
