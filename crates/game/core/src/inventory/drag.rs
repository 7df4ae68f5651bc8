//! Transient drag state.
//!
//! A drag captures what was picked up and where from. Dropping always ends
//! the drag, whether the inventory command succeeds or not, so the cursor can
//! never get stuck holding an item.

use super::{
    BagInstanceId, InstanceIdSource, InventoryEnv, InventoryError, InventoryState, Location,
    MoveOutcome, SlotRef,
};

/// What is being dragged.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DragSession {
    pub source: Location,
    pub item_id: String,
    pub instance_id: Option<BagInstanceId>,
}

impl DragSession {
    fn capture(inventory: &InventoryState, source: Location) -> Result<Self, InventoryError> {
        let (item_id, instance_id) = match &source {
            Location::Inventory(at) => {
                let slot = inventory.slot(at)?.ok_or(InventoryError::EmptySlot)?;
                (slot.id.clone(), slot.instance_id.clone())
            }
            Location::Equipped(slot) => {
                let item =
                    inventory
                        .equipped_in(slot)
                        .ok_or_else(|| InventoryError::SlotNotEquipped {
                            slot: slot.clone(),
                        })?;
                (item.id.clone(), item.instance_id.clone())
            }
        };
        Ok(Self {
            source,
            item_id,
            instance_id,
        })
    }

    /// True if the source still holds the captured item.
    fn is_current(&self, inventory: &InventoryState) -> bool {
        let (id, instance) = match &self.source {
            Location::Inventory(at) => match inventory.slot(at) {
                Ok(Some(slot)) => (&slot.id, &slot.instance_id),
                _ => return false,
            },
            Location::Equipped(slot) => match inventory.equipped_in(slot) {
                Some(item) => (&item.id, &item.instance_id),
                None => return false,
            },
        };
        *id == self.item_id && *instance == self.instance_id
    }
}

/// What a completed drop did.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum DropOutcome {
    Moved(MoveOutcome),
    Equipped { slot: String },
    Unequipped { to: SlotRef },
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct DragState {
    session: Option<DragSession>,
}

impl DragState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn session(&self) -> Option<&DragSession> {
        self.session.as_ref()
    }

    pub fn is_dragging(&self) -> bool {
        self.session.is_some()
    }

    /// Picks up the item at `source`, replacing any previous drag.
    pub fn begin(
        &mut self,
        inventory: &InventoryState,
        source: Location,
    ) -> Result<&DragSession, InventoryError> {
        self.session = None;
        let session = DragSession::capture(inventory, source)?;
        Ok(self.session.insert(session))
    }

    pub fn cancel(&mut self) -> Option<DragSession> {
        self.session.take()
    }

    /// Drops the dragged item on `target`. The drag is over afterwards.
    ///
    /// | source    | target    | command                           |
    /// |-----------|-----------|-----------------------------------|
    /// | inventory | inventory | [`InventoryState::move_item`]     |
    /// | inventory | equipped  | [`InventoryState::equip`]         |
    /// | equipped  | inventory | [`InventoryState::unequip`]       |
    /// | equipped  | equipped  | [`InventoryState::move_equipped`] |
    pub fn drop_on(
        &mut self,
        inventory: &mut InventoryState,
        env: &InventoryEnv<'_>,
        ids: &mut dyn InstanceIdSource,
        target: &Location,
    ) -> Result<DropOutcome, InventoryError> {
        let session = self.session.take().ok_or(InventoryError::NoActiveDrag)?;
        if !session.is_current(inventory) {
            return Err(InventoryError::StaleDrag);
        }

        match (&session.source, target) {
            (Location::Inventory(from), Location::Inventory(to)) => {
                inventory.move_item(env, from, to).map(DropOutcome::Moved)
            }
            (Location::Inventory(from), Location::Equipped(slot)) => inventory
                .equip(env, ids, from, Some(slot))
                .map(|slot| DropOutcome::Equipped { slot }),
            (Location::Equipped(slot), Location::Inventory(to)) => inventory
                .unequip(slot, Some(to))
                .map(|to| DropOutcome::Unequipped { to }),
            (Location::Equipped(from), Location::Equipped(to)) => {
                inventory.move_equipped(env, from, to).map(DropOutcome::Moved)
            }
        }
    }
}
