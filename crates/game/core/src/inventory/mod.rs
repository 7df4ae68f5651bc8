//! Inventory and equipment.
//!
//! # Architecture
//!
//! ```text
//! InventoryState
//! ├── base: SlotArray                       fixed size, from GameConfig
//! ├── bags: BagInstanceId → SlotArray       one per bag instance
//! └── equipped: slot id → EquippedItem      "bag" slot = the open bag
//! ```
//!
//! Commands live on [`InventoryState`]; slot compatibility and target
//! resolution are free functions in [`equipment`]; containment traversal is in
//! [`bag`]; [`DragState`] maps drag/drop gestures onto commands.

pub mod bag;
pub mod drag;
pub mod equipment;
mod error;
mod manager;
mod slots;

pub use bag::{BagSlots, InstanceIdSource, SequentialInstanceIds};
pub use drag::{DragSession, DragState, DropOutcome};
pub use equipment::{declared_slot, is_compatible, resolve_equip_target, sibling_slot};
pub use error::InventoryError;
pub use manager::{InventoryEnv, InventoryState, MoveOutcome};
pub use slots::{
    BagInstanceId, ContainerId, EquippedItem, EquippedItems, InventorySlot, Location, SlotArray,
    SlotRef,
};
