//! Inventory rule violations.

use crate::error::{ErrorSeverity, GameError};

use super::BagInstanceId;

/// Reasons an inventory or equipment command was refused.
///
/// Every variant is returned with all slot arrays and the equipped map left
/// exactly as they were.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum InventoryError {
    /// No free slot to put the item in.
    #[error("No space left in inventory")]
    NoSpace,

    /// A bag would end up inside itself, directly or transitively.
    #[error("Bag {instance} cannot be placed inside itself")]
    BagInsideItself { instance: BagInstanceId },

    /// A bag still holds a bag that has items in it.
    #[error("Bag {instance} holds a bag with items in it")]
    BagHasNestedContents { instance: BagInstanceId },

    /// Destroying the bag would lose items and that was not confirmed.
    #[error("Bag {instance} is not empty")]
    BagNotEmpty { instance: BagInstanceId },

    #[error("{item} cannot be equipped in slot {slot}")]
    IncompatibleSlot { item: String, slot: String },

    #[error("{item} has no equipment slot")]
    NoEquipSlot { item: String },

    #[error("Slot is empty")]
    EmptySlot,

    #[error("Unknown item {item}")]
    UnknownItem { item: String },

    /// Bag instance without a slot array.
    #[error("Unknown container {instance}")]
    UnknownContainer { instance: BagInstanceId },

    #[error("Slot index {index} out of range (len {len})")]
    SlotOutOfRange { index: usize, len: usize },

    #[error("Nothing equipped in slot {slot}")]
    SlotNotEquipped { slot: String },

    #[error("Quantity {requested} is not valid for a stack of {available}")]
    InvalidQuantity { requested: u32, available: u32 },

    #[error("No drag in progress")]
    NoActiveDrag,

    /// The dragged item is no longer where the drag started.
    #[error("Drag source changed since the drag began")]
    StaleDrag,
}

impl GameError for InventoryError {
    fn severity(&self) -> ErrorSeverity {
        match self {
            Self::NoSpace | Self::BagNotEmpty { .. } | Self::BagHasNestedContents { .. } => {
                ErrorSeverity::Recoverable
            }
            Self::UnknownContainer { .. } => ErrorSeverity::Internal,
            _ => ErrorSeverity::Validation,
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::NoSpace => "INVENTORY_NO_SPACE",
            Self::BagInsideItself { .. } => "INVENTORY_BAG_INSIDE_ITSELF",
            Self::BagHasNestedContents { .. } => "INVENTORY_BAG_HAS_NESTED_CONTENTS",
            Self::BagNotEmpty { .. } => "INVENTORY_BAG_NOT_EMPTY",
            Self::IncompatibleSlot { .. } => "INVENTORY_INCOMPATIBLE_SLOT",
            Self::NoEquipSlot { .. } => "INVENTORY_NO_EQUIP_SLOT",
            Self::EmptySlot => "INVENTORY_EMPTY_SLOT",
            Self::UnknownItem { .. } => "INVENTORY_UNKNOWN_ITEM",
            Self::UnknownContainer { .. } => "INVENTORY_UNKNOWN_CONTAINER",
            Self::SlotOutOfRange { .. } => "INVENTORY_SLOT_OUT_OF_RANGE",
            Self::SlotNotEquipped { .. } => "INVENTORY_SLOT_NOT_EQUIPPED",
            Self::InvalidQuantity { .. } => "INVENTORY_INVALID_QUANTITY",
            Self::NoActiveDrag => "INVENTORY_NO_ACTIVE_DRAG",
            Self::StaleDrag => "INVENTORY_STALE_DRAG",
        }
    }
}
