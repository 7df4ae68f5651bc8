//! Deterministic simulation core for an idle RPG character.
//!
//! `idle-core` resolves derived attributes (stats, resource maxima, ability
//! and equipment bonuses) from read-only content, and owns the inventory and
//! equipment rules. Everything here is a pure function of its inputs or a
//! command on an owned state value; there is no I/O and no global state.
//! Content is injected through the oracle traits in [`env`].
pub mod ability;
pub mod config;
pub mod effect;
pub mod env;
pub mod error;
pub mod inventory;
pub mod stats;

pub use ability::{
    ActiveAuras, ActiveBuff, ActiveBuffs, AuraMultipliers, BuffModifiers, Millis,
    aura_multipliers, buff_modifiers,
};
pub use config::GameConfig;
pub use effect::{ItemEffectOutcome, apply_item_effects};
pub use env::{
    AbilityDefinition, AbilityKind, AbilityOracle, BuffSpec, CharacterOracle, ContentOracle,
    ContentTables, ItemDefinition, ItemEffect, ItemOracle, NodeDefinition, NodeOracle,
    PerkDefinition, SlotRules,
};
pub use error::{ErrorSeverity, GameError};
pub use inventory::{
    BagInstanceId, ContainerId, DragState, DropOutcome, EquippedItem, InstanceIdSource,
    InventoryEnv, InventoryError, InventorySlot, InventoryState, Location, MoveOutcome,
    SlotArray, SlotRef,
};
pub use stats::{
    AttributeSheet, AvatarSelection, Contributions, ResourceError, ResourceState, ValueMap,
    compute_sheet, resolve,
};
