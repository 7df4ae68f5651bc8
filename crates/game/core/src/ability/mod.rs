//! Ability effect modules.
//!
//! - **Auras**: toggled, multiplicative modifiers on work cost and duration
//! - **Buffs**: used, stacking, timed contributions to stats, resource maxima
//!   and mana regeneration

pub mod aura;
pub mod buff;

pub use aura::{ActiveAuras, AuraMultipliers, aura_multipliers};
pub use buff::{ActiveBuff, ActiveBuffs, BuffModifiers, Millis, buff_modifiers};
