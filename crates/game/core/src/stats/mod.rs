//! Stat System - layered resolution.
//!
//! # Architecture
//!
//! ```text
//! [ Content sources (race / origin / faction / perks) ]
//!      ↓
//! [ Override Map (+ equipment, buffs) ]     aggregate
//!      ↓
//! [ Final stats ]                           resolve (pass 1)
//!      ↓
//! [ Final resource maxima ]                 resolve (pass 2)
//!      ↓
//! [ Resource runtime state ]                resources
//! ```
//!
//! ## Principles
//!
//! 1. **Pure**: resolution and aggregation are functions of their inputs
//! 2. **Wholesale**: derived values are recomputed, never patched in place
//! 3. **Bounded**: modifier propagation stops after a fixed number of passes

pub mod aggregate;
pub mod resolve;
pub mod resources;

use std::collections::BTreeMap;

/// Per-id numeric values (stat or resource id → value).
pub type ValueMap = BTreeMap<String, f64>;

pub use aggregate::{
    AttributeSheet, AvatarSelection, Contributions, LevelledChoice, ResolvedPerk, StatSummary,
    aggregate_stats, build_override_map, compute_sheet, resolve_perks, resolve_resources,
    selected_sources, unlocked_resources,
};
pub use resolve::{Resolution, resolve, resolve_detailed, resolve_with_limit};
pub use resources::{ResourceError, ResourceState, resource_max};
