//! Data-driven content loaders.
//!
//! This crate reads the Content Registry from RON/TOML data files:
//! - Stat and resource nodes (RON)
//! - Races, origins, factions and perks (RON)
//! - Item catalog (RON)
//! - Abilities (RON)
//! - Equipment slot rules (TOML)
//! - Game configuration (TOML)
//!
//! Content is loaded once into an immutable [`idle_core::ContentTables`] and
//! never appears in save data.

#[cfg(feature = "loaders")]
pub mod loaders;

#[cfg(feature = "loaders")]
pub use loaders::{
    AbilityLoader, CharacterCatalog, CharacterLoader, ConfigLoader, ContentFactory, ItemLoader,
    LoadResult, NodeCatalog, NodeLoader, TablesLoader,
};
