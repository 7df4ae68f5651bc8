//! Content loaders for reading game data from files.
//!
//! Each loader turns one RON/TOML file into `idle-core` definition types;
//! [`ContentFactory`] assembles them into a [`idle_core::ContentTables`].

pub mod abilities;
pub mod character;
pub mod config;
pub mod factory;
pub mod item;
pub mod nodes;
pub mod tables;

pub use abilities::AbilityLoader;
pub use character::{CharacterCatalog, CharacterLoader};
pub use config::ConfigLoader;
pub use factory::ContentFactory;
pub use item::ItemLoader;
pub use nodes::{NodeCatalog, NodeLoader};
pub use tables::TablesLoader;

use std::path::Path;

/// Common result type for loaders.
pub type LoadResult<T> = anyhow::Result<T>;

/// Helper function to read file contents.
pub(crate) fn read_file(path: &Path) -> LoadResult<String> {
    std::fs::read_to_string(path)
        .map_err(|e| anyhow::anyhow!("Failed to read file {}: {}", path.display(), e))
}
