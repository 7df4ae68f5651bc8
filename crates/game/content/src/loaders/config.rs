//! Game configuration loader.

use std::path::Path;

use idle_core::GameConfig;

use crate::loaders::{LoadResult, read_file};

/// Loader for game configuration from TOML files.
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load config data from a TOML file.
    ///
    /// Missing keys keep their defaults.
    pub fn load(path: &Path) -> LoadResult<GameConfig> {
        let content = read_file(path)?;
        Self::parse(&content)
    }

    pub fn parse(content: &str) -> LoadResult<GameConfig> {
        let config: GameConfig = toml::from_str(content)
            .map_err(|e| anyhow::anyhow!("Failed to parse config TOML: {}", e))?;

        if config.default_max_stack == 0 {
            anyhow::bail!("defaultMaxStack must be at least 1");
        }
        if !config.regen_amount.is_finite() {
            anyhow::bail!("regenAmount must be finite");
        }
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_config_keeps_defaults() {
        let config = ConfigLoader::parse("baseInventorySlots = 12\n").unwrap();
        assert_eq!(config.base_inventory_slots, 12);
        assert_eq!(config.default_max_stack, GameConfig::DEFAULT_MAX_STACK);
        assert_eq!(config.regen_amount, GameConfig::DEFAULT_REGEN_AMOUNT);
    }

    #[test]
    fn zero_max_stack_is_rejected() {
        assert!(ConfigLoader::parse("defaultMaxStack = 0\n").is_err());
    }
}
