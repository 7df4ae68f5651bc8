//! Session configuration structures and loaders.
use std::env;
use std::path::PathBuf;

use anyhow::Context;
use idle_content::{ConfigLoader, ContentFactory};
use idle_core::{ContentTables, GameConfig};

/// Configuration for one character session.
#[derive(Clone, Debug, PartialEq)]
pub struct RuntimeConfig {
    /// Directory holding the content tables.
    pub content_dir: PathBuf,
    /// Game configuration file overriding `config.toml` in the content directory.
    pub config_path: Option<PathBuf>,
    /// Period of one regeneration step.
    pub regen_interval_ms: u64,
    pub stamina_resource: String,
    pub mana_resource: String,
    /// Identifier used to tag log output.
    pub session_id: String,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            content_dir: PathBuf::from(Self::DEFAULT_CONTENT_DIR),
            config_path: None,
            regen_interval_ms: Self::DEFAULT_REGEN_INTERVAL_MS,
            stamina_resource: "stamina".to_string(),
            mana_resource: "mana".to_string(),
            session_id: "local".to_string(),
        }
    }
}

impl RuntimeConfig {
    pub const DEFAULT_CONTENT_DIR: &'static str = "data";
    pub const DEFAULT_REGEN_INTERVAL_MS: u64 = 1000;

    /// Reads `.env` (if present), then the process environment.
    pub fn load() -> Self {
        if let Ok(path) = dotenvy::dotenv() {
            tracing::debug!("loaded environment from {}", path.display());
        }
        Self::from_env()
    }

    /// Construct configuration from process environment variables.
    ///
    /// - `IDLE_CONTENT_DIR`
    /// - `IDLE_CONFIG_PATH`
    /// - `IDLE_REGEN_INTERVAL_MS`
    /// - `IDLE_STAMINA_RESOURCE` / `IDLE_MANA_RESOURCE`
    /// - `IDLE_SESSION_ID`
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Some(dir) = read_env::<PathBuf>("IDLE_CONTENT_DIR") {
            config.content_dir = dir;
        }

        config.config_path = read_env::<PathBuf>("IDLE_CONFIG_PATH");

        if let Some(interval) = read_env::<u64>("IDLE_REGEN_INTERVAL_MS") {
            config.regen_interval_ms = interval.max(1);
        }

        if let Some(id) = read_env::<String>("IDLE_STAMINA_RESOURCE").filter(|s| !s.is_empty()) {
            config.stamina_resource = id;
        }

        if let Some(id) = read_env::<String>("IDLE_MANA_RESOURCE").filter(|s| !s.is_empty()) {
            config.mana_resource = id;
        }

        if let Some(id) = read_env::<String>("IDLE_SESSION_ID").filter(|s| !s.is_empty()) {
            config.session_id = id;
        }

        config
    }

    pub fn with_content_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.content_dir = dir.into();
        self
    }

    pub fn with_regen_interval(mut self, interval_ms: u64) -> Self {
        self.regen_interval_ms = interval_ms.max(1);
        self
    }

    /// Loads content tables and game configuration.
    ///
    /// `config_path`, when set, replaces the content directory's `config.toml`.
    pub fn load_content(&self) -> anyhow::Result<(ContentTables, GameConfig)> {
        let factory = ContentFactory::new(&self.content_dir);
        let content = factory
            .load_content()
            .with_context(|| format!("loading content from {}", self.content_dir.display()))?;
        let game = match &self.config_path {
            Some(path) => ConfigLoader::load(path)?,
            None => factory.load_config()?,
        };
        Ok((content, game))
    }
}

fn read_env<T>(key: &str) -> Option<T>
where
    T: std::str::FromStr,
{
    env::var(key).ok()?.parse().ok()
}
