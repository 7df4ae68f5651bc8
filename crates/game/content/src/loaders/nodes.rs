//! Stat and resource node loader.

use std::collections::BTreeSet;
use std::path::Path;

use idle_core::NodeDefinition;
use serde::{Deserialize, Serialize};

use crate::loaders::{LoadResult, read_file};

/// Stat and resource nodes for RON files.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct NodeCatalog {
    pub stats: Vec<NodeDefinition>,
    pub resources: Vec<NodeDefinition>,
}

/// Loader for node definitions.
pub struct NodeLoader;

impl NodeLoader {
    pub fn load(path: &Path) -> LoadResult<NodeCatalog> {
        let content = read_file(path)?;
        Self::parse(&content)
    }

    /// Parses and checks that ids are unique across stats and resources,
    /// since both kinds share one resolution graph.
    pub fn parse(content: &str) -> LoadResult<NodeCatalog> {
        let catalog: NodeCatalog = ron::from_str(content)
            .map_err(|e| anyhow::anyhow!("Failed to parse node RON: {}", e))?;

        let mut seen = BTreeSet::new();
        for node in catalog.stats.iter().chain(&catalog.resources) {
            if !seen.insert(node.id.as_str()) {
                anyhow::bail!("Duplicate node id: {}", node.id);
            }
        }
        Ok(catalog)
    }
}
