//! Source compendium loader.

use std::collections::HashMap;
use std::path::Path;

use rules_core::Source;
use serde::{Deserialize, Serialize};

use crate::loaders::{LoadResult, read_file};

/// Shared source definitions that character sheets can reference by id.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SourceCatalog {
    pub sources: Vec<Source>,
    #[serde(skip)]
    index: HashMap<String, usize>,
}

impl SourceCatalog {
    pub fn new(sources: Vec<Source>) -> Self {
        let mut catalog = Self {
            sources,
            index: HashMap::new(),
        };
        catalog.reindex();
        catalog
    }

    /// Look up a source by [`Source::identity`].
    pub fn get(&self, id: &str) -> Option<&Source> {
        self.index.get(id).map(|&i| &self.sources[i])
    }

    pub fn len(&self) -> usize {
        self.sources.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sources.is_empty()
    }

    /// First definition of an id wins.
    fn reindex(&mut self) {
        self.index.clear();
        for (i, source) in self.sources.iter().enumerate() {
            let id = source.identity().to_owned();
            if self.index.contains_key(&id) {
                tracing::warn!("Compendium defines source {:?} twice; keeping the first", id);
                continue;
            }
            self.index.insert(id, i);
        }
    }
}

/// Loader for source compendiums from RON files.
pub struct CatalogLoader;

impl CatalogLoader {
    /// Load a compendium from a RON file containing a `SourceCatalog`.
    pub fn load(path: &Path) -> LoadResult<SourceCatalog> {
        let content = read_file(path)?;
        Self::parse(&content)
    }

    pub fn parse(content: &str) -> LoadResult<SourceCatalog> {
        let catalog: SourceCatalog = ron::from_str(content)
            .map_err(|e| anyhow::anyhow!("Failed to parse source compendium RON: {}", e))?;
        let catalog = SourceCatalog::new(catalog.sources);
        tracing::info!("Loaded {} compendium sources", catalog.len());
        Ok(catalog)
    }
}
