use nest_map::NestedMap;
use tracing::{debug, info};

use crate::config::SourceConfig;
use crate::directory::DirectoryStore;
use crate::error::SourceResult;
use crate::file::FileStore;
use crate::location::{Location, Source};
use crate::traits::TreeStore;

/// Loads and saves trees at any [`Source`], picking the backend from the
/// location kind.
#[derive(Clone, Debug, Default)]
pub struct SourceAdapter {
    config: SourceConfig,
}

impl SourceAdapter {
    pub fn new(config: SourceConfig) -> Self {
        Self { config }
    }

    /// The backend serving `location`.
    pub fn store(&self, location: &Location) -> Box<dyn TreeStore> {
        match location {
            Location::File(path) => Box::new(FileStore::new(path, self.config.file_format)),
            Location::Directory(path) => {
                Box::new(DirectoryStore::new(path, self.config.layout.clone()))
            }
        }
    }

    /// Read the tree stored at `source`.
    pub fn load(&self, source: &Source) -> SourceResult<NestedMap> {
        let tree = self
            .store(&source.location)
            .load(source.credential.as_ref())?;
        debug!(source = %source.location, leaves = tree.leaf_count(), "loaded");
        Ok(tree)
    }

    /// Replace whatever is stored at `source` with `tree`.
    pub fn save(&self, tree: &NestedMap, source: &Source) -> SourceResult<()> {
        self.store(&source.location)
            .save(tree, source.credential.as_ref())?;
        info!(
            source = %source.location,
            leaves = tree.leaf_count(),
            sealed = source.is_encrypted(),
            "saved"
        );
        Ok(())
    }
}
