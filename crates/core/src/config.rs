//! Repository configuration record

use crate::kv::{load_json, store_json, PersistentKv};
use crate::model::{RepositoryConfig, DEFAULT_BRANCH};
use crate::{keys, Result};
use std::sync::Arc;
use tracing::{info, warn};

/// Reads and replaces the single `RepositoryConfig` record
#[derive(Clone)]
pub struct ConfigStore {
    kv: Arc<dyn PersistentKv>,
}

impl ConfigStore {
    pub fn new(kv: Arc<dyn PersistentKv>) -> Self {
        Self { kv }
    }

    /// Seed the default config if none exists and return the effective config
    ///
    /// Calling this on an initialized repository changes nothing.
    pub fn initialize(&self) -> Result<RepositoryConfig> {
        if let Some(existing) = self.get()? {
            return Ok(existing);
        }

        let config = RepositoryConfig::default();
        self.set(&config)?;
        info!("Initialized repository '{}' on branch {}", config.repository.name, config.repository.branch);
        Ok(config)
    }

    /// Current config, `None` before initialization
    pub fn get(&self) -> Result<Option<RepositoryConfig>> {
        load_json(self.kv.as_ref(), keys::CONFIG)
    }

    /// Replace the config wholesale
    pub fn set(&self, config: &RepositoryConfig) -> Result<()> {
        store_json(self.kv.as_ref(), keys::CONFIG, config)
    }

    /// Config to act on, falling back to defaults when missing or unreadable
    pub fn effective(&self) -> RepositoryConfig {
        match self.get() {
            Ok(Some(config)) => config,
            Ok(None) => RepositoryConfig::default(),
            Err(e) => {
                warn!("Failed to read repository config, using defaults: {}", e);
                RepositoryConfig::default()
            }
        }
    }

    /// Branch recorded on new datasets and commits
    pub fn active_branch(&self) -> String {
        match self.get() {
            Ok(Some(config)) => config.repository.branch,
            Ok(None) => DEFAULT_BRANCH.to_string(),
            Err(e) => {
                warn!("Failed to read active branch, assuming {}: {}", DEFAULT_BRANCH, e);
                DEFAULT_BRANCH.to_string()
            }
        }
    }
}
