//! The working dataset

use crate::kv::{load_json, store_json, PersistentKv};
use crate::model::Dataset;
use crate::{keys, Result};
use chrono::Utc;
use std::sync::Arc;
use tracing::warn;

/// Holds the single live dataset
#[derive(Clone)]
pub struct DatasetStore {
    kv: Arc<dyn PersistentKv>,
}

impl DatasetStore {
    pub fn new(kv: Arc<dyn PersistentKv>) -> Self {
        Self { kv }
    }

    /// Current dataset, or an empty one when absent or unreadable
    pub fn read(&self) -> Dataset {
        match self.try_read() {
            Ok(Some(dataset)) => dataset,
            Ok(None) => Dataset::default(),
            Err(e) => {
                warn!("Failed to read dataset, using empty dataset: {}", e);
                Dataset::default()
            }
        }
    }

    /// Current dataset with read failures reported
    pub fn try_read(&self) -> Result<Option<Dataset>> {
        load_json(self.kv.as_ref(), keys::DATASET)
    }

    /// Stamp `lastModified` and `branch`, persist, and return what was stored
    pub fn write(&self, mut dataset: Dataset, branch: &str) -> Result<Dataset> {
        dataset.last_modified = Some(Utc::now());
        dataset.branch = Some(branch.to_string());
        store_json(self.kv.as_ref(), keys::DATASET, &dataset)?;
        Ok(dataset)
    }

    /// Size of the stored dataset encoding in bytes
    pub fn stored_size(&self) -> Result<usize> {
        Ok(self.kv.get(keys::DATASET)?.map(|raw| raw.len()).unwrap_or(0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Item;
    use crate::{MemoryKv, StoreError};
    use serde_json::json;

    #[test]
    fn test_read_empty_default() {
        let store = DatasetStore::new(Arc::new(MemoryKv::new()));
        let dataset = store.read();
        assert!(dataset.inventory.is_empty());
        assert!(dataset.images.is_empty());
        assert_eq!(store.stored_size().unwrap(), 0);
    }

    #[test]
    fn test_write_stamps_metadata() {
        let store = DatasetStore::new(Arc::new(MemoryKv::new()));
        let before = Utc::now();

        let mut dataset = Dataset::default();
        dataset.inventory.push(Item::new(1).with("qty", 5));
        let stored = store.write(dataset, "main").unwrap();

        assert_eq!(stored.branch.as_deref(), Some("main"));
        assert!(stored.last_modified.unwrap() >= before);

        let read_back = store.read();
        assert_eq!(read_back, stored);
        assert_eq!(read_back.inventory[0].fields["qty"], json!(5));
        assert!(store.stored_size().unwrap() > 0);
    }

    #[test]
    fn test_corrupt_dataset_reads_as_empty() {
        let kv = Arc::new(MemoryKv::new());
        kv.set(keys::DATASET, "[1, 2").unwrap();
        let store = DatasetStore::new(kv);

        assert!(store.try_read().is_err());
        assert!(store.read().inventory.is_empty());
    }

    #[test]
    fn test_write_failure_is_reported() {
        let store = DatasetStore::new(Arc::new(MemoryKv::with_quota(8)));
        let dataset = Dataset::new(vec![Item::new(1)], Default::default());
        let err = store.write(dataset, "main").unwrap_err();
        assert!(matches!(err, StoreError::QuotaExceeded { .. }));
    }
}
