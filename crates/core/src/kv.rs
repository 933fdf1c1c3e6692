//! Key-value persistence substrate
//!
//! Everything the repository stores goes through [`PersistentKv`] as UTF-8
//! strings keyed by name. Two backends ship with the crate: an in-process map
//! (used by tests and embedders) and an embedded sled database (used by the CLI).

use crate::{Result, StoreError};
use ahash::AHashMap;
use parking_lot::RwLock;
use serde::de::DeserializeOwned;
use serde::Serialize;
use sled::Db;
use std::path::Path;

/// String-valued blob storage keyed by string
pub trait PersistentKv: Send + Sync {
    /// Read the value stored under `key`
    fn get(&self, key: &str) -> Result<Option<String>>;

    /// Replace the value stored under `key`
    fn set(&self, key: &str, value: &str) -> Result<()>;

    /// Remove `key`; removing an absent key is not an error
    fn delete(&self, key: &str) -> Result<()>;

    /// Check whether `key` holds a value
    fn has(&self, key: &str) -> Result<bool> {
        Ok(self.get(key)?.is_some())
    }
}

/// Read and decode a JSON record
pub fn load_json<T: DeserializeOwned>(kv: &dyn PersistentKv, key: &str) -> Result<Option<T>> {
    match kv.get(key)? {
        Some(raw) => Ok(Some(serde_json::from_str(&raw)?)),
        None => Ok(None),
    }
}

/// Encode and write a JSON record
pub fn store_json<T: Serialize + ?Sized>(kv: &dyn PersistentKv, key: &str, value: &T) -> Result<()> {
    let raw = serde_json::to_string(value)?;
    kv.set(key, &raw)
}

/// In-process key-value store
///
/// An optional byte quota (keys plus values) models the capacity limits of
/// browser-style storage: a write that would exceed it fails and leaves the
/// previous value in place.
#[derive(Default)]
pub struct MemoryKv {
    entries: RwLock<AHashMap<String, String>>,
    quota: Option<usize>,
}

impl MemoryKv {
    /// Create an unbounded store
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store that rejects writes beyond `quota` bytes
    pub fn with_quota(quota: usize) -> Self {
        Self {
            entries: RwLock::new(AHashMap::new()),
            quota: Some(quota),
        }
    }

    /// Bytes currently used (keys plus values)
    pub fn used_bytes(&self) -> usize {
        self.entries
            .read()
            .iter()
            .map(|(k, v)| k.len() + v.len())
            .sum()
    }
}

impl PersistentKv for MemoryKv {
    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.entries.read().get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        let mut entries = self.entries.write();

        if let Some(limit) = self.quota {
            let current: usize = entries
                .iter()
                .filter(|(k, _)| k.as_str() != key)
                .map(|(k, v)| k.len() + v.len())
                .sum();
            let requested = key.len() + value.len();
            if current + requested > limit {
                return Err(StoreError::QuotaExceeded {
                    key: key.to_string(),
                    requested,
                    limit,
                });
            }
        }

        entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn delete(&self, key: &str) -> Result<()> {
        self.entries.write().remove(key);
        Ok(())
    }
}

/// Key-value store backed by an embedded sled database
pub struct SledKv {
    db: Db,
}

impl SledKv {
    /// Open or create the database inside `dir`
    pub fn open(dir: &Path) -> Result<Self> {
        let db = sled::open(dir.join("store.db"))?;
        Ok(Self { db })
    }
}

impl PersistentKv for SledKv {
    fn get(&self, key: &str) -> Result<Option<String>> {
        match self.db.get(key.as_bytes())? {
            Some(value) => Ok(Some(String::from_utf8(value.to_vec())?)),
            None => Ok(None),
        }
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        self.db.insert(key.as_bytes(), value.as_bytes())?;

        // Flush to ensure durability
        self.db.flush()?;
        Ok(())
    }

    fn delete(&self, key: &str) -> Result<()> {
        self.db.remove(key.as_bytes())?;
        self.db.flush()?;
        Ok(())
    }

    fn has(&self, key: &str) -> Result<bool> {
        Ok(self.db.contains_key(key.as_bytes())?)
    }
}
