//! Tally Core - persistence primitives for the tally dataset repository
//!
//! This crate provides the foundational storage layer:
//! - The `PersistentKv` contract with in-memory and sled backends
//! - The dataset and repository configuration data model
//! - `ConfigStore` and `DatasetStore` over a shared key-value handle

pub mod config;
pub mod dataset;
pub mod error;
pub mod kv;
pub mod model;

// Re-export main types for convenience
pub use config::ConfigStore;
pub use dataset::DatasetStore;
pub use error::StoreError;
pub use kv::{MemoryKv, PersistentKv, SledKv};
pub use model::{
    Dataset, ImageMap, Item, RepositoryConfig, RepositoryInfo, SyncPolicy, UserIdentity,
    DEFAULT_BRANCH, SCHEMA_VERSION,
};

/// Keys under which records live in the key-value store
pub mod keys {
    /// Repository configuration record
    pub const CONFIG: &str = "tally/config";
    /// The working dataset
    pub const DATASET: &str = "tally/dataset";
    /// The commit log, most recent first
    pub const COMMITS: &str = "tally/commits";
}

/// Common result type used throughout tally-core
pub type Result<T> = std::result::Result<T, StoreError>;
