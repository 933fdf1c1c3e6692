//! Dataset and repository configuration records
//!
//! Field names on the wire are camelCase so that documents exported by one
//! repository can be imported by another without translation.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use std::time::Duration;

/// Branch recorded on datasets and commits when nothing else is configured
pub const DEFAULT_BRANCH: &str = "main";

/// Schema version written into configs and exported documents
pub const SCHEMA_VERSION: &str = "1.0.0";

/// Image key -> opaque image payload (usually a data URL string)
pub type ImageMap = BTreeMap<String, Value>;

/// A single inventory entry
///
/// Only `id` is interpreted; every other field is carried through untouched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Item {
    /// Identity used to match items across snapshots; a missing id reads as null
    #[serde(default)]
    pub id: Value,
    /// Remaining item fields
    #[serde(flatten)]
    pub fields: Map<String, Value>,
}

impl Item {
    /// Create an item with no fields besides its id
    pub fn new(id: impl Into<Value>) -> Self {
        Self {
            id: id.into(),
            fields: Map::new(),
        }
    }

    /// Builder-style field setter
    pub fn with(mut self, key: &str, value: impl Into<Value>) -> Self {
        self.fields.insert(key.to_string(), value.into());
        self
    }

    /// Identity key as canonical JSON (`1` and `"1"` are distinct)
    pub fn identity(&self) -> String {
        self.id.to_string()
    }
}

/// The working dataset
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Dataset {
    /// Ordered inventory items
    #[serde(default)]
    pub inventory: Vec<Item>,
    /// Image payloads by key
    #[serde(default)]
    pub images: ImageMap,
    /// Stamped on every write
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_modified: Option<DateTime<Utc>>,
    /// Branch active when the dataset was written
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub branch: Option<String>,
    /// Consumer-defined fields; not captured by commits
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Dataset {
    /// Dataset holding only the given inventory and images
    pub fn new(inventory: Vec<Item>, images: ImageMap) -> Self {
        Self {
            inventory,
            images,
            ..Self::default()
        }
    }

    /// True when there is nothing worth committing
    pub fn is_empty(&self) -> bool {
        self.inventory.is_empty()
    }
}

/// Repository metadata
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RepositoryConfig {
    pub repository: RepositoryInfo,
    pub user: UserIdentity,
    pub sync: SyncPolicy,
}

/// Identity of the repository itself
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RepositoryInfo {
    pub name: String,
    pub description: String,
    pub created: DateTime<Utc>,
    /// Active branch (metadata only)
    pub branch: String,
    /// Schema version
    pub version: String,
}

/// Who is making commits
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserIdentity {
    pub name: String,
    pub email: String,
}

/// Auto-commit and retention settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SyncPolicy {
    /// Commit on every save and run the periodic auto-commit
    pub auto_commit: bool,
    /// Auto-commit period, stored as milliseconds
    #[serde(with = "duration_ms")]
    pub commit_interval: Duration,
    /// Commit log capacity
    pub max_commits: usize,
    /// Age threshold for the retention sweep
    #[serde(default = "default_retention_days")]
    pub retention_days: u32,
}

fn default_retention_days() -> u32 {
    30
}

impl Default for SyncPolicy {
    fn default() -> Self {
        Self {
            auto_commit: true,
            commit_interval: Duration::from_secs(5 * 60),
            max_commits: 100,
            retention_days: default_retention_days(),
        }
    }
}

impl Default for RepositoryConfig {
    fn default() -> Self {
        Self {
            repository: RepositoryInfo {
                name: "tally-data".to_string(),
                description: "Versioned inventory dataset".to_string(),
                created: Utc::now(),
                branch: DEFAULT_BRANCH.to_string(),
                version: SCHEMA_VERSION.to_string(),
            },
            user: UserIdentity {
                name: "Tally".to_string(),
                email: "tally@localhost".to_string(),
            },
            sync: SyncPolicy::default(),
        }
    }
}

/// Rejected configuration value
#[derive(Debug, thiserror::Error)]
#[error("invalid {field}: {reason}")]
pub struct InvalidConfig {
    pub field: &'static str,
    pub reason: String,
}

impl RepositoryConfig {
    /// Check that every value is within its supported range
    pub fn validate(&self) -> Result<(), InvalidConfig> {
        if self.repository.branch.trim().is_empty() {
            return Err(InvalidConfig {
                field: "repository.branch",
                reason: "must not be empty".to_string(),
            });
        }

        if !(1..=100_000).contains(&self.sync.max_commits) {
            return Err(InvalidConfig {
                field: "sync.max_commits",
                reason: format!("{} is outside 1-100000", self.sync.max_commits),
            });
        }

        let interval_secs = self.sync.commit_interval.as_secs();
        if !(1..=24 * 60 * 60).contains(&interval_secs) {
            return Err(InvalidConfig {
                field: "sync.commit_interval",
                reason: format!("{}s is outside 1-86400s", interval_secs),
            });
        }

        if !(1..=3650).contains(&self.sync.retention_days) {
            return Err(InvalidConfig {
                field: "sync.retention_days",
                reason: format!("{} is outside 1-3650", self.sync.retention_days),
            });
        }

        Ok(())
    }
}

mod duration_ms {
    use serde::{Deserialize, Deserializer, Serializer};
    use std::time::Duration;

    pub fn serialize<S: Serializer>(value: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u64(value.as_millis() as u64)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
        let ms = u64::deserialize(deserializer)?;
        Ok(Duration::from_millis(ms))
    }
}
