//! Commit data structures

use crate::snapshot::Snapshot;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use ulid::Ulid;

/// Opaque commit identifier
///
/// New IDs are ULIDs (millisecond timestamp + 80 random bits), so they sort
/// by creation time and collide only with negligible probability. Imported
/// logs may carry IDs in any other format; nothing beyond string equality is
/// assumed.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CommitId(String);

impl CommitId {
    /// Generate a fresh ID
    pub fn generate() -> Self {
        Self(Ulid::new().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// First eight characters, for display
    pub fn short(&self) -> &str {
        match self.0.char_indices().nth(8) {
            Some((idx, _)) => &self.0[..idx],
            None => &self.0,
        }
    }
}

impl fmt::Display for CommitId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for CommitId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl From<String> for CommitId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

/// A commit records the dataset at a point in time
///
/// Commits are never modified after creation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Commit {
    /// Unique ID
    pub id: CommitId,
    /// Human-readable message
    pub message: String,
    /// Author tag ("auto", "system", a user name, ...)
    pub author: String,
    /// Creation time
    pub timestamp: DateTime<Utc>,
    /// Branch active at creation (metadata only)
    pub branch: String,
    /// Head of the log when this commit was created; `None` only for the first
    #[serde(default)]
    pub parent: Option<CommitId>,
    /// Compressed dataset
    pub data: Snapshot,
}

impl Commit {
    /// Create a new commit stamped with a fresh ID and the current time
    pub fn new(
        message: impl Into<String>,
        author: impl Into<String>,
        branch: impl Into<String>,
        parent: Option<CommitId>,
        data: Snapshot,
    ) -> Self {
        Self {
            id: CommitId::generate(),
            message: message.into(),
            author: author.into(),
            timestamp: Utc::now(),
            branch: branch.into(),
            parent,
            data,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_generated_ids_are_unique() {
        let ids: HashSet<CommitId> = (0..1000).map(|_| CommitId::generate()).collect();
        assert_eq!(ids.len(), 1000);
    }

    #[test]
    fn test_short_id() {
        let id = CommitId::from("01HN8XYZABCDEFG");
        assert_eq!(id.short(), "01HN8XYZ");

        // Imported IDs may be shorter than the display width
        assert_eq!(CommitId::from("abc").short(), "abc");
        // and must not be cut inside a multi-byte character
        assert_eq!(CommitId::from("ééééééééé").short(), "éééééééé");
    }

    #[test]
    fn test_commit_wire_format() {
        let commit = Commit::new("init", "system", "main", None, Snapshot::default());
        let value = serde_json::to_value(&commit).unwrap();

        assert_eq!(value["parent"], serde_json::Value::Null);
        assert_eq!(value["id"], serde_json::json!(commit.id.as_str()));
        assert!(value["data"]["summary"].is_object());

        let decoded: Commit = serde_json::from_value(value).unwrap();
        assert_eq!(decoded, commit);
    }
}
