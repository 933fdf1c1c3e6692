//! Commit journal and version engine
//!
//! This crate provides:
//! - Commit data structures (ULID-based IDs)
//! - Snapshot compression for storage inside commits
//! - The capacity-bounded commit log with checkout
//! - Retention sweeps
//! - Snapshot diffing
//! - Whole-repository export/import

pub mod commit;
pub mod diff;
pub mod error;
pub mod log;
pub mod repository;
pub mod retention;
pub mod snapshot;
pub mod transfer;

// Re-exports
pub use commit::{Commit, CommitId};
pub use diff::{diff_arrays, diff_maps, ArrayDiff, CommitDiff, Identified, MapDiff};
pub use error::JournalError;
pub use log::CommitLog;
pub use repository::{Repository, RepositoryStatus};
pub use retention::RetentionPolicy;
pub use snapshot::{compress, decompress, Snapshot, SnapshotSummary};
pub use transfer::{ImportReport, RepositoryDocument};

/// Author tag used for commits the system creates on its own
pub const AUTO_AUTHOR: &str = "auto";

/// Result type for journal operations
pub type Result<T> = std::result::Result<T, JournalError>;
