//! Journal error taxonomy

use tally_core::StoreError;

/// Errors surfaced by journal operations
///
/// `NotFound` is kept apart from `Persistence` so callers can tell
/// "no such commit" from "storage unavailable".
#[derive(Debug, thiserror::Error)]
pub enum JournalError {
    #[error(transparent)]
    Persistence(#[from] StoreError),

    #[error("commit not found: {0}")]
    NotFound(String),

    #[error("ambiguous commit reference '{reference}': matches {matches} commits")]
    Ambiguous { reference: String, matches: usize },

    #[error("malformed repository document: {0}")]
    MalformedDocument(String),
}

impl JournalError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, JournalError::NotFound(_))
    }
}
