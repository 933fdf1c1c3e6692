//! Whole-repository export and import
//!
//! Document layout:
//! ```text
//! {
//!   "config":     { "repository": {...}, "user": {...}, "sync": {...} },
//!   "data":       { "inventory": [...], "images": {...}, "lastModified": ..., "branch": ... },
//!   "commits":    [ { "id", "message", "author", "timestamp", "branch", "parent", "data" }, ... ],
//!   "exportedAt": "...",
//!   "version":    "1.0.0"
//! }
//! ```
//! Every top-level field is optional on import; only the ones present are applied.

use crate::commit::Commit;
use crate::repository::Repository;
use crate::{JournalError, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tally_core::{Dataset, RepositoryConfig, SCHEMA_VERSION};
use tracing::{info, warn};

/// Transportable repository document
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RepositoryDocument {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub config: Option<RepositoryConfig>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<Dataset>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub commits: Option<Vec<Commit>>,
    #[serde(default)]
    pub exported_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub version: Option<String>,
}

/// What an import changed
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ImportReport {
    pub config: bool,
    pub data: bool,
    /// Number of commits written, if the log was replaced
    pub commits: Option<usize>,
}

impl Repository {
    /// Capture config, working dataset and commit log in one document
    ///
    /// An unreadable working dataset is exported as empty.
    pub fn export_document(&self) -> Result<RepositoryDocument> {
        Ok(RepositoryDocument {
            config: self.config().get()?,
            data: Some(self.datasets().read()),
            commits: Some(self.log().list()?),
            exported_at: Some(Utc::now()),
            version: Some(SCHEMA_VERSION.to_string()),
        })
    }

    /// Export the repository as pretty-printed JSON
    pub fn export(&self) -> Result<String> {
        let document = self.export_document()?;
        let json = serde_json::to_string_pretty(&document).map_err(tally_core::StoreError::from)?;
        info!(
            "Exported repository ({} commits, {} bytes)",
            document.commits.as_ref().map_or(0, Vec::len),
            json.len()
        );
        Ok(json)
    }

    /// Parse and apply an exported document
    ///
    /// A document that does not parse changes nothing. Otherwise config, then
    /// data (saved without committing), then commits (replacing the log) are
    /// applied, each only if present.
    pub fn import(&self, document: &str) -> Result<ImportReport> {
        let document: RepositoryDocument = serde_json::from_str(document).map_err(|e| {
            warn!("Rejected repository document: {}", e);
            JournalError::MalformedDocument(e.to_string())
        })?;
        self.import_document(document)
    }

    /// Apply an already parsed document
    ///
    /// A config with out-of-range values is rejected before anything is written.
    pub fn import_document(&self, document: RepositoryDocument) -> Result<ImportReport> {
        if let Some(config) = &document.config {
            config.validate().map_err(|e| {
                warn!("Rejected repository document: {}", e);
                JournalError::MalformedDocument(e.to_string())
            })?;
        }

        if let Some(version) = document.version.as_deref() {
            if version != SCHEMA_VERSION {
                warn!("Importing document with schema version {} (expected {})", version, SCHEMA_VERSION);
            }
        }

        let mut report = ImportReport::default();

        if let Some(config) = &document.config {
            self.config().set(config)?;
            report.config = true;
        }

        if let Some(data) = document.data {
            self.save(data, false)?;
            report.data = true;
        }

        if let Some(commits) = &document.commits {
            self.log().replace(commits)?;
            report.commits = Some(commits.len());
        }

        info!(
            "Imported repository (config: {}, data: {}, commits: {:?})",
            report.config, report.data, report.commits
        );
        Ok(report)
    }
}
