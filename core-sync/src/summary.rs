//! Reconciliation run summaries

use serde::{Deserialize, Serialize};

/// Result of a completed full rebuild.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RebuildSummary {
    /// File entries now stored.
    pub indexed: i64,
    /// Folder entries now stored.
    pub folders: i64,
}

/// Result of a completed delta refresh.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RefreshSummary {
    /// Entries written that had no prior row (files and folders).
    pub added: i64,
    /// Entries rewritten because their remote state differed.
    pub updated: i64,
    /// Entries deleted because they were not observed remotely.
    pub removed: i64,
    /// Resulting total file entries.
    pub files: i64,
    /// Resulting total folder entries.
    pub folders: i64,
}
