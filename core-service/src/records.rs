//! Wire-shaped records returned to the UI/API layer.
//!
//! Field names are camelCase and absent timestamps serialize as `null`
//! rather than being omitted, so consumers get a stable shape.

use core_index::{IndexEntry, ScanState};
use serde::{Deserialize, Serialize};

/// One index entry as surfaced to callers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EntryRecord {
    pub key: String,
    pub name: String,
    pub extension: Option<String>,
    /// Plain nonnegative byte count; 0 for folders.
    pub size: i64,
    /// Remote modification timestamp, `null` when the store reported none.
    pub last_modified: Option<String>,
    pub checksum_tag: Option<String>,
    /// `"file"` or `"folder"`.
    pub kind: String,
    /// Local unix-millis of the last index write to this entry.
    pub updated_at: i64,
}

impl From<IndexEntry> for EntryRecord {
    fn from(entry: IndexEntry) -> Self {
        Self {
            key: entry.key,
            name: entry.name,
            extension: entry.extension,
            size: entry.size.max(0),
            last_modified: entry.last_modified,
            checksum_tag: entry.checksum_tag,
            kind: entry.kind.as_str().to_string(),
            updated_at: entry.updated_at,
        }
    }
}

/// Index freshness summary for status displays.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IndexStatus {
    /// Number of remote objects (file entries) currently indexed.
    pub object_count: i64,
    /// Unix-millis of the last completed full rebuild, `null` if never run.
    pub last_full_scan: Option<i64>,
    /// Unix-millis of the last completed delta refresh, `null` if never run.
    pub last_delta_scan: Option<i64>,
}

impl IndexStatus {
    pub(crate) fn new(object_count: i64, state: ScanState) -> Self {
        Self {
            object_count,
            last_full_scan: state.last_full_scan,
            last_delta_scan: state.last_delta_scan,
        }
    }
}

/// Parameters for `search_indexed_objects`. All fields are optional;
/// missing values take the documented defaults.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SearchParams {
    pub search: Option<String>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

/// One page of search results plus the unpaginated match count.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchResponse {
    pub items: Vec<EntryRecord>,
    pub total: i64,
}
