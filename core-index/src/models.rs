//! Domain models for the object index
//!
//! One entry per remote object or synthesized folder, plus the singleton
//! scan-state record tracking when the index was last reconciled.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use std::fmt;

use crate::keypath;

/// Whether an index entry is a real remote object or a folder
/// synthesized from the key namespace.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum EntryKind {
    File,
    Folder,
}

impl EntryKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            EntryKind::File => "file",
            EntryKind::Folder => "folder",
        }
    }
}

impl fmt::Display for EntryKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One row of the index: a mirrored remote object or a synthesized folder.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct IndexEntry {
    /// Full remote key; folder keys always end with `/`. Primary key.
    pub key: String,

    /// Display name, the last path segment.
    pub name: String,

    /// Lowercase extension for files, `None` for folders and
    /// extension-less keys.
    pub extension: Option<String>,

    /// Byte size; always 0 for folders.
    pub size: i64,

    /// Remote-reported modification timestamp, verbatim.
    pub last_modified: Option<String>,

    /// Opaque remote integrity tag.
    pub checksum_tag: Option<String>,

    /// File or folder.
    pub kind: EntryKind,

    /// Local unix-millis timestamp of the last write to this row.
    pub updated_at: i64,
}

impl IndexEntry {
    /// Build a file entry from remote object metadata. Name and
    /// extension are derived from the key; `updated_at` is stamped by
    /// the repository on write.
    pub fn file(
        key: impl Into<String>,
        size: i64,
        last_modified: Option<String>,
        checksum_tag: Option<String>,
    ) -> Self {
        let key = key.into();
        Self {
            name: keypath::display_name(&key),
            extension: keypath::extension(&key),
            size: size.max(0),
            last_modified: last_modified.filter(|ts| !ts.is_empty()),
            checksum_tag,
            kind: EntryKind::File,
            updated_at: 0,
            key,
        }
    }

    /// Build a synthesized folder entry. Folders carry no size,
    /// timestamp, or checksum.
    pub fn folder(key: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            name: name.into(),
            extension: None,
            size: 0,
            last_modified: None,
            checksum_tag: None,
            kind: EntryKind::Folder,
            updated_at: 0,
        }
    }
}

/// Singleton record tracking reconciliation history. Both fields are
/// unix-millis timestamps, absent until the corresponding scan kind has
/// completed at least once.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScanState {
    pub last_full_scan: Option<i64>,
    pub last_delta_scan: Option<i64>,
}
