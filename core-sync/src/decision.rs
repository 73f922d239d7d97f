//! Per-entry change decisions
//!
//! The "does this row need a write" comparison is a pure predicate over
//! the stored entry and the incoming remote descriptor, kept separate
//! from the scan loop and the store so it can be tested on its own.
//!
//! Equality is compound: kind, size, modification time, and checksum tag
//! must all agree. A simple timestamp check is not enough, because some
//! stores rewrite objects without touching the reported time and others
//! report times with inconsistent timezone suffixes.

use core_index::{EntryKind, IndexEntry};
use store_traits::ObjectDescriptor;

/// Outcome of comparing an incoming remote record against index state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryDecision {
    /// Stored entry matches exactly; no write, no `updated_at` bump.
    Unchanged,
    /// No stored entry under this key.
    Added,
    /// Stored entry exists but differs.
    Updated,
}

/// Convert a remote object size to the signed column type. Missing
/// sizes count as zero; sizes beyond `i64::MAX` saturate instead of
/// wrapping negative.
pub(crate) fn stored_size(size: Option<u64>) -> i64 {
    size.map_or(0, |s| i64::try_from(s).unwrap_or(i64::MAX))
}

/// Normalize a remote modification timestamp for comparison.
///
/// Absent and empty strings are equivalent, and trailing timezone
/// markers (`Z`, `+00:00`) are stripped so the same instant written in
/// either form does not trigger spurious updates.
pub fn normalize_timestamp(ts: Option<&str>) -> Option<&str> {
    let ts = ts?.trim();
    if ts.is_empty() {
        return None;
    }
    Some(
        ts.strip_suffix("+00:00")
            .or_else(|| ts.strip_suffix('Z'))
            .unwrap_or(ts),
    )
}

/// Decide whether a remote object requires a write to its file entry.
///
/// Missing remote size counts as zero and missing timestamp/checksum as
/// absent; incomplete descriptors are tolerated, never rejected.
pub fn decide_file(existing: Option<&IndexEntry>, incoming: &ObjectDescriptor) -> EntryDecision {
    let Some(existing) = existing else {
        return EntryDecision::Added;
    };

    let incoming_size = stored_size(incoming.size);
    let same = existing.kind == EntryKind::File
        && existing.size == incoming_size
        && normalize_timestamp(existing.last_modified.as_deref())
            == normalize_timestamp(incoming.last_modified.as_deref())
        && existing.checksum_tag.as_deref().unwrap_or("")
            == incoming.checksum_tag.as_deref().unwrap_or("");

    if same {
        EntryDecision::Unchanged
    } else {
        EntryDecision::Updated
    }
}

/// Decide whether a synthesized ancestor folder requires a write.
///
/// A correct folder row is folder-kind, zero-sized, and carries no
/// modification time; anything else (including a file squatting on the
/// folder key) is rewritten.
pub fn decide_folder(existing: Option<&IndexEntry>) -> EntryDecision {
    match existing {
        None => EntryDecision::Added,
        Some(entry)
            if entry.kind == EntryKind::Folder
                && entry.size == 0
                && entry.last_modified.is_none() =>
        {
            EntryDecision::Unchanged
        }
        Some(_) => EntryDecision::Updated,
    }
}
