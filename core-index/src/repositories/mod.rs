//! Repository traits and SQLite implementations for the object index.
//!
//! All index reads and writes go through these repositories; the
//! reconciliation engine is the only writer of entries, while the query
//! layer reads concurrently against whatever rows currently exist.

pub mod entry;
pub mod scan_state;

pub use entry::{EntryRepository, SqliteEntryRepository};
pub use scan_state::{ScanStatePatch, ScanStateRepository, SqliteScanStateRepository};

/// Current local time in unix milliseconds, used to stamp row writes.
pub(crate) fn now_millis() -> i64 {
    chrono::Utc::now().timestamp_millis()
}
