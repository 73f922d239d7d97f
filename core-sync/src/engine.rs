//! # Reconciliation Engine
//!
//! Orchestrates full and delta reconciliation of the local index against
//! the remote object store.
//!
//! ## Overview
//!
//! The `ReconcileEngine` drives the lister's cursor-based pagination and
//! updates the index store through the entry repository:
//! - **Full rebuild**: clears the index and repopulates it from scratch,
//!   synthesizing folder entries from the flat key namespace.
//! - **Delta refresh**: computes adds/updates/removals against current
//!   index state, writing only rows whose remote state differs and
//!   deleting rows no longer observed.
//!
//! ## Workflow
//!
//! ### Full rebuild
//! 1. Clear the entire index store
//! 2. Enumerate every remote object under the configured prefix
//! 3. Upsert each ancestor folder once per run (in-memory dedup set)
//! 4. Upsert the file entry for each object
//! 5. Stamp both scan-state timestamps and report stored counts
//!
//! ### Delta refresh
//! 1. Enumerate without clearing, tracking every observed key
//! 2. Write folder/file rows only where the decision predicate says so
//! 3. After the enumeration completes, delete unobserved keys
//! 4. Stamp the delta-scan timestamp and report counts
//!
//! ## Failure safety
//!
//! A failed page fetch aborts the run before the deletion sweep. Upserts
//! already written remain, leaving the index in a superset state that
//! the next completed run self-corrects; a partial observed-set is never
//! allowed to delete still-valid entries.

use crate::{
    decision::{decide_file, decide_folder, stored_size, EntryDecision},
    summary::{RebuildSummary, RefreshSummary},
    Result, SyncError,
};
use core_index::{
    keypath, EntryKind, IndexEntry, ScanState, ScanStatePatch, ScanStateRepository,
    SqliteEntryRepository, SqliteScanStateRepository,
};
use core_index::repositories::EntryRepository;
use sqlx::SqlitePool;
use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;
use store_traits::{ObjectDescriptor, ObjectLister};
use tokio::sync::Mutex;
use tokio::time::timeout;
use tracing::{debug, info, instrument, warn};

/// Reconciliation engine configuration
#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// Key prefix under which the remote store is enumerated. Empty
    /// means the whole store.
    pub root_prefix: String,

    /// Timeout for an entire reconciliation run (seconds).
    pub scan_timeout_secs: u64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            root_prefix: String::new(),
            scan_timeout_secs: 3600, // 1 hour
        }
    }
}

/// Engine for reconciling the local index with the remote store.
///
/// One run executes at a time per engine instance: both modes perform
/// non-atomic read-modify-write sequences keyed by the same rows, so a
/// second invocation while one is active is rejected immediately with
/// [`SyncError::ScanInProgress`] rather than interleaved.
pub struct ReconcileEngine {
    config: EngineConfig,
    lister: Arc<dyn ObjectLister>,
    entries: Arc<dyn EntryRepository>,
    scan_state: Arc<dyn ScanStateRepository>,
    run_gate: Mutex<()>,
}

impl ReconcileEngine {
    /// Create an engine backed by SQLite repositories over `pool`.
    pub fn new(config: EngineConfig, lister: Arc<dyn ObjectLister>, pool: SqlitePool) -> Self {
        Self {
            config,
            lister,
            entries: Arc::new(SqliteEntryRepository::new(pool.clone())),
            scan_state: Arc::new(SqliteScanStateRepository::new(pool)),
            run_gate: Mutex::new(()),
        }
    }

    /// Current scan-state timestamps.
    pub async fn scan_state(&self) -> Result<ScanState> {
        Ok(self.scan_state.get().await?)
    }

    /// Full rebuild: treat the index as disposable and repopulate it
    /// from scratch. The index under-reports while the scan runs, which
    /// is acceptable for an admin operation off the hot read path.
    #[instrument(skip(self))]
    pub async fn rebuild(&self) -> Result<RebuildSummary> {
        let _guard = self.run_gate.try_lock().map_err(|_| SyncError::ScanInProgress)?;

        timeout(
            Duration::from_secs(self.config.scan_timeout_secs),
            self.run_rebuild(),
        )
        .await
        .map_err(|_| {
            warn!("Full rebuild timed out");
            SyncError::Timeout(self.config.scan_timeout_secs)
        })?
    }

    /// Delta refresh: write only rows whose remote state differs and
    /// delete rows no longer observed, minimizing remote calls and
    /// local writes.
    #[instrument(skip(self))]
    pub async fn refresh(&self) -> Result<RefreshSummary> {
        let _guard = self.run_gate.try_lock().map_err(|_| SyncError::ScanInProgress)?;

        timeout(
            Duration::from_secs(self.config.scan_timeout_secs),
            self.run_refresh(),
        )
        .await
        .map_err(|_| {
            warn!("Delta refresh timed out");
            SyncError::Timeout(self.config.scan_timeout_secs)
        })?
    }

    async fn run_rebuild(&self) -> Result<RebuildSummary> {
        info!("Starting full index rebuild");
        self.entries.clear_all().await?;

        // The store was just cleared, so folder dedup is purely
        // in-memory; nothing needs re-querying.
        let mut seen_folders: HashSet<String> = HashSet::new();
        let mut objects = 0u64;

        let mut cursor: Option<String> = None;
        let mut page_count = 0u32;
        loop {
            page_count += 1;
            debug!(page = page_count, cursor = ?cursor, "Fetching listing page");

            let page = self
                .lister
                .list_objects(&self.config.root_prefix, cursor.as_deref())
                .await?;

            for object in &page.objects {
                for (folder_key, folder_name) in keypath::ancestor_folders(&object.key) {
                    if seen_folders.insert(folder_key.clone()) {
                        self.entries
                            .upsert(&IndexEntry::folder(folder_key, folder_name))
                            .await?;
                    }
                }

                self.entries.upsert(&file_entry(object)).await?;
                objects += 1;
            }

            cursor = page.next_cursor;
            if cursor.is_none() {
                break;
            }
        }

        let now = now_millis();
        // A full rebuild also counts as a delta scan.
        self.scan_state
            .merge(ScanStatePatch {
                last_full_scan: Some(now),
                last_delta_scan: Some(now),
            })
            .await?;

        let summary = RebuildSummary {
            indexed: self.entries.count_by_kind(EntryKind::File).await?,
            folders: self.entries.count_by_kind(EntryKind::Folder).await?,
        };

        info!(
            objects,
            pages = page_count,
            indexed = summary.indexed,
            folders = summary.folders,
            "Full rebuild complete"
        );

        Ok(summary)
    }

    async fn run_refresh(&self) -> Result<RefreshSummary> {
        info!("Starting delta refresh");

        // Run-scoped sets: every key observed this run (files and
        // synthesized folders) and the folders already decided.
        let mut seen_keys: HashSet<String> = HashSet::new();
        let mut decided_folders: HashSet<String> = HashSet::new();
        let mut added = 0i64;
        let mut updated = 0i64;

        let mut cursor: Option<String> = None;
        let mut page_count = 0u32;
        loop {
            page_count += 1;
            debug!(page = page_count, cursor = ?cursor, "Fetching listing page");

            let page = self
                .lister
                .list_objects(&self.config.root_prefix, cursor.as_deref())
                .await?;

            for object in &page.objects {
                for (folder_key, folder_name) in keypath::ancestor_folders(&object.key) {
                    if decided_folders.insert(folder_key.clone()) {
                        let existing = self.entries.find_by_key(&folder_key).await?;
                        match decide_folder(existing.as_ref()) {
                            EntryDecision::Unchanged => {}
                            decision => {
                                self.entries
                                    .upsert(&IndexEntry::folder(&folder_key, folder_name))
                                    .await?;
                                match decision {
                                    EntryDecision::Added => added += 1,
                                    _ => updated += 1,
                                }
                            }
                        }
                    }
                    seen_keys.insert(folder_key);
                }

                let existing = self.entries.find_by_key(&object.key).await?;
                match decide_file(existing.as_ref(), object) {
                    EntryDecision::Unchanged => {}
                    decision => {
                        self.entries.upsert(&file_entry(object)).await?;
                        match decision {
                            EntryDecision::Added => added += 1,
                            _ => updated += 1,
                        }
                    }
                }
                seen_keys.insert(object.key.clone());
            }

            cursor = page.next_cursor;
            if cursor.is_none() {
                break;
            }
        }

        // Removal sweep. Only reached when the enumeration completed
        // without error: a partial observed-set must never delete
        // still-valid entries.
        let mut removed = 0i64;
        for key in self.entries.all_keys().await? {
            if !seen_keys.contains(&key) {
                debug!(key = %key, "Removing entry no longer present remotely");
                if self.entries.delete_by_key(&key).await? {
                    removed += 1;
                }
            }
        }

        self.scan_state
            .merge(ScanStatePatch::delta_scan(now_millis()))
            .await?;

        let summary = RefreshSummary {
            added,
            updated,
            removed,
            files: self.entries.count_by_kind(EntryKind::File).await?,
            folders: self.entries.count_by_kind(EntryKind::Folder).await?,
        };

        info!(
            pages = page_count,
            added = summary.added,
            updated = summary.updated,
            removed = summary.removed,
            "Delta refresh complete"
        );

        Ok(summary)
    }
}

/// Build the file entry for a remote object, tolerating incomplete
/// descriptors (missing size becomes zero, missing metadata absent).
fn file_entry(object: &ObjectDescriptor) -> IndexEntry {
    IndexEntry::file(
        &object.key,
        stored_size(object.size),
        object.last_modified.clone(),
        object.checksum_tag.clone(),
    )
}

fn now_millis() -> i64 {
    chrono::Utc::now().timestamp_millis()
}
