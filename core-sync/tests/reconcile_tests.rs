//! Integration tests for the reconciliation engine
//!
//! These tests verify the complete reconciliation workflow including:
//! - Full rebuild with folder synthesis from flat keys
//! - Delta refresh add/update/remove detection and idempotence
//! - Deletion safety when the remote enumeration fails mid-scan
//! - Rejection of concurrent runs

use async_trait::async_trait;
use core_index::{create_test_pool, EntryKind, EntryRepository, SqliteEntryRepository};
use core_sync::{EngineConfig, ReconcileEngine, SyncError};
use sqlx::SqlitePool;
use std::sync::Arc;
use std::time::Duration;
use store_traits::{ObjectDescriptor, ObjectLister, ObjectPage, StoreError};

// ============================================================================
// Mock Listers
// ============================================================================

/// Serves a fixed sequence of pages, optionally failing on one of them.
struct MockLister {
    pages: Vec<Vec<ObjectDescriptor>>,
    fail_on_page: Option<usize>,
}

impl MockLister {
    fn single_page(objects: Vec<ObjectDescriptor>) -> Self {
        Self {
            pages: vec![objects],
            fail_on_page: None,
        }
    }

    fn paged(pages: Vec<Vec<ObjectDescriptor>>) -> Self {
        Self {
            pages,
            fail_on_page: None,
        }
    }

    fn failing_on_page(pages: Vec<Vec<ObjectDescriptor>>, page: usize) -> Self {
        Self {
            pages,
            fail_on_page: Some(page),
        }
    }
}

#[async_trait]
impl ObjectLister for MockLister {
    async fn list_objects(
        &self,
        _prefix: &str,
        cursor: Option<&str>,
    ) -> store_traits::Result<ObjectPage> {
        let index: usize = cursor.map(|c| c.parse().unwrap()).unwrap_or(0);

        if self.fail_on_page == Some(index) {
            return Err(StoreError::Transport("connection reset".to_string()));
        }

        let objects = self.pages.get(index).cloned().unwrap_or_default();
        let next_cursor = if index + 1 < self.pages.len() {
            Some((index + 1).to_string())
        } else {
            None
        };

        Ok(ObjectPage {
            objects,
            next_cursor,
        })
    }
}

/// Stalls on every page fetch, for timeout and concurrency tests.
struct SlowLister {
    delay: Duration,
}

#[async_trait]
impl ObjectLister for SlowLister {
    async fn list_objects(
        &self,
        _prefix: &str,
        _cursor: Option<&str>,
    ) -> store_traits::Result<ObjectPage> {
        tokio::time::sleep(self.delay).await;
        Ok(ObjectPage::default())
    }
}

// ============================================================================
// Helpers
// ============================================================================

fn obj(key: &str, size: u64) -> ObjectDescriptor {
    ObjectDescriptor::new(key).with_size(size)
}

fn engine(pool: &SqlitePool, lister: impl ObjectLister + 'static) -> ReconcileEngine {
    ReconcileEngine::new(EngineConfig::default(), Arc::new(lister), pool.clone())
}

fn entry_repo(pool: &SqlitePool) -> SqliteEntryRepository {
    SqliteEntryRepository::new(pool.clone())
}

// ============================================================================
// Full rebuild
// ============================================================================

#[tokio::test]
async fn test_rebuild_synthesizes_ancestor_folders() {
    let pool = create_test_pool().await.unwrap();
    let engine = engine(
        &pool,
        MockLister::paged(vec![
            vec![obj("docs/readme.txt", 10)],
            vec![obj("docs/img/logo.png", 20)],
        ]),
    );

    let summary = engine.rebuild().await.unwrap();
    assert_eq!(summary.indexed, 2);
    assert_eq!(summary.folders, 2);

    let repo = entry_repo(&pool);
    let docs = repo.find_by_key("docs/").await.unwrap().unwrap();
    assert_eq!(docs.kind, EntryKind::Folder);
    assert_eq!(docs.size, 0);

    let img = repo.find_by_key("docs/img/").await.unwrap().unwrap();
    assert_eq!(img.kind, EntryKind::Folder);
    assert_eq!(img.name, "img");

    let readme = repo.find_by_key("docs/readme.txt").await.unwrap().unwrap();
    assert_eq!(readme.extension.as_deref(), Some("txt"));
    assert_eq!(readme.size, 10);

    let logo = repo.find_by_key("docs/img/logo.png").await.unwrap().unwrap();
    assert_eq!(logo.extension.as_deref(), Some("png"));
    assert_eq!(logo.size, 20);
}

#[tokio::test]
async fn test_rebuild_stamps_both_scan_timestamps() {
    let pool = create_test_pool().await.unwrap();
    let engine = engine(&pool, MockLister::single_page(vec![obj("a.txt", 1)]));

    engine.rebuild().await.unwrap();

    let state = engine.scan_state().await.unwrap();
    assert!(state.last_full_scan.is_some());
    assert_eq!(state.last_full_scan, state.last_delta_scan);
}

#[tokio::test]
async fn test_rebuild_discards_stale_entries() {
    let pool = create_test_pool().await.unwrap();

    let repo = entry_repo(&pool);
    repo.upsert(&core_index::IndexEntry::file("gone.txt", 1, None, None))
        .await
        .unwrap();

    let engine = engine(&pool, MockLister::single_page(vec![obj("kept.txt", 1)]));
    let summary = engine.rebuild().await.unwrap();

    assert_eq!(summary.indexed, 1);
    assert!(repo.find_by_key("gone.txt").await.unwrap().is_none());
    assert!(repo.find_by_key("kept.txt").await.unwrap().is_some());
}

#[tokio::test]
async fn test_rebuild_tolerates_missing_metadata() {
    let pool = create_test_pool().await.unwrap();
    let engine = engine(
        &pool,
        MockLister::single_page(vec![ObjectDescriptor::new("bare-object")]),
    );

    engine.rebuild().await.unwrap();

    let stored = entry_repo(&pool)
        .find_by_key("bare-object")
        .await
        .unwrap()
        .unwrap();
    assert_eq!(stored.size, 0);
    assert_eq!(stored.last_modified, None);
    assert_eq!(stored.checksum_tag, None);
}

#[tokio::test]
async fn test_rebuild_saturates_oversized_object() {
    let pool = create_test_pool().await.unwrap();
    let engine = engine(&pool, MockLister::single_page(vec![obj("huge.bin", u64::MAX)]));

    engine.rebuild().await.unwrap();

    let stored = entry_repo(&pool)
        .find_by_key("huge.bin")
        .await
        .unwrap()
        .unwrap();
    assert_eq!(stored.size, i64::MAX);
}

// ============================================================================
// Delta refresh
// ============================================================================

#[tokio::test]
async fn test_refresh_populates_empty_index() {
    let pool = create_test_pool().await.unwrap();
    let engine = engine(
        &pool,
        MockLister::single_page(vec![obj("a/b/c.txt", 5)]),
    );

    let summary = engine.refresh().await.unwrap();

    // Two synthesized folders plus the file itself.
    assert_eq!(summary.added, 3);
    assert_eq!(summary.updated, 0);
    assert_eq!(summary.removed, 0);
    assert_eq!(summary.files, 1);
    assert_eq!(summary.folders, 2);
}

#[tokio::test]
async fn test_refresh_is_idempotent() {
    let pool = create_test_pool().await.unwrap();
    let objects = vec![
        obj("docs/readme.txt", 10).with_last_modified("2024-05-01T12:00:00Z"),
        obj("docs/img/logo.png", 20).with_checksum_tag("etag-1"),
    ];

    let engine1 = engine(&pool, MockLister::single_page(objects.clone()));
    engine1.refresh().await.unwrap();

    let engine2 = engine(&pool, MockLister::single_page(objects));
    let second = engine2.refresh().await.unwrap();

    assert_eq!(second.added, 0);
    assert_eq!(second.updated, 0);
    assert_eq!(second.removed, 0);
    assert_eq!(second.files, 2);
    assert_eq!(second.folders, 2);
}

#[tokio::test]
async fn test_refresh_detects_removal() {
    let pool = create_test_pool().await.unwrap();

    let engine1 = engine(
        &pool,
        MockLister::single_page(vec![obj("a.txt", 1), obj("b.txt", 1)]),
    );
    engine1.refresh().await.unwrap();

    let engine2 = engine(&pool, MockLister::single_page(vec![obj("a.txt", 1)]));
    let summary = engine2.refresh().await.unwrap();

    assert_eq!(summary.added, 0);
    assert_eq!(summary.updated, 0);
    assert_eq!(summary.removed, 1);
    assert_eq!(summary.files, 1);
    assert_eq!(summary.folders, 0);

    assert!(entry_repo(&pool)
        .find_by_key("b.txt")
        .await
        .unwrap()
        .is_none());
}

#[tokio::test]
async fn test_refresh_detects_changed_object() {
    let pool = create_test_pool().await.unwrap();

    let engine1 = engine(
        &pool,
        MockLister::single_page(vec![obj("a.txt", 1).with_checksum_tag("v1")]),
    );
    engine1.refresh().await.unwrap();

    let engine2 = engine(
        &pool,
        MockLister::single_page(vec![obj("a.txt", 1).with_checksum_tag("v2")]),
    );
    let summary = engine2.refresh().await.unwrap();

    assert_eq!(summary.added, 0);
    assert_eq!(summary.updated, 1);
    assert_eq!(summary.removed, 0);

    let stored = entry_repo(&pool).find_by_key("a.txt").await.unwrap().unwrap();
    assert_eq!(stored.checksum_tag.as_deref(), Some("v2"));
}

#[tokio::test]
async fn test_refresh_leaves_unchanged_rows_untouched() {
    let pool = create_test_pool().await.unwrap();
    let objects = vec![obj("a.txt", 1).with_last_modified("2024-05-01T12:00:00Z")];

    let engine1 = engine(&pool, MockLister::single_page(objects.clone()));
    engine1.refresh().await.unwrap();

    let repo = entry_repo(&pool);
    let before = repo.find_by_key("a.txt").await.unwrap().unwrap();

    tokio::time::sleep(Duration::from_millis(5)).await;

    // Same instant, different timezone spelling: no write, no bump.
    let engine2 = engine(
        &pool,
        MockLister::single_page(vec![
            obj("a.txt", 1).with_last_modified("2024-05-01T12:00:00+00:00")
        ]),
    );
    let summary = engine2.refresh().await.unwrap();
    assert_eq!(summary.updated, 0);

    let after = repo.find_by_key("a.txt").await.unwrap().unwrap();
    assert_eq!(after.updated_at, before.updated_at);
}

#[tokio::test]
async fn test_refresh_stamps_only_delta_timestamp() {
    let pool = create_test_pool().await.unwrap();
    let engine = engine(&pool, MockLister::single_page(vec![obj("a.txt", 1)]));

    engine.refresh().await.unwrap();

    let state = engine.scan_state().await.unwrap();
    assert_eq!(state.last_full_scan, None);
    assert!(state.last_delta_scan.is_some());
}

// ============================================================================
// Failure handling
// ============================================================================

#[tokio::test]
async fn test_failed_enumeration_commits_no_deletions() {
    let pool = create_test_pool().await.unwrap();

    let engine1 = engine(
        &pool,
        MockLister::single_page(vec![obj("a.txt", 1), obj("b.txt", 1)]),
    );
    engine1.refresh().await.unwrap();

    // Page 1 lists only a.txt, then page 2 fails: b.txt is absent from
    // the partial observed-set but must survive.
    let engine2 = engine(
        &pool,
        MockLister::failing_on_page(vec![vec![obj("a.txt", 1)], vec![]], 1),
    );
    let result = engine2.refresh().await;
    assert!(matches!(result, Err(SyncError::Lister(_))));

    let repo = entry_repo(&pool);
    assert!(repo.find_by_key("a.txt").await.unwrap().is_some());
    assert!(repo.find_by_key("b.txt").await.unwrap().is_some());
}

#[tokio::test]
async fn test_failed_refresh_does_not_stamp_scan_state() {
    let pool = create_test_pool().await.unwrap();
    let engine = engine(
        &pool,
        MockLister::failing_on_page(vec![vec![obj("a.txt", 1)]], 0),
    );

    assert!(engine.refresh().await.is_err());
    let state = engine.scan_state().await.unwrap();
    assert_eq!(state.last_delta_scan, None);
}

#[tokio::test]
async fn test_run_times_out() {
    let pool = create_test_pool().await.unwrap();
    let config = EngineConfig {
        scan_timeout_secs: 0,
        ..Default::default()
    };
    let engine = ReconcileEngine::new(
        config,
        Arc::new(SlowLister {
            delay: Duration::from_secs(5),
        }),
        pool,
    );

    let result = engine.rebuild().await;
    assert!(matches!(result, Err(SyncError::Timeout(0))));
}

// ============================================================================
// Concurrency
// ============================================================================

#[tokio::test]
async fn test_concurrent_run_is_rejected() {
    let pool = create_test_pool().await.unwrap();
    let engine = Arc::new(ReconcileEngine::new(
        EngineConfig::default(),
        Arc::new(SlowLister {
            delay: Duration::from_millis(200),
        }),
        pool,
    ));

    let background = Arc::clone(&engine);
    let first = tokio::spawn(async move { background.rebuild().await });

    // Give the first run time to take the gate.
    tokio::time::sleep(Duration::from_millis(50)).await;

    let second = engine.refresh().await;
    assert!(matches!(second, Err(SyncError::ScanInProgress)));

    first.await.unwrap().unwrap();
}
