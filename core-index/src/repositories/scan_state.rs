//! Scan-state repository trait and SQLite implementation
//!
//! The scan state is a single addressable record, never a module-level
//! variable, so tests can inject a fresh store per test. It is created
//! lazily by the first merge and never deleted.

use crate::error::Result;
use crate::models::ScanState;
use async_trait::async_trait;
use sqlx::{query_as, SqlitePool};

/// Partial scan-state update. `None` fields retain their stored value.
#[derive(Debug, Clone, Copy, Default)]
pub struct ScanStatePatch {
    pub last_full_scan: Option<i64>,
    pub last_delta_scan: Option<i64>,
}

impl ScanStatePatch {
    /// Patch stamping only the delta-scan timestamp.
    pub fn delta_scan(at_millis: i64) -> Self {
        Self {
            last_full_scan: None,
            last_delta_scan: Some(at_millis),
        }
    }
}

/// Access to the singleton scan-state record.
#[async_trait]
pub trait ScanStateRepository: Send + Sync {
    /// Current scan state. Both timestamps are absent until the record
    /// has been created by a completed reconciliation.
    async fn get(&self) -> Result<ScanState>;

    /// Merge a partial update into the record, creating it if missing.
    async fn merge(&self, patch: ScanStatePatch) -> Result<()>;
}

/// SQLite implementation of ScanStateRepository
pub struct SqliteScanStateRepository {
    pool: SqlitePool,
}

impl SqliteScanStateRepository {
    /// Create a new SQLite scan-state repository
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ScanStateRepository for SqliteScanStateRepository {
    async fn get(&self) -> Result<ScanState> {
        let row: Option<(Option<i64>, Option<i64>)> =
            query_as("SELECT last_full_scan, last_delta_scan FROM scan_state WHERE id = 1")
                .fetch_optional(&self.pool)
                .await?;

        Ok(row
            .map(|(last_full_scan, last_delta_scan)| ScanState {
                last_full_scan,
                last_delta_scan,
            })
            .unwrap_or_default())
    }

    async fn merge(&self, patch: ScanStatePatch) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO scan_state (id, last_full_scan, last_delta_scan)
            VALUES (1, ?, ?)
            ON CONFLICT(id) DO UPDATE SET
                last_full_scan = coalesce(excluded.last_full_scan, scan_state.last_full_scan),
                last_delta_scan = coalesce(excluded.last_delta_scan, scan_state.last_delta_scan)
            "#,
        )
        .bind(patch.last_full_scan)
        .bind(patch.last_delta_scan)
        .execute(&self.pool)
        .await?;

        Ok(())
    }
}
