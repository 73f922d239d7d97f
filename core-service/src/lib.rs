//! Index service façade and bootstrap helpers.
//!
//! This crate wires the reconciliation engine and query layer into the
//! surface consumed by the UI/API layer: index status, full rebuild,
//! delta refresh, recent listing, and search. The host supplies the
//! [`ObjectLister`] implementation for its object store and a SQLite
//! pool from [`core_index::create_pool`].
//!
//! Reconciliation runs are mutually exclusive per service instance;
//! queries are served concurrently against whatever index state exists,
//! including the under-reporting window while a rebuild is in flight.

pub mod error;
pub mod logging;
pub mod records;

pub use error::{CoreError, Result};
pub use logging::{init_logging, LogFormat};
pub use records::{EntryRecord, IndexStatus, SearchParams, SearchResponse};

use core_index::{
    EntryKind, EntryRepository, QueryService, ScanStateRepository, SearchRequest,
    SqliteEntryRepository, SqliteScanStateRepository, DEFAULT_LIMIT,
};
use core_sync::{EngineConfig, RebuildSummary, ReconcileEngine, RefreshSummary};
use sqlx::SqlitePool;
use std::sync::Arc;
use store_traits::ObjectLister;
use tracing::{info, instrument};

/// Primary façade exposed to host applications.
pub struct IndexService {
    engine: ReconcileEngine,
    query: QueryService,
    entries: Arc<dyn EntryRepository>,
    scan_state: Arc<dyn ScanStateRepository>,
}

impl IndexService {
    /// Create a service over an existing pool and lister.
    pub fn new(pool: SqlitePool, lister: Arc<dyn ObjectLister>, config: EngineConfig) -> Self {
        let entries: Arc<dyn EntryRepository> =
            Arc::new(SqliteEntryRepository::new(pool.clone()));
        let scan_state: Arc<dyn ScanStateRepository> =
            Arc::new(SqliteScanStateRepository::new(pool.clone()));

        Self {
            engine: ReconcileEngine::new(config, lister, pool),
            query: QueryService::new(Arc::clone(&entries)),
            entries,
            scan_state,
        }
    }

    /// Current index freshness: indexed object count and the timestamps
    /// of the last completed full and delta scans.
    pub async fn index_status(&self) -> Result<IndexStatus> {
        let object_count = self.entries.count_by_kind(EntryKind::File).await?;
        let state = self.scan_state.get().await?;
        Ok(IndexStatus::new(object_count, state))
    }

    /// Rebuild the index from scratch. May run long on large stores;
    /// the call resolves with the summary once the scan completes.
    #[instrument(skip(self))]
    pub async fn rebuild_index(&self) -> Result<RebuildSummary> {
        info!("Rebuild requested");
        Ok(self.engine.rebuild().await?)
    }

    /// Delta-refresh the index against current remote state.
    #[instrument(skip(self))]
    pub async fn refresh_index(&self) -> Result<RefreshSummary> {
        info!("Refresh requested");
        Ok(self.engine.refresh().await?)
    }

    /// Most recently changed entries, newest first. `None` takes the
    /// default page size of 20.
    pub async fn recent_indexed_objects(&self, limit: Option<i64>) -> Result<Vec<EntryRecord>> {
        let entries = self.query.recent(limit.unwrap_or(DEFAULT_LIMIT)).await?;
        Ok(entries.into_iter().map(EntryRecord::from).collect())
    }

    /// Paginated, optionally filtered search over the index.
    pub async fn search_indexed_objects(&self, params: SearchParams) -> Result<SearchResponse> {
        let request = SearchRequest {
            search: params.search,
            limit: params.limit.unwrap_or(DEFAULT_LIMIT),
            offset: params.offset.unwrap_or(0),
        };

        let page = self.query.search(request).await?;
        Ok(SearchResponse {
            items: page.items.into_iter().map(EntryRecord::from).collect(),
            total: page.total,
        })
    }
}
