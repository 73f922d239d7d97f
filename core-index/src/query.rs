//! High-level query API over the object index.
//!
//! Serves the interactive read path: recent-first listing and
//! substring/extension search with clamped pagination. Queries are
//! plain snapshot reads and run concurrently with reconciliation; a
//! rebuild in flight is visible as a temporarily incomplete index,
//! which is accepted staleness rather than a bug.

use crate::error::Result;
use crate::models::IndexEntry;
use crate::repositories::EntryRepository;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::debug;

/// Default page size for recent listings and searches.
pub const DEFAULT_LIMIT: i64 = 20;

/// Hard ceiling on page size; larger requests are clamped, not rejected.
pub const MAX_LIMIT: i64 = 200;

/// Search parameters. Construct with [`SearchRequest::default`] and
/// adjust the fields you need.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchRequest {
    /// Case-insensitive substring matched against name, key, or
    /// extension. Empty or absent lists everything.
    pub search: Option<String>,
    /// Page size, clamped to `[1, 200]`.
    pub limit: i64,
    /// Rows to skip, clamped to `>= 0`.
    pub offset: i64,
}

impl Default for SearchRequest {
    fn default() -> Self {
        Self {
            search: None,
            limit: DEFAULT_LIMIT,
            offset: 0,
        }
    }
}

/// One page of search results plus the unpaginated match count.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchPage {
    pub items: Vec<IndexEntry>,
    pub total: i64,
}

/// Read-only query service over the entry repository.
pub struct QueryService {
    entries: Arc<dyn EntryRepository>,
}

impl QueryService {
    /// Create a query service over the given entry repository.
    pub fn new(entries: Arc<dyn EntryRepository>) -> Self {
        Self { entries }
    }

    /// Up to `limit` entries ordered by `updated_at` descending:
    /// "what changed most recently". Non-positive limits fall back to
    /// the default page size.
    pub async fn recent(&self, limit: i64) -> Result<Vec<IndexEntry>> {
        let limit = if limit <= 0 { DEFAULT_LIMIT } else { limit.min(MAX_LIMIT) };
        self.entries.recent(limit).await
    }

    /// Paginated, optionally filtered read of the index.
    ///
    /// The returned `total` counts all matches of the filter, ignoring
    /// pagination, so callers can render page controls.
    pub async fn search(&self, request: SearchRequest) -> Result<SearchPage> {
        let limit = request.limit.clamp(1, MAX_LIMIT);
        let offset = request.offset.max(0);
        let query = request.search.as_deref();

        debug!(
            query = query.unwrap_or(""),
            limit, offset, "Searching index"
        );

        let items = self.entries.search(query, limit, offset).await?;
        let total = self.entries.count_search(query).await?;

        Ok(SearchPage { items, total })
    }
}
