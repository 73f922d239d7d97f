//! Index entry repository trait and SQLite implementation

use crate::error::Result;
use crate::models::{EntryKind, IndexEntry};
use crate::repositories::now_millis;
use async_trait::async_trait;
use sqlx::{query_as, SqlitePool};

/// Data access interface for index entries.
///
/// Writes are point operations keyed by the unique entry key; no range
/// locking is needed. `upsert` always refreshes the row's `updated_at`
/// stamp, which drives the recent-first ordering.
#[async_trait]
pub trait EntryRepository: Send + Sync {
    /// Insert or overwrite an entry by key, refreshing `updated_at`.
    async fn upsert(&self, entry: &IndexEntry) -> Result<()>;

    /// Find an entry by its key.
    ///
    /// # Returns
    /// - `Ok(Some(entry))` if found
    /// - `Ok(None)` if not found
    async fn find_by_key(&self, key: &str) -> Result<Option<IndexEntry>>;

    /// Delete an entry by key.
    ///
    /// # Returns
    /// - `Ok(true)` if an entry was deleted
    /// - `Ok(false)` if no entry existed
    async fn delete_by_key(&self, key: &str) -> Result<bool>;

    /// All keys currently stored, files and folders alike. Used by the
    /// delta-refresh removal sweep to diff against the observed set.
    async fn all_keys(&self) -> Result<Vec<String>>;

    /// Count entries of one kind.
    async fn count_by_kind(&self, kind: EntryKind) -> Result<i64>;

    /// Delete every entry. Used by the full rebuild before repopulating.
    async fn clear_all(&self) -> Result<()>;

    /// Most recently written entries, `updated_at` descending.
    async fn recent(&self, limit: i64) -> Result<Vec<IndexEntry>>;

    /// Paginated search ordered by `updated_at` descending.
    ///
    /// A `None` or empty query matches everything. A non-empty query is
    /// matched lower-cased as a substring against name, key, or
    /// extension.
    async fn search(
        &self,
        query: Option<&str>,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<IndexEntry>>;

    /// Total number of entries matching `query`, ignoring pagination.
    async fn count_search(&self, query: Option<&str>) -> Result<i64>;
}

/// SQLite implementation of EntryRepository
pub struct SqliteEntryRepository {
    pool: SqlitePool,
}

impl SqliteEntryRepository {
    /// Create a new SQLite entry repository
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Build a LIKE pattern matching `query` as a literal substring.
    /// `%`, `_`, and the escape character itself are escaped so they
    /// never act as wildcards.
    fn like_pattern(query: &str) -> String {
        let escaped = query
            .to_lowercase()
            .replace('\\', "\\\\")
            .replace('%', "\\%")
            .replace('_', "\\_");
        format!("%{escaped}%")
    }
}

#[async_trait]
impl EntryRepository for SqliteEntryRepository {
    async fn upsert(&self, entry: &IndexEntry) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO index_entries (
                key, name, extension, size, last_modified, checksum_tag, kind, updated_at
            ) VALUES (?, ?, ?, ?, ?, ?, ?, ?)
            ON CONFLICT(key) DO UPDATE SET
                name = excluded.name,
                extension = excluded.extension,
                size = excluded.size,
                last_modified = excluded.last_modified,
                checksum_tag = excluded.checksum_tag,
                kind = excluded.kind,
                updated_at = excluded.updated_at
            "#,
        )
        .bind(&entry.key)
        .bind(&entry.name)
        .bind(&entry.extension)
        .bind(entry.size)
        .bind(&entry.last_modified)
        .bind(&entry.checksum_tag)
        .bind(entry.kind)
        .bind(now_millis())
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn find_by_key(&self, key: &str) -> Result<Option<IndexEntry>> {
        let entry = query_as::<_, IndexEntry>("SELECT * FROM index_entries WHERE key = ?")
            .bind(key)
            .fetch_optional(&self.pool)
            .await?;

        Ok(entry)
    }

    async fn delete_by_key(&self, key: &str) -> Result<bool> {
        let result = sqlx::query("DELETE FROM index_entries WHERE key = ?")
            .bind(key)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn all_keys(&self) -> Result<Vec<String>> {
        let keys: Vec<(String,)> = query_as("SELECT key FROM index_entries")
            .fetch_all(&self.pool)
            .await?;

        Ok(keys.into_iter().map(|(key,)| key).collect())
    }

    async fn count_by_kind(&self, kind: EntryKind) -> Result<i64> {
        let (count,): (i64,) = query_as("SELECT COUNT(*) FROM index_entries WHERE kind = ?")
            .bind(kind)
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }

    async fn clear_all(&self) -> Result<()> {
        sqlx::query("DELETE FROM index_entries")
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    async fn recent(&self, limit: i64) -> Result<Vec<IndexEntry>> {
        let entries = query_as::<_, IndexEntry>(
            "SELECT * FROM index_entries ORDER BY updated_at DESC, key ASC LIMIT ?",
        )
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        Ok(entries)
    }

    async fn search(
        &self,
        query: Option<&str>,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<IndexEntry>> {
        let entries = match query.filter(|q| !q.is_empty()) {
            Some(q) => {
                let pattern = Self::like_pattern(q);
                query_as::<_, IndexEntry>(
                    r#"
                    SELECT * FROM index_entries
                    WHERE lower(name) LIKE ? ESCAPE '\'
                       OR lower(key) LIKE ? ESCAPE '\'
                       OR lower(coalesce(extension, '')) LIKE ? ESCAPE '\'
                    ORDER BY updated_at DESC, key ASC
                    LIMIT ? OFFSET ?
                    "#,
                )
                .bind(&pattern)
                .bind(&pattern)
                .bind(&pattern)
                .bind(limit)
                .bind(offset)
                .fetch_all(&self.pool)
                .await?
            }
            None => {
                query_as::<_, IndexEntry>(
                    "SELECT * FROM index_entries ORDER BY updated_at DESC, key ASC LIMIT ? OFFSET ?",
                )
                .bind(limit)
                .bind(offset)
                .fetch_all(&self.pool)
                .await?
            }
        };

        Ok(entries)
    }

    async fn count_search(&self, query: Option<&str>) -> Result<i64> {
        let (count,): (i64,) = match query.filter(|q| !q.is_empty()) {
            Some(q) => {
                let pattern = Self::like_pattern(q);
                query_as(
                    r#"
                    SELECT COUNT(*) FROM index_entries
                    WHERE lower(name) LIKE ? ESCAPE '\'
                       OR lower(key) LIKE ? ESCAPE '\'
                       OR lower(coalesce(extension, '')) LIKE ? ESCAPE '\'
                    "#,
                )
                .bind(&pattern)
                .bind(&pattern)
                .bind(&pattern)
                .fetch_one(&self.pool)
                .await?
            }
            None => {
                query_as("SELECT COUNT(*) FROM index_entries")
                    .fetch_one(&self.pool)
                    .await?
            }
        };

        Ok(count)
    }
}
