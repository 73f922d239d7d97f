//! Remote object listing contract
//!
//! Abstracts cursor-paginated enumeration of a prefix-addressed object
//! store (S3-compatible buckets, blob containers, and the like). The
//! indexing core consumes this trait; concrete implementations live with
//! the host application.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::Result;

/// Metadata for a single remote object as reported by the store.
///
/// Object stores routinely return incomplete descriptors (no size for
/// zero-byte markers, no modification time for some backends), so every
/// field beyond the key is optional. Consumers are expected to be
/// tolerant of the gaps rather than reject the object.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ObjectDescriptor {
    /// Full key within the store, e.g. `docs/img/logo.png`.
    pub key: String,

    /// Object size in bytes, if reported.
    pub size: Option<u64>,

    /// Modification timestamp as reported by the store, verbatim.
    pub last_modified: Option<String>,

    /// Opaque integrity/version tag (often a content hash, not
    /// guaranteed to be one).
    pub checksum_tag: Option<String>,
}

impl ObjectDescriptor {
    /// Create a descriptor carrying only a key.
    pub fn new(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            size: None,
            last_modified: None,
            checksum_tag: None,
        }
    }

    /// Set the reported size.
    pub fn with_size(mut self, size: u64) -> Self {
        self.size = Some(size);
        self
    }

    /// Set the reported modification timestamp.
    pub fn with_last_modified(mut self, ts: impl Into<String>) -> Self {
        self.last_modified = Some(ts.into());
        self
    }

    /// Set the integrity tag.
    pub fn with_checksum_tag(mut self, tag: impl Into<String>) -> Self {
        self.checksum_tag = Some(tag.into());
        self
    }
}

/// One page of a paginated listing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ObjectPage {
    /// Objects in this page, in store enumeration order.
    pub objects: Vec<ObjectDescriptor>,

    /// Opaque continuation cursor. `None` terminates the listing.
    pub next_cursor: Option<String>,
}

/// Paginated enumeration of a remote object store.
///
/// # Contract
///
/// - `list_objects(prefix, None)` starts a fresh enumeration; passing
///   back `next_cursor` fetches the following page.
/// - The listing terminates when a page carries `next_cursor: None`.
/// - Transport, auth, and decoding failures must surface as
///   [`StoreError`](crate::StoreError), never as an empty page: callers
///   use the distinction to abort reconciliation safely.
///
/// # Example
///
/// ```ignore
/// let mut cursor = None;
/// loop {
///     let page = lister.list_objects("", cursor.as_deref()).await?;
///     for object in &page.objects {
///         process(object);
///     }
///     cursor = page.next_cursor;
///     if cursor.is_none() {
///         break;
///     }
/// }
/// ```
#[async_trait]
pub trait ObjectLister: Send + Sync {
    /// Fetch one page of objects whose keys begin with `prefix`.
    async fn list_objects(&self, prefix: &str, cursor: Option<&str>) -> Result<ObjectPage>;
}
