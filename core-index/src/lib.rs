//! # Object Index Module
//!
//! Owns the local relational index mirroring a remote object store and
//! provides repository patterns for data access.
//!
//! ## Overview
//!
//! This module manages:
//! - SQLite schema and migrations for index entries and scan state
//! - Key decomposition (display names, extensions, ancestor folders)
//! - Repository patterns for entries and the singleton scan-state record
//! - Query APIs with substring/extension search and clamped pagination

pub mod db;
pub mod error;
pub mod keypath;
pub mod models;
pub mod query;
pub mod repositories;

pub use db::{create_pool, create_test_pool, DatabaseConfig};
pub use error::{IndexError, Result};
pub use models::{EntryKind, IndexEntry, ScanState};
pub use query::{QueryService, SearchPage, SearchRequest, DEFAULT_LIMIT, MAX_LIMIT};
pub use repositories::{
    EntryRepository, ScanStatePatch, ScanStateRepository, SqliteEntryRepository,
    SqliteScanStateRepository,
};
