//! # Index Reconciliation Module
//!
//! Mirrors a remote, prefix-addressed object store into the local
//! relational index.
//!
//! ## Components
//!
//! - **Reconciliation Engine** (`engine`): drives paginated remote
//!   enumeration and updates the index in full-rebuild or delta mode
//! - **Change Decisions** (`decision`): pure compound-equality predicate
//!   deciding whether a row needs a write
//! - **Run Summaries** (`summary`): counts reported to the caller
//!
//! The engine is a periodically triggered cache refresher, not a
//! change-feed consumer: it guarantees the index self-corrects on the
//! next completed run, not real-time consistency.

pub mod decision;
pub mod engine;
pub mod error;
pub mod summary;

pub use decision::{decide_file, decide_folder, normalize_timestamp, EntryDecision};
pub use engine::{EngineConfig, ReconcileEngine};
pub use error::{Result, SyncError};
pub use summary::{RebuildSummary, RefreshSummary};
