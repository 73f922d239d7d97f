use core_index::IndexError;
use store_traits::StoreError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum SyncError {
    #[error("Remote listing failed: {0}")]
    Lister(#[from] StoreError),

    #[error("Index store error: {0}")]
    Index(#[from] IndexError),

    #[error("A reconciliation run is already in progress")]
    ScanInProgress,

    #[error("Reconciliation timed out after {0} seconds")]
    Timeout(u64),
}

pub type Result<T> = std::result::Result<T, SyncError>;
