use core_index::IndexError;
use core_sync::SyncError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CoreError {
    #[error("Reconciliation error: {0}")]
    Sync(#[from] SyncError),

    #[error("Index error: {0}")]
    Index(#[from] IndexError),

    #[error("Initialization failed: {0}")]
    InitializationFailed(String),
}

pub type Result<T> = std::result::Result<T, CoreError>;
