use thiserror::Error;

/// Errors surfaced by a remote object lister.
///
/// The reconciliation engine relies on these being distinguishable from
/// ordinary empty results: a failed page fetch must abort the run before
/// any deletion sweep, so listers must never swallow transport problems
/// into an empty page.
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Transport error: {0}")]
    Transport(String),

    #[error("Authentication failed: {0}")]
    Auth(String),

    #[error("Rate limited by remote store: {0}")]
    RateLimited(String),

    #[error("Invalid response from remote store: {0}")]
    InvalidResponse(String),
}

pub type Result<T> = std::result::Result<T, StoreError>;
