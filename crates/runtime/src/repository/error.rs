//! Errors raised by repository implementations.

use thiserror::Error;

/// Errors surfaced by campaign stores.
#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("campaign store lock was poisoned")]
    LockPoisoned,

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serialization(String),

    /// The saved campaign failed to deserialize. Fatal to campaign load:
    /// callers must surface this, never default the table silently.
    #[error("corrupted campaign data: {0}")]
    CorruptedData(String),
}
