//! Runtime error surface.

use thiserror::Error;

use crate::repository::RepositoryError;
use engine_core::{AnimationError, ConfigError, OracleError};

/// Errors surfaced by the runtime facade.
#[derive(Debug, Error)]
pub enum RuntimeError {
    /// Campaign persistence failed. A corrupted save is fatal to campaign
    /// load and reaches the caller through this variant.
    #[error("repository error: {0}")]
    Repository(#[from] RepositoryError),

    #[error("oracle error: {0}")]
    Oracle(#[from] OracleError),

    #[error("animation error: {0}")]
    Animation(#[from] AnimationError),

    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    /// A content data file (config, animation catalog, trigger table)
    /// failed to load or validate.
    #[error("content load error: {0}")]
    Content(String),

    #[error("animation worker is not running")]
    WorkerUnavailable,
}

pub type Result<T> = std::result::Result<T, RuntimeError>;
