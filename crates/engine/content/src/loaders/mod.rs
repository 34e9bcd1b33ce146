//! Content loaders for reading engine data from files.
//!
//! Loaders convert RON/TOML files into validated engine values. Malformed
//! data is rejected at load time, before any dispatcher sees it.

pub mod animations;
pub mod config;
pub mod triggers;

pub use animations::{AnimationCatalog, AnimationLoader, AnimationSpec};
pub use config::ConfigLoader;
pub use triggers::{TriggerLoader, TriggerSpec};

use std::path::Path;

/// Common result type for loaders.
pub type LoadResult<T> = anyhow::Result<T>;

/// Helper function to read file contents.
pub(crate) fn read_file(path: &Path) -> LoadResult<String> {
    std::fs::read_to_string(path)
        .map_err(|e| anyhow::anyhow!("Failed to read file {}: {}", path.display(), e))
}
