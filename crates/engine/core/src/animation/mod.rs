//! Frame-sequenced visual effects driven by simulation time.
//!
//! Descriptors declare sprite sequence, timing, alpha fade and drift;
//! the [`AnimationPlayer`] owns the active set and advances every animation
//! by the elapsed simulation delta each tick. Durations are simulation-time
//! driven, never wall-clock.

mod descriptor;
mod player;

pub use descriptor::{AnimationDescriptor, AnimationRequest, Tint, Vec2};
pub use player::{AnimationHandle, AnimationPlayer, FrameView};

use thiserror::Error;

/// Errors raised at `play()` time. No partial state is created on rejection.
#[derive(Clone, Debug, PartialEq, Error)]
pub enum AnimationError {
    #[error("invalid animation descriptor: {reason}")]
    InvalidDescriptor { reason: String },
}

impl AnimationError {
    pub(crate) fn invalid(reason: impl Into<String>) -> Self {
        Self::InvalidDescriptor {
            reason: reason.into(),
        }
    }
}
