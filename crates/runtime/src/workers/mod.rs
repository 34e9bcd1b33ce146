//! Worker tasks that back the runtime orchestration.
//!
//! The animation worker owns the active playback set; additional workers
//! can be added to offload other duties.

mod animation;

pub use animation::{AnimationWorker, AnimationWorkerHandle};
