//! Topic-based event bus for host-facing notifications.
//!
//! Every outward-facing side effect of dispatch - combat results, trigger
//! reports, messages, popup requests, animation lifecycle - is published
//! here as a fire-and-forget event. Consumers subscribe per topic and only
//! receive what they care about.

mod bus;
mod types;

pub use bus::{Event, EventBus, Topic};
pub use types::{AnimationEvent, AreaEvent, CombatEvent, ItemEvent, MessageEvent, SceneEvent};
