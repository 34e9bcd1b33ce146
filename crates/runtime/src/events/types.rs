//! Event types for each topic.

use engine_core::{
    AnimationHandle, AreaId, AttackOutcome, Channel, EntityId, PopupLayout, TriggerKind,
};
use serde::{Deserialize, Serialize};

/// Combat resolution results.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum CombatEvent {
    AttackResolved {
        attacker: EntityId,
        defender: EntityId,
        outcome: AttackOutcome,
        damage: u32,
    },
}

/// Trigger dispatch reports.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AreaEvent {
    pub area: AreaId,
    pub kind: TriggerKind,
    pub fired: usize,
    pub suppressed: usize,
}

/// Item interaction results.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum ItemEvent {
    Used {
        item: EntityId,
        user: EntityId,
        removed: Vec<EntityId>,
    },
    Opened {
        item: EntityId,
        actor: EntityId,
    },
}

/// Animation lifecycle notifications from the worker.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum AnimationEvent {
    Started { handle: AnimationHandle },
    Finished { handle: AnimationHandle },
    Stopped { handle: AnimationHandle },
}

/// A message emitted by a hook, routed to its channel.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessageEvent {
    pub channel: Channel,
    pub text: String,
}

/// Presentation requests (popups, cutscenes). Display is asynchronous;
/// subscribers must not assume ordering relative to later hook execution.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum SceneEvent {
    PopupRequested { asset: String, layout: PopupLayout },
    CutsceneRequested { asset: String },
}
