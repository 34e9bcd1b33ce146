//! Data-driven trigger hook bodies.
//!
//! Each hook is a small declarative action buildable from a RON trigger
//! table. Guard conditions live here, in the hook body - the engine only
//! guarantees the first-time semantics of area-load triggers.

use engine_core::{
    AnimationDescriptor, AnimationRequest, Channel, FlagValue, HookError, PopupLayout,
    TriggerContext, TriggerHook, Vec2,
};

/// Who a [`PostMessage`] hook addresses.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum MessageTarget {
    #[default]
    System,
    Combat,
    /// The entity that drove the event (entering/leaving actor).
    Subject,
}

/// Requests a popup; display is asynchronous and never awaited.
#[derive(Clone, Debug)]
pub struct ShowPopup {
    asset: String,
    layout: PopupLayout,
}

impl ShowPopup {
    pub fn new(asset: impl Into<String>, layout: PopupLayout) -> Self {
        Self {
            asset: asset.into(),
            layout,
        }
    }
}

impl TriggerHook for ShowPopup {
    fn name(&self) -> &str {
        "show_popup"
    }

    fn fire(&self, ctx: &mut TriggerContext<'_>) -> Result<(), HookError> {
        if let Ok(scene) = ctx.env.scene() {
            scene.show_popup(&self.asset, self.layout);
        }
        Ok(())
    }
}

/// Posts a line of text, optionally skipped while a guard flag exists
/// ("skip if the boss is already defeated").
#[derive(Clone, Debug)]
pub struct PostMessage {
    text: String,
    target: MessageTarget,
    skip_if: Option<String>,
}

impl PostMessage {
    pub fn new(text: impl Into<String>, target: MessageTarget, skip_if: Option<String>) -> Self {
        Self {
            text: text.into(),
            target,
            skip_if,
        }
    }
}

impl TriggerHook for PostMessage {
    fn name(&self) -> &str {
        "post_message"
    }

    fn fire(&self, ctx: &mut TriggerContext<'_>) -> Result<(), HookError> {
        if let Some(guard) = self.skip_if.as_deref()
            && ctx.flags.contains(guard)
        {
            return Ok(());
        }
        let channel = match self.target {
            MessageTarget::System => Channel::System,
            MessageTarget::Combat => Channel::Combat,
            MessageTarget::Subject => match ctx.subject {
                Some(subject) => Channel::Entity(subject),
                None => Channel::System,
            },
        };
        ctx.message(channel, &self.text);
        Ok(())
    }
}

/// Writes a campaign flag (quest progression, one-way gates).
#[derive(Clone, Debug)]
pub struct SetFlag {
    key: String,
    value: FlagValue,
}

impl SetFlag {
    pub fn new(key: impl Into<String>, value: impl Into<FlagValue>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }
}

impl TriggerHook for SetFlag {
    fn name(&self) -> &str {
        "set_flag"
    }

    fn fire(&self, ctx: &mut TriggerContext<'_>) -> Result<(), HookError> {
        ctx.flags.put(self.key.clone(), self.value.clone());
        Ok(())
    }
}

/// Queues a visual effect at a fixed position.
#[derive(Clone, Debug)]
pub struct PlayAnimation {
    descriptor: AnimationDescriptor,
    position: Vec2,
}

impl PlayAnimation {
    pub fn new(descriptor: AnimationDescriptor, position: Vec2) -> Self {
        Self {
            descriptor,
            position,
        }
    }
}

impl TriggerHook for PlayAnimation {
    fn name(&self) -> &str {
        "play_animation"
    }

    fn fire(&self, ctx: &mut TriggerContext<'_>) -> Result<(), HookError> {
        ctx.request_animation(AnimationRequest {
            descriptor: self.descriptor.clone(),
            position: self.position,
            tint: None,
        });
        Ok(())
    }
}
