//! Area trigger table loader.

use std::path::Path;
use std::sync::Arc;

use engine_core::{AreaId, FlagValue, PopupLayout, Trigger, TriggerKind, Vec2};
use serde::{Deserialize, Serialize};

use crate::hooks::{MessageTarget, PlayAnimation, PostMessage, SetFlag, ShowPopup};
use crate::loaders::animations::AnimationCatalog;
use crate::loaders::{LoadResult, read_file};

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub enum TriggerKindSpec {
    PlayerEnter,
    AreaLoadFirstTime,
    AreaExit,
}

impl From<TriggerKindSpec> for TriggerKind {
    fn from(spec: TriggerKindSpec) -> Self {
        match spec {
            TriggerKindSpec::PlayerEnter => TriggerKind::PlayerEnter,
            TriggerKindSpec::AreaLoadFirstTime => TriggerKind::AreaLoadFirstTime,
            TriggerKindSpec::AreaExit => TriggerKind::AreaExit,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub enum MessageTargetSpec {
    #[default]
    System,
    Combat,
    Subject,
}

impl From<MessageTargetSpec> for MessageTarget {
    fn from(spec: MessageTargetSpec) -> Self {
        match spec {
            MessageTargetSpec::System => MessageTarget::System,
            MessageTargetSpec::Combat => MessageTarget::Combat,
            MessageTargetSpec::Subject => MessageTarget::Subject,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum FlagValueSpec {
    Bool(bool),
    Int(i64),
    Text(String),
}

impl From<FlagValueSpec> for FlagValue {
    fn from(spec: FlagValueSpec) -> Self {
        match spec {
            FlagValueSpec::Bool(value) => FlagValue::Bool(value),
            FlagValueSpec::Int(value) => FlagValue::Int(value),
            FlagValueSpec::Text(value) => FlagValue::Text(value),
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct LayoutSpec {
    pub width: u32,
    pub height: u32,
    #[serde(default = "default_centered")]
    pub centered: bool,
}

fn default_centered() -> bool {
    true
}

impl From<LayoutSpec> for PopupLayout {
    fn from(spec: LayoutSpec) -> Self {
        PopupLayout {
            width: spec.width,
            height: spec.height,
            centered: spec.centered,
        }
    }
}

/// Hook body as written in RON.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum HookSpec {
    ShowPopup {
        asset: String,
        #[serde(default)]
        layout: Option<LayoutSpec>,
    },
    PostMessage {
        text: String,
        #[serde(default)]
        target: MessageTargetSpec,
        #[serde(default)]
        skip_if: Option<String>,
    },
    SetFlag {
        key: String,
        value: FlagValueSpec,
    },
    PlayAnimation {
        /// Name in the animation catalog loaded alongside this table.
        animation: String,
        #[serde(default)]
        x: f32,
        #[serde(default)]
        y: f32,
    },
}

/// One trigger definition as written in RON.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TriggerSpec {
    pub area: u32,
    pub kind: TriggerKindSpec,
    pub hook: HookSpec,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct TriggerTable {
    triggers: Vec<TriggerSpec>,
}

/// Loader for area trigger tables from RON files.
pub struct TriggerLoader;

impl TriggerLoader {
    /// Load a trigger table, resolving animation names against `animations`.
    pub fn load(path: &Path, animations: &AnimationCatalog) -> LoadResult<Vec<(AreaId, Trigger)>> {
        let content = read_file(path)?;
        Self::parse_str(&content, animations)
    }

    /// Parse a trigger table from RON text.
    pub fn parse_str(
        content: &str,
        animations: &AnimationCatalog,
    ) -> LoadResult<Vec<(AreaId, Trigger)>> {
        let table: TriggerTable = ron::from_str(content)
            .map_err(|e| anyhow::anyhow!("Failed to parse trigger table RON: {}", e))?;

        table
            .triggers
            .into_iter()
            .map(|spec| Self::build(spec, animations))
            .collect()
    }

    fn build(spec: TriggerSpec, animations: &AnimationCatalog) -> LoadResult<(AreaId, Trigger)> {
        let hook: Arc<dyn engine_core::TriggerHook> = match spec.hook {
            HookSpec::ShowPopup { asset, layout } => Arc::new(ShowPopup::new(
                asset,
                layout.map(PopupLayout::from).unwrap_or_default(),
            )),
            HookSpec::PostMessage {
                text,
                target,
                skip_if,
            } => Arc::new(PostMessage::new(text, target.into(), skip_if)),
            HookSpec::SetFlag { key, value } => Arc::new(SetFlag::new(key, FlagValue::from(value))),
            HookSpec::PlayAnimation { animation, x, y } => {
                let descriptor = animations
                    .get(&animation)
                    .ok_or_else(|| anyhow::anyhow!("unknown animation '{}'", animation))?
                    .clone();
                Arc::new(PlayAnimation::new(descriptor, Vec2::new(x, y)))
            }
        };
        Ok((AreaId(spec.area), Trigger::new(spec.kind.into(), hook)))
    }
}
