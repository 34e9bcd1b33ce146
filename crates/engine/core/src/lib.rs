//! Deterministic hook-dispatch and combat-resolution rules shared across hosts.
//!
//! `engine-core` defines the canonical engine contracts (combat pipeline,
//! effect capabilities, area triggers, item interactions, animation playback,
//! campaign flags) and exposes pure APIs that can be reused by both the
//! runtime and offline tools. Content crates supply concrete [`Effect`] and
//! [`TriggerHook`] implementations; the runtime supplies oracle
//! implementations and drives the dispatchers.
pub mod animation;
pub mod combat;
pub mod config;
pub mod effect;
pub mod env;
pub mod error;
pub mod flags;
pub mod item;
pub mod state;
pub mod trigger;

pub use animation::{
    AnimationDescriptor, AnimationError, AnimationHandle, AnimationPlayer, AnimationRequest,
    FrameView, Tint, Vec2,
};
pub use combat::{Attack, AttackOutcome, Phase, ResolvedAttack, WeaponAttackKind, resolve};
pub use config::{ConfigError, EngineConfig};
pub use effect::{AttackContext, Capabilities, Effect, EffectId, EffectRegistry, ItemContext};
pub use env::{
    Channel, CombatParams, DiceOracle, EngineEnv, Env, HitParams, MessageSink, NullMessageSink,
    NullSceneSink, OracleError, PcgDice, PopupLayout, RecordingMessageSink, SceneSink,
    TablesOracle,
};
pub use error::{FaultRecord, HookError};
pub use flags::{FlagValue, PersistentFlagStore};
pub use item::{InventoryCommand, ItemOutcome, ProvokedAction, open_item, use_item};
pub use state::{
    ActorState, AreaId, ContainerData, EntityId, ItemKind, ItemState, ResourceMeter, WeaponData,
    WorldState,
};
pub use trigger::{DispatchReport, Trigger, TriggerContext, TriggerDispatcher, TriggerHook, TriggerKind};
