//! Area-bound trigger dispatch.
//!
//! Triggers fire hooks on entry/exit/load events. The "first time" guarantee
//! of [`TriggerKind::AreaLoadFirstTime`] is an engine responsibility: the
//! dispatcher performs an atomic check-and-set against the injected
//! [`PersistentFlagStore`] keyed by area identity, so concurrent duplicate
//! load events produce exactly one hook execution and scripts never
//! re-implement the guard. Enter/exit triggers fire on every matching event;
//! guard logic there belongs to the hook body, which can read flags through
//! its context.

use std::collections::BTreeMap;
use std::sync::Arc;

use strum::Display;

use crate::animation::AnimationRequest;
use crate::env::{Channel, EngineEnv};
use crate::error::{FaultRecord, HookError};
use crate::flags::PersistentFlagStore;
use crate::state::{AreaId, EntityId, WorldState};

/// Area event classes a trigger can bind to.
#[derive(Clone, Copy, Debug, Display, PartialEq, Eq, Hash)]
#[strum(serialize_all = "snake_case")]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum TriggerKind {
    PlayerEnter,
    AreaLoadFirstTime,
    AreaExit,
}

/// Context passed to trigger hook bodies.
pub struct TriggerContext<'a> {
    pub area: AreaId,
    pub kind: TriggerKind,
    /// Entity driving the event (the entering/leaving actor), if any.
    pub subject: Option<EntityId>,
    pub world: &'a mut WorldState,
    /// Campaign flags for script guard conditions.
    pub flags: &'a PersistentFlagStore,
    pub env: &'a EngineEnv<'a>,
    animations: &'a mut Vec<AnimationRequest>,
}

impl TriggerContext<'_> {
    /// Sends `text` on `channel`. No-op when the host wired no sink.
    pub fn message(&self, channel: Channel, text: &str) {
        if let Ok(sink) = self.env.messages() {
            sink.add_message(channel, text);
        }
    }

    /// Queues a visual effect for the host to play after dispatch.
    pub fn request_animation(&mut self, request: AnimationRequest) {
        self.animations.push(request);
    }
}

/// A hook body bound to an area event.
pub trait TriggerHook: Send + Sync {
    fn name(&self) -> &str;

    fn fire(&self, ctx: &mut TriggerContext<'_>) -> Result<(), HookError>;
}

/// One trigger definition owned by the area it is registered under.
pub struct Trigger {
    pub kind: TriggerKind,
    pub hook: Arc<dyn TriggerHook>,
}

impl Trigger {
    pub fn new(kind: TriggerKind, hook: Arc<dyn TriggerHook>) -> Self {
        Self { kind, hook }
    }
}

impl core::fmt::Debug for Trigger {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Trigger")
            .field("kind", &self.kind)
            .field("hook", &self.hook.name())
            .finish()
    }
}

/// What happened during one dispatch call.
#[derive(Debug, Default)]
pub struct DispatchReport {
    /// Hooks that ran.
    pub fired: usize,
    /// Hooks skipped by the first-time guard.
    pub suppressed: usize,
    /// Hook faults recovered during dispatch.
    pub faults: Vec<FaultRecord>,
    /// Visual effects queued by hooks, for the host to play.
    pub animations: Vec<AnimationRequest>,
}

/// Dispatches area events to registered triggers.
pub struct TriggerDispatcher {
    triggers: BTreeMap<AreaId, Vec<Trigger>>,
    flags: Arc<PersistentFlagStore>,
}

impl TriggerDispatcher {
    /// The flag store is injected per campaign session; the dispatcher owns
    /// no global state.
    pub fn new(flags: Arc<PersistentFlagStore>) -> Self {
        Self {
            triggers: BTreeMap::new(),
            flags,
        }
    }

    pub fn register(&mut self, area: AreaId, trigger: Trigger) {
        self.triggers.entry(area).or_default().push(trigger);
    }

    /// Flag key backing the first-time guard for `area`.
    pub fn first_visit_key(area: AreaId) -> String {
        format!("area.{}.loaded", area.0)
    }

    /// Fires every trigger of `area` matching `kind`.
    pub fn dispatch(
        &self,
        area: AreaId,
        kind: TriggerKind,
        subject: Option<EntityId>,
        world: &mut WorldState,
        env: &EngineEnv<'_>,
    ) -> DispatchReport {
        let mut report = DispatchReport::default();
        let matching: Vec<&Trigger> = self
            .triggers
            .get(&area)
            .into_iter()
            .flatten()
            .filter(|trigger| trigger.kind == kind)
            .collect();
        if matching.is_empty() {
            return report;
        }

        // First-time guard: exactly one dispatch per area per campaign
        // session wins the check-and-set; losers are suppressed.
        if kind == TriggerKind::AreaLoadFirstTime
            && !self.flags.set_if_absent(Self::first_visit_key(area), true)
        {
            report.suppressed = matching.len();
            return report;
        }

        for trigger in matching {
            let mut ctx = TriggerContext {
                area,
                kind,
                subject,
                world: &mut *world,
                flags: &self.flags,
                env,
                animations: &mut report.animations,
            };
            match trigger.hook.fire(&mut ctx) {
                Ok(()) => report.fired += 1,
                Err(error) => report.faults.push(FaultRecord {
                    hook: trigger.hook.name().to_string(),
                    during: kind.to_string(),
                    error,
                }),
            }
        }
        report
    }

    pub fn flags(&self) -> &PersistentFlagStore {
        &self.flags
    }
}
