//! Runtime orchestrator and builder.

use std::path::Path;
use std::sync::Arc;

use tracing::{debug, info, warn};

use engine_content::{AnimationCatalog, AnimationLoader, ConfigLoader, TriggerLoader};

use engine_core::{
    AnimationHandle, AnimationRequest, AreaId, Attack, DiceOracle, DispatchReport, EffectRegistry,
    EngineConfig, EntityId, FaultRecord, ItemOutcome, PersistentFlagStore, ResolvedAttack,
    Trigger, TriggerDispatcher, TriggerKind, WeaponAttackKind, WorldState, open_item, resolve,
    use_item,
};

use crate::error::Result;
use crate::events::{AreaEvent, CombatEvent, Event, EventBus, ItemEvent, Topic};
use crate::oracle::{OracleManager, RandDice};
use crate::repository::{CampaignRecord, CampaignStore};
use crate::workers::{AnimationWorker, AnimationWorkerHandle};

/// Builder for [`Runtime`].
pub struct RuntimeBuilder {
    session_id: String,
    config: EngineConfig,
    world: WorldState,
    store: Option<Arc<dyn CampaignStore>>,
    dice: Option<Box<dyn DiceOracle>>,
    triggers: Vec<(AreaId, Trigger)>,
    bus_capacity: usize,
}

impl RuntimeBuilder {
    pub fn new(session_id: impl Into<String>) -> Self {
        Self {
            session_id: session_id.into(),
            config: EngineConfig::default(),
            world: WorldState::new(),
            store: None,
            dice: None,
            triggers: Vec::new(),
            bus_capacity: 100,
        }
    }

    pub fn with_config(mut self, config: EngineConfig) -> Self {
        self.config = config;
        self
    }

    pub fn with_world(mut self, world: WorldState) -> Self {
        self.world = world;
        self
    }

    /// Campaign store used to resume flags at build and persist them on
    /// [`Runtime::save_campaign`].
    pub fn with_campaign_store(mut self, store: Arc<dyn CampaignStore>) -> Self {
        self.store = Some(store);
        self
    }

    /// Replaces the live dice oracle (e.g. a seeded [`engine_core::PcgDice`]
    /// for replays or a fixed stub for tests).
    pub fn with_dice(mut self, dice: Box<dyn DiceOracle>) -> Self {
        self.dice = Some(dice);
        self
    }

    pub fn with_trigger(mut self, area: AreaId, trigger: Trigger) -> Self {
        self.triggers.push((area, trigger));
        self
    }

    pub fn with_triggers(mut self, triggers: impl IntoIterator<Item = (AreaId, Trigger)>) -> Self {
        self.triggers.extend(triggers);
        self
    }

    pub fn with_bus_capacity(mut self, capacity: usize) -> Self {
        self.bus_capacity = capacity;
        self
    }

    /// Loads content data files from `dir` and applies them: `config.toml`,
    /// `animations.ron` and `triggers.ron`, each optional. Trigger tables
    /// resolve animation names against the catalog loaded here.
    pub fn with_content_dir(mut self, dir: impl AsRef<Path>) -> Result<Self> {
        let dir = dir.as_ref();

        let config_path = dir.join("config.toml");
        if config_path.exists() {
            self.config = ConfigLoader::load(&config_path)
                .map_err(|e| crate::RuntimeError::Content(e.to_string()))?;
        }

        let animations_path = dir.join("animations.ron");
        let animations = if animations_path.exists() {
            AnimationLoader::load(&animations_path)
                .map_err(|e| crate::RuntimeError::Content(e.to_string()))?
        } else {
            AnimationCatalog::default()
        };

        let triggers_path = dir.join("triggers.ron");
        if triggers_path.exists() {
            let loaded = TriggerLoader::load(&triggers_path, &animations)
                .map_err(|e| crate::RuntimeError::Content(e.to_string()))?;
            self.triggers.extend(loaded);
        }
        Ok(self)
    }

    /// Builds the runtime. Must be called inside a tokio runtime (the
    /// animation worker is spawned here).
    ///
    /// # Errors
    ///
    /// Invalid configuration, or a campaign store whose saved session fails
    /// to deserialize - store corruption is fatal to campaign load and is
    /// never silently defaulted.
    pub fn build(self) -> Result<Runtime> {
        self.config.validate()?;

        let flags = match &self.store {
            Some(store) => match store.load(&self.session_id)? {
                Some(record) => {
                    info!(
                        target: "runtime",
                        session = %self.session_id,
                        flags = record.flags.len(),
                        "resumed campaign session"
                    );
                    Arc::new(PersistentFlagStore::from_entries(record.flags))
                }
                None => Arc::new(PersistentFlagStore::new()),
            },
            None => Arc::new(PersistentFlagStore::new()),
        };

        let bus = EventBus::with_capacity(self.bus_capacity);
        let dice = self.dice.unwrap_or_else(|| Box::new(RandDice::new()));
        let oracles = OracleManager::new(dice, bus.clone(), &self.config);

        let mut triggers = TriggerDispatcher::new(Arc::clone(&flags));
        for (area, trigger) in self.triggers {
            triggers.register(area, trigger);
        }

        let (animations, _join) = AnimationWorker::spawn(bus.clone());

        Ok(Runtime {
            session_id: self.session_id,
            config: self.config,
            world: self.world,
            effects: EffectRegistry::new(),
            flags,
            triggers,
            oracles,
            bus,
            store: self.store,
            animations,
        })
    }
}

/// Facade driving the engine dispatchers from world events.
///
/// The host serializes per-entity mutation by funneling events through one
/// `Runtime`; combat phases never interleave, and trigger/item dispatch
/// never overlaps combat for the same combatant.
pub struct Runtime {
    session_id: String,
    config: EngineConfig,
    world: WorldState,
    effects: EffectRegistry,
    flags: Arc<PersistentFlagStore>,
    triggers: TriggerDispatcher,
    oracles: OracleManager,
    bus: EventBus,
    store: Option<Arc<dyn CampaignStore>>,
    animations: AnimationWorkerHandle,
}

impl std::fmt::Debug for Runtime {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Runtime")
            .field("session_id", &self.session_id)
            .finish_non_exhaustive()
    }
}

impl Runtime {
    pub fn builder(session_id: impl Into<String>) -> RuntimeBuilder {
        RuntimeBuilder::new(session_id)
    }

    pub fn session_id(&self) -> &str {
        &self.session_id
    }

    pub fn world(&self) -> &WorldState {
        &self.world
    }

    pub fn world_mut(&mut self) -> &mut WorldState {
        &mut self.world
    }

    pub fn effects_mut(&mut self) -> &mut EffectRegistry {
        &mut self.effects
    }

    pub fn flags(&self) -> &PersistentFlagStore {
        &self.flags
    }

    pub fn subscribe(&self, topic: Topic) -> tokio::sync::broadcast::Receiver<Event> {
        self.bus.subscribe(topic)
    }

    /// Resolves an attack between two combatants.
    ///
    /// Attack numbers are snapshotted from the world: main-hand weapon kind
    /// and damage (unarmed fallback from config), attacker bonus, defender
    /// armor class. Returns `Ok(None)` when either combatant is missing -
    /// absence is a valid outcome, not an error.
    pub async fn attack(
        &mut self,
        attacker: EntityId,
        defender: EntityId,
    ) -> Result<Option<ResolvedAttack>> {
        let Some(attacker_state) = self.world.actor(attacker) else {
            return Ok(None);
        };
        let Some(defender_state) = self.world.actor(defender) else {
            return Ok(None);
        };

        let weapon = attacker_state
            .main_hand
            .and_then(|id| self.world.item(id))
            .and_then(|item| item.weapon().copied());
        let (kind, base_damage) = match weapon {
            Some(weapon) => (weapon.attack_kind, weapon.damage),
            None => (
                WeaponAttackKind::Unarmed,
                self.config.combat.unarmed_damage as i32,
            ),
        };
        let attack = Attack::new(attacker, defender, kind)
            .with_base_damage(base_damage)
            .with_attack_bonus(attacker_state.attack_bonus)
            .with_defender_ac(defender_state.armor_class);

        let env = self.oracles.as_engine_env();
        let resolved = resolve(attack, &mut self.world, &self.effects, &env)?;

        log_faults("combat", &resolved.faults);
        self.bus.publish(Event::Combat(CombatEvent::AttackResolved {
            attacker,
            defender,
            outcome: resolved.outcome,
            damage: resolved.damage_applied,
        }));
        self.play_requests(&resolved.animations).await;

        Ok(Some(resolved))
    }

    /// Dispatches an area event to its registered triggers.
    pub async fn area_event(
        &mut self,
        area: AreaId,
        kind: TriggerKind,
        subject: Option<EntityId>,
    ) -> DispatchReport {
        let env = self.oracles.as_engine_env();
        let report = self
            .triggers
            .dispatch(area, kind, subject, &mut self.world, &env);

        log_faults("trigger", &report.faults);
        if report.suppressed > 0 {
            debug!(
                target: "runtime",
                %area,
                suppressed = report.suppressed,
                "first-time triggers suppressed"
            );
        }
        self.bus.publish(Event::Area(AreaEvent {
            area,
            kind,
            fired: report.fired,
            suppressed: report.suppressed,
        }));
        self.play_requests(&report.animations).await;
        report
    }

    /// Fires the `on_use` hooks of an item. Provoked secondary actions are
    /// returned in the outcome for the combat subsystem to execute after
    /// this call - hooks never nest.
    pub async fn use_item(
        &mut self,
        item: EntityId,
        user: EntityId,
        target: Option<EntityId>,
    ) -> ItemOutcome {
        let env = self.oracles.as_engine_env();
        let outcome = use_item(
            item,
            user,
            target,
            &mut self.world,
            &self.effects,
            &self.flags,
            &env,
        );

        log_faults("item", &outcome.faults);
        self.bus.publish(Event::Item(ItemEvent::Used {
            item,
            user,
            removed: outcome.removed.clone(),
        }));
        self.play_requests(&outcome.animations).await;
        outcome
    }

    /// Fires the `on_open` hooks of an item.
    pub async fn open_item(&mut self, item: EntityId, actor: EntityId) -> ItemOutcome {
        let env = self.oracles.as_engine_env();
        let outcome = open_item(item, actor, &mut self.world, &self.effects, &self.flags, &env);

        log_faults("item", &outcome.faults);
        self.bus
            .publish(Event::Item(ItemEvent::Opened { item, actor }));
        self.play_requests(&outcome.animations).await;
        outcome
    }

    /// Starts a playback directly (outside hook dispatch).
    pub async fn play_animation(&self, request: AnimationRequest) -> Result<AnimationHandle> {
        self.animations.play(request).await
    }

    /// Stops a playback; its render resources are released by the worker
    /// before any later command runs.
    pub async fn stop_animation(&self, handle: AnimationHandle) -> Result<()> {
        self.animations.stop(handle).await
    }

    /// Advances all playbacks by `dt` simulation seconds.
    pub async fn tick_animations(&self, dt: f32) -> Result<()> {
        self.animations.tick(dt).await
    }

    /// Number of active playbacks.
    pub async fn active_animations(&self) -> Result<usize> {
        self.animations.active_count().await
    }

    /// Persists the campaign flag table. No-op without a store.
    pub fn save_campaign(&self) -> Result<()> {
        let Some(store) = &self.store else {
            debug!(target: "runtime", "no campaign store configured, skipping save");
            return Ok(());
        };
        let record = CampaignRecord::new(self.session_id.clone(), self.flags.snapshot());
        store.save(&record)?;
        info!(
            target: "runtime",
            session = %self.session_id,
            flags = record.flags.len(),
            "campaign saved"
        );
        Ok(())
    }

    async fn play_requests(&self, requests: &[AnimationRequest]) {
        for request in requests {
            if let Err(error) = self.animations.play(request.clone()).await {
                // Content shipped a bad descriptor; the playback is dropped,
                // dispatch results stand.
                warn!(target: "runtime", %error, "animation request rejected");
            }
        }
    }
}

fn log_faults(context: &str, faults: &[FaultRecord]) {
    for fault in faults {
        warn!(
            target: "runtime::hooks",
            context,
            hook = %fault.hook,
            during = %fault.during,
            error = %fault.error,
            "hook faulted, treated as no-op"
        );
    }
}
