//! Host-side implementations of the engine's oracle traits.

use std::sync::Mutex;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use engine_core::{
    Channel, CombatParams, DiceOracle, EngineConfig, EngineEnv, Env, MessageSink, PopupLayout,
    SceneSink, TablesOracle,
};

use crate::events::{Event, EventBus, MessageEvent, SceneEvent};

/// Live dice oracle backed by the thread-safe standard RNG.
///
/// For replayable sessions substitute [`engine_core::PcgDice`] with a saved
/// seed through [`crate::RuntimeBuilder::with_dice`].
pub struct RandDice {
    rng: Mutex<StdRng>,
}

impl RandDice {
    pub fn new() -> Self {
        Self {
            rng: Mutex::new(StdRng::from_entropy()),
        }
    }

    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: Mutex::new(StdRng::seed_from_u64(seed)),
        }
    }
}

impl Default for RandDice {
    fn default() -> Self {
        Self::new()
    }
}

impl DiceOracle for RandDice {
    fn roll(&self, count: u32, sides: u32) -> i32 {
        if sides == 0 {
            return 0;
        }
        let mut rng = self.rng.lock().unwrap_or_else(|e| e.into_inner());
        (0..count).map(|_| rng.gen_range(1..=sides) as i32).sum()
    }
}

/// Message sink that publishes to the event bus and traces each line.
pub struct BusMessageSink {
    bus: EventBus,
}

impl BusMessageSink {
    pub fn new(bus: EventBus) -> Self {
        Self { bus }
    }
}

impl MessageSink for BusMessageSink {
    fn add_message(&self, channel: Channel, text: &str) {
        tracing::debug!(target: "runtime::messages", %channel, text, "hook message");
        self.bus.publish(Event::Message(MessageEvent {
            channel,
            text: text.to_string(),
        }));
    }
}

/// Scene sink that forwards presentation requests to the event bus.
///
/// Requests return immediately; whatever renders popups consumes the Scene
/// topic on its own schedule.
pub struct BusSceneSink {
    bus: EventBus,
}

impl BusSceneSink {
    pub fn new(bus: EventBus) -> Self {
        Self { bus }
    }
}

impl SceneSink for BusSceneSink {
    fn show_popup(&self, asset: &str, layout: PopupLayout) {
        self.bus.publish(Event::Scene(SceneEvent::PopupRequested {
            asset: asset.to_string(),
            layout,
        }));
    }

    fn play_cutscene(&self, asset: &str) {
        self.bus.publish(Event::Scene(SceneEvent::CutsceneRequested {
            asset: asset.to_string(),
        }));
    }
}

/// Tables oracle backed by the loaded engine configuration.
pub struct StaticTables {
    combat: CombatParams,
}

impl StaticTables {
    pub fn new(combat: CombatParams) -> Self {
        Self { combat }
    }
}

impl TablesOracle for StaticTables {
    fn combat(&self) -> &CombatParams {
        &self.combat
    }
}

/// Bundles every oracle implementation and exposes a borrowed engine env.
pub struct OracleManager {
    dice: Box<dyn DiceOracle>,
    messages: BusMessageSink,
    scene: BusSceneSink,
    tables: StaticTables,
}

impl OracleManager {
    pub fn new(dice: Box<dyn DiceOracle>, bus: EventBus, config: &EngineConfig) -> Self {
        Self {
            dice,
            messages: BusMessageSink::new(bus.clone()),
            scene: BusSceneSink::new(bus),
            tables: StaticTables::new(config.combat),
        }
    }

    /// Borrowed environment handed to the engine dispatchers.
    pub fn as_engine_env(&self) -> EngineEnv<'_> {
        Env::with_all(
            self.dice.as_ref(),
            &self.messages,
            &self.scene,
            &self.tables,
        )
    }
}
