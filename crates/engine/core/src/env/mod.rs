//! Traits describing the host collaborators the engine calls into.
//!
//! Oracles expose dice rolls, messaging, cutscene/popup presentation, and
//! rules tables. The [`Env`] aggregate bundles them so dispatchers can access
//! everything they need without hard coupling to concrete implementations.
mod dice;
mod error;
mod messages;
mod scene;
mod tables;

pub use dice::{DiceOracle, PcgDice};
pub use error::OracleError;
pub use messages::{Channel, MessageSink, NullMessageSink, RecordingMessageSink};
pub use scene::{NullSceneSink, PopupLayout, SceneSink};
pub use tables::{CombatParams, HitParams, TablesOracle};

/// Aggregates the host collaborators required during hook dispatch.
#[derive(Clone, Copy, Debug)]
pub struct Env<'a, D, M, S, T>
where
    D: DiceOracle + ?Sized,
    M: MessageSink + ?Sized,
    S: SceneSink + ?Sized,
    T: TablesOracle + ?Sized,
{
    dice: Option<&'a D>,
    messages: Option<&'a M>,
    scene: Option<&'a S>,
    tables: Option<&'a T>,
}

pub type EngineEnv<'a> = Env<
    'a,
    dyn DiceOracle + 'a,
    dyn MessageSink + 'a,
    dyn SceneSink + 'a,
    dyn TablesOracle + 'a,
>;

impl<'a, D, M, S, T> Env<'a, D, M, S, T>
where
    D: DiceOracle + ?Sized,
    M: MessageSink + ?Sized,
    S: SceneSink + ?Sized,
    T: TablesOracle + ?Sized,
{
    pub fn new(
        dice: Option<&'a D>,
        messages: Option<&'a M>,
        scene: Option<&'a S>,
        tables: Option<&'a T>,
    ) -> Self {
        Self {
            dice,
            messages,
            scene,
            tables,
        }
    }

    pub fn with_all(dice: &'a D, messages: &'a M, scene: &'a S, tables: &'a T) -> Self {
        Self::new(Some(dice), Some(messages), Some(scene), Some(tables))
    }

    pub fn empty() -> Self {
        Self {
            dice: None,
            messages: None,
            scene: None,
            tables: None,
        }
    }

    /// Returns the dice oracle, or an error if not available.
    pub fn dice(&self) -> Result<&'a D, OracleError> {
        self.dice.ok_or(OracleError::DiceNotAvailable)
    }

    /// Returns the message sink, or an error if not available.
    ///
    /// Messaging is fire-and-forget; callers that only emit cosmetic text
    /// usually tolerate absence instead of propagating this error.
    pub fn messages(&self) -> Result<&'a M, OracleError> {
        self.messages.ok_or(OracleError::MessagesNotAvailable)
    }

    /// Returns the cutscene/popup sink, or an error if not available.
    pub fn scene(&self) -> Result<&'a S, OracleError> {
        self.scene.ok_or(OracleError::SceneNotAvailable)
    }

    /// Returns the rules tables oracle, or an error if not available.
    pub fn tables(&self) -> Result<&'a T, OracleError> {
        self.tables.ok_or(OracleError::TablesNotAvailable)
    }
}
