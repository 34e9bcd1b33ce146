//! Host-side orchestration for the hook-dispatch engine.
//!
//! This crate wires the deterministic engine rules to the host: oracle
//! implementations, a topic-based event bus, the animation worker task,
//! campaign persistence, and the [`Runtime`] facade that drives dispatchers
//! from world events.
//!
//! Modules are organized by responsibility:
//! - [`runtime`] hosts the orchestrator and builder
//! - [`events`] provides the topic-based event bus for flexible routing
//! - [`oracle`] implements the engine's host collaborators
//! - [`repository`] persists campaign flag state across save/load
//! - [`workers`] keeps background tasks internal to the crate
pub mod error;
pub mod events;
pub mod oracle;
pub mod repository;
pub mod runtime;
pub mod telemetry;

mod workers;

pub use error::{Result, RuntimeError};
pub use events::{
    AnimationEvent, AreaEvent, CombatEvent, Event, EventBus, ItemEvent, MessageEvent, SceneEvent,
    Topic,
};
pub use oracle::{BusMessageSink, BusSceneSink, OracleManager, RandDice, StaticTables};
pub use repository::{
    CampaignRecord, CampaignStore, FileCampaignStore, InMemoryCampaignStore, RepositoryError,
};
pub use runtime::{Runtime, RuntimeBuilder};
pub use workers::AnimationWorkerHandle;
