//! Animation worker that owns the [`AnimationPlayer`].
//!
//! Receives commands from [`AnimationWorkerHandle`], advances playbacks by
//! explicit simulation-time deltas (the host decides what a tick is -
//! never wall-clock), and publishes lifecycle events to the bus.

use tokio::sync::{mpsc, oneshot};
use tracing::debug;

use engine_core::{AnimationError, AnimationHandle, AnimationPlayer, AnimationRequest};

use crate::error::{Result, RuntimeError};
use crate::events::{AnimationEvent, Event, EventBus};

/// Commands processed by the animation worker.
pub enum Command {
    Play {
        request: AnimationRequest,
        reply: oneshot::Sender<std::result::Result<AnimationHandle, AnimationError>>,
    },
    Stop {
        handle: AnimationHandle,
    },
    /// Advance every playback by `dt` simulation seconds.
    Tick {
        dt: f32,
    },
    ActiveCount {
        reply: oneshot::Sender<usize>,
    },
}

/// Background task that owns the active playback set.
pub struct AnimationWorker {
    player: AnimationPlayer,
    command_rx: mpsc::Receiver<Command>,
    event_bus: EventBus,
}

impl AnimationWorker {
    /// Spawns the worker and returns its handle. Must be called inside a
    /// tokio runtime.
    pub fn spawn(event_bus: EventBus) -> (AnimationWorkerHandle, tokio::task::JoinHandle<()>) {
        let (command_tx, command_rx) = mpsc::channel(64);
        let worker = Self {
            player: AnimationPlayer::new(),
            command_rx,
            event_bus,
        };
        let join = tokio::spawn(worker.run());
        (AnimationWorkerHandle { command_tx }, join)
    }

    async fn run(mut self) {
        while let Some(command) = self.command_rx.recv().await {
            self.handle_command(command);
        }
        debug!(target: "runtime::workers", "animation worker shutting down");
    }

    fn handle_command(&mut self, command: Command) {
        match command {
            Command::Play { request, reply } => {
                let result = self
                    .player
                    .play(request.descriptor, request.position, request.tint);
                if let Ok(handle) = &result {
                    self.event_bus
                        .publish(Event::Animation(AnimationEvent::Started { handle: *handle }));
                }
                if reply.send(result).is_err() {
                    debug!(target: "runtime::workers", "play reply channel closed (caller dropped)");
                }
            }
            Command::Stop { handle } => {
                // Release is synchronous within the worker; the event is
                // only a notification.
                if self.player.stop(handle) {
                    self.event_bus
                        .publish(Event::Animation(AnimationEvent::Stopped { handle }));
                }
            }
            Command::Tick { dt } => {
                for handle in self.player.advance(dt) {
                    self.event_bus
                        .publish(Event::Animation(AnimationEvent::Finished { handle }));
                }
            }
            Command::ActiveCount { reply } => {
                if reply.send(self.player.len()).is_err() {
                    debug!(target: "runtime::workers", "count reply channel closed (caller dropped)");
                }
            }
        }
    }
}

/// Cloneable handle for sending commands to the animation worker.
#[derive(Clone)]
pub struct AnimationWorkerHandle {
    command_tx: mpsc::Sender<Command>,
}

impl AnimationWorkerHandle {
    /// Starts a playback and waits for its handle.
    pub async fn play(&self, request: AnimationRequest) -> Result<AnimationHandle> {
        let (reply, response) = oneshot::channel();
        self.command_tx
            .send(Command::Play { request, reply })
            .await
            .map_err(|_| RuntimeError::WorkerUnavailable)?;
        let result = response.await.map_err(|_| RuntimeError::WorkerUnavailable)?;
        Ok(result?)
    }

    /// Stops a playback. Fire-and-forget; unknown handles are no-ops.
    pub async fn stop(&self, handle: AnimationHandle) -> Result<()> {
        self.command_tx
            .send(Command::Stop { handle })
            .await
            .map_err(|_| RuntimeError::WorkerUnavailable)
    }

    /// Advances all playbacks by `dt` simulation seconds.
    pub async fn tick(&self, dt: f32) -> Result<()> {
        self.command_tx
            .send(Command::Tick { dt })
            .await
            .map_err(|_| RuntimeError::WorkerUnavailable)
    }

    /// Number of currently active playbacks.
    pub async fn active_count(&self) -> Result<usize> {
        let (reply, response) = oneshot::channel();
        self.command_tx
            .send(Command::ActiveCount { reply })
            .await
            .map_err(|_| RuntimeError::WorkerUnavailable)?;
        response.await.map_err(|_| RuntimeError::WorkerUnavailable)
    }
}
