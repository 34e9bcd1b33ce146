//! Fire-and-forget messaging sink.

use std::fmt;
use std::sync::Mutex;

use crate::state::EntityId;

/// Destination channel for a message.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Channel {
    /// Engine-level diagnostics visible to the whole table.
    System,
    /// The shared combat log.
    Combat,
    /// A specific combatant's feed.
    Entity(EntityId),
}

impl fmt::Display for Channel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Channel::System => write!(f, "system"),
            Channel::Combat => write!(f, "combat"),
            Channel::Entity(id) => write!(f, "entity:{id}"),
        }
    }
}

/// Sink for log/notification text produced by hooks.
///
/// Never blocks and never fails; delivery is best-effort and the engine
/// makes no ordering assumptions relative to subsequent hook execution.
pub trait MessageSink: Send + Sync {
    fn add_message(&self, channel: Channel, text: &str);
}

/// Sink that drops every message.
#[derive(Clone, Copy, Debug, Default)]
pub struct NullMessageSink;

impl MessageSink for NullMessageSink {
    fn add_message(&self, _channel: Channel, _text: &str) {}
}

/// Sink that records messages in memory for inspection.
#[derive(Debug, Default)]
pub struct RecordingMessageSink {
    messages: Mutex<Vec<(Channel, String)>>,
}

impl RecordingMessageSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn take(&self) -> Vec<(Channel, String)> {
        std::mem::take(&mut self.messages.lock().unwrap_or_else(|e| e.into_inner()))
    }

    pub fn contains(&self, channel: Channel, text: &str) -> bool {
        self.messages
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .iter()
            .any(|(c, t)| *c == channel && t == text)
    }
}

impl MessageSink for RecordingMessageSink {
    fn add_message(&self, channel: Channel, text: &str) {
        self.messages
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push((channel, text.to_string()));
    }
}
