//! Topic-based event bus implementation.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;

use super::types::{AnimationEvent, AreaEvent, CombatEvent, ItemEvent, MessageEvent, SceneEvent};

/// Topics for event routing.
#[derive(Debug, Clone, Copy, Hash, Eq, PartialEq, Serialize, Deserialize)]
pub enum Topic {
    Combat,
    Area,
    Item,
    Animation,
    Message,
    Scene,
}

const ALL_TOPICS: [Topic; 6] = [
    Topic::Combat,
    Topic::Area,
    Topic::Item,
    Topic::Animation,
    Topic::Message,
    Topic::Scene,
];

/// Event wrapper that carries the topic and typed payload.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Event {
    Combat(CombatEvent),
    Area(AreaEvent),
    Item(ItemEvent),
    Animation(AnimationEvent),
    Message(MessageEvent),
    Scene(SceneEvent),
}

impl Event {
    pub fn topic(&self) -> Topic {
        match self {
            Event::Combat(_) => Topic::Combat,
            Event::Area(_) => Topic::Area,
            Event::Item(_) => Topic::Item,
            Event::Animation(_) => Topic::Animation,
            Event::Message(_) => Topic::Message,
            Event::Scene(_) => Topic::Scene,
        }
    }
}

/// Topic-based event bus.
///
/// Channels are pre-created for every topic at construction, so publishing
/// never allocates or locks. Publication is best-effort: with no
/// subscribers the event is dropped, which is normal, not an error.
#[derive(Clone)]
pub struct EventBus {
    channels: HashMap<Topic, broadcast::Sender<Event>>,
}

impl EventBus {
    /// Creates a bus with the default capacity per topic.
    pub fn new() -> Self {
        Self::with_capacity(100)
    }

    /// Creates a bus with the given capacity per topic.
    pub fn with_capacity(capacity: usize) -> Self {
        let channels = ALL_TOPICS
            .iter()
            .map(|topic| (*topic, broadcast::channel(capacity).0))
            .collect();
        Self { channels }
    }

    /// Publishes an event to its topic. Never blocks.
    pub fn publish(&self, event: Event) {
        let topic = event.topic();
        if let Some(tx) = self.channels.get(&topic)
            && tx.send(event).is_err()
        {
            // No subscribers for this topic - normal, not an error.
            tracing::trace!(target: "runtime::events", ?topic, "no subscribers");
        }
    }

    /// Subscribes to a single topic.
    pub fn subscribe(&self, topic: Topic) -> broadcast::Receiver<Event> {
        self.channels
            .get(&topic)
            .expect("channels are pre-created for every topic")
            .subscribe()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use engine_core::Channel;

    #[tokio::test]
    async fn subscribers_only_see_their_topic() {
        let bus = EventBus::new();
        let mut messages = bus.subscribe(Topic::Message);
        let mut combat = bus.subscribe(Topic::Combat);

        bus.publish(Event::Message(MessageEvent {
            channel: Channel::System,
            text: "hello".to_string(),
        }));

        let event = messages.recv().await.unwrap();
        assert!(matches!(event, Event::Message(_)));
        assert!(combat.try_recv().is_err());
    }

    #[test]
    fn publishing_without_subscribers_is_fine() {
        let bus = EventBus::new();
        bus.publish(Event::Message(MessageEvent {
            channel: Channel::System,
            text: "nobody listens".to_string(),
        }));
    }
}
