//! Topic-based event bus for chat and rendering consumers.
//!
//! Consumers subscribe to the topics they care about and render from event
//! payloads alone - outcomes carry everything needed without re-running
//! resolution. Publishing is best-effort: a topic with no subscribers
//! drops its events silently.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tokio::sync::broadcast;

use rules_core::{ActorId, Fault, HookId, ResolvedAction};

/// Topics for event routing.
#[derive(Debug, Clone, Copy, Hash, Eq, PartialEq, Serialize, Deserialize)]
pub enum Topic {
    /// Action resolutions, rejections, and hook faults.
    Action,
    /// Turn and round transitions.
    Turn,
}

/// Event wrapper carrying the topic-typed payload and a timestamp.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Event {
    pub at: DateTime<Utc>,
    #[serde(flatten)]
    pub payload: Payload,
}

/// Typed event payloads.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Payload {
    /// An action resolved; outcomes are final.
    ActionResolved { resolved: ResolvedAction },

    /// An action was rejected or aborted before rolling.
    ActionRejected {
        actor: ActorId,
        action: HookId,
        code: String,
        reason: String,
    },

    /// A post-roll hook failed; resolution continued.
    HookFault { action: HookId, fault: Fault },

    /// A combatant's turn began.
    TurnStarted { actor: ActorId, round: u32 },

    /// The round ended.
    RoundEnded { round: u32 },
}

impl Payload {
    pub fn topic(&self) -> Topic {
        match self {
            Payload::ActionResolved { .. }
            | Payload::ActionRejected { .. }
            | Payload::HookFault { .. } => Topic::Action,
            Payload::TurnStarted { .. } | Payload::RoundEnded { .. } => Topic::Turn,
        }
    }
}

/// Topic-based event bus.
pub struct EventBus {
    channels: HashMap<Topic, broadcast::Sender<Event>>,
}

impl EventBus {
    /// Creates a bus with default capacity for each topic.
    pub fn new() -> Self {
        Self::with_capacity(128)
    }

    /// Creates a bus with the given per-topic capacity.
    pub fn with_capacity(capacity: usize) -> Self {
        let mut channels = HashMap::new();
        channels.insert(Topic::Action, broadcast::channel(capacity).0);
        channels.insert(Topic::Turn, broadcast::channel(capacity).0);
        Self { channels }
    }

    /// Publishes an event to its topic.
    pub fn publish(&self, payload: Payload) {
        let topic = payload.topic();
        let event = Event {
            at: Utc::now(),
            payload,
        };
        if let Some(tx) = self.channels.get(&topic)
            && tx.send(event).is_err()
        {
            tracing::trace!(target: "runtime::events", ?topic, "no subscribers for topic");
        }
    }

    /// Subscribes to one topic.
    pub fn subscribe(&self, topic: Topic) -> broadcast::Receiver<Event> {
        self.channels
            .get(&topic)
            .map(|tx| tx.subscribe())
            .unwrap_or_else(|| broadcast::channel(1).1)
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

    #[tokio::test]
    async fn events_route_by_topic() {
        let bus = EventBus::new();
        let mut actions = bus.subscribe(Topic::Action);
        let mut turns = bus.subscribe(Topic::Turn);

        bus.publish(Payload::RoundEnded { round: 2 });
        let event = turns.recv().await.unwrap();
        assert!(matches!(event.payload, Payload::RoundEnded { round: 2 }));
        assert!(actions.try_recv().is_err());
    }

    #[test]
    fn events_serialize_to_tagged_json() {
        let payload = Payload::TurnStarted {
            actor: ActorId(3),
            round: 1,
        };
        let json = serde_json::to_value(&payload).unwrap();
        assert_eq!(json["kind"], "turn_started");
        assert_eq!(json["actor"], 3);
    }
}
