//! Sequenced event publication
//!
//! The bus lives inside the registry state so sequence assignment and
//! broadcast happen under the same lock as the mutation they describe.

use autonomix_types::{Principal, RegistryEvent, RegistryEventEnvelope};
use tokio::sync::broadcast;
use uuid::Uuid;

/// Default broadcast buffer per subscriber
pub const DEFAULT_EVENT_CAPACITY: usize = 1024;

#[derive(Debug)]
pub struct EventBus {
    sender: broadcast::Sender<RegistryEventEnvelope>,
    last_sequence: u64,
}

impl EventBus {
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity.max(1));
        Self {
            sender,
            last_sequence: 0,
        }
    }

    /// Receive every event published after this call
    pub fn subscribe(&self) -> broadcast::Receiver<RegistryEventEnvelope> {
        self.sender.subscribe()
    }

    /// Sequence number of the most recent event, 0 before the first
    pub fn last_sequence(&self) -> u64 {
        self.last_sequence
    }

    /// Wrap and broadcast an event. Having no subscribers is not an error.
    pub fn publish(&mut self, actor: Principal, event: RegistryEvent) -> RegistryEventEnvelope {
        self.last_sequence += 1;
        let envelope = RegistryEventEnvelope {
            sequence: self.last_sequence,
            id: Uuid::new_v4(),
            timestamp: chrono::Utc::now(),
            actor,
            event,
        };

        tracing::debug!(
            sequence = envelope.sequence,
            kind = envelope.event.kind(),
            "Publishing registry event"
        );
        let _ = self.sender.send(envelope.clone());
        envelope
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new(DEFAULT_EVENT_CAPACITY)
    }
}
