use crate::types::{InstanceId, Timestamp};
use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;
use uuid::Uuid;

/// Default buffer depth for a lifecycle channel. Lagging subscribers drop the
/// oldest notifications, never block the emitter.
pub const EVENT_BUFFER: usize = 64;

/// Notifications emitted by the factory and registries so external tooling
/// can discover new registries and instances without polling.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum LifecycleEvent {
    RegistryCreated {
        registry_id: Uuid,
        at: Timestamp,
    },
    InstanceProvisioned {
        registry_id: Uuid,
        instance_id: InstanceId,
        template_fingerprint: [u8; 32],
        at: Timestamp,
    },
}

/// Broadcast fan-out for lifecycle events. Cloning shares the channel, so a
/// factory and the registries it deploys can publish to the same subscribers.
#[derive(Clone, Debug)]
pub struct EventBus {
    tx: broadcast::Sender<LifecycleEvent>,
}

impl EventBus {
    pub fn new() -> Self {
        let (tx, _rx) = broadcast::channel(EVENT_BUFFER);
        Self { tx }
    }

    /// Publish to all current subscribers. A send with no subscribers is not
    /// an error — notification is best-effort by contract.
    pub fn emit(&self, event: LifecycleEvent) {
        let _ = self.tx.send(event);
    }

    pub fn subscribe(&self) -> broadcast::Receiver<LifecycleEvent> {
        self.tx.subscribe()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}
