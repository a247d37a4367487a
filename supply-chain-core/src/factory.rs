use crate::error::ChainError;
use crate::events::{EventBus, LifecycleEvent};
use crate::registry::InstanceRegistry;
use crate::template::supply_chain_template;
use crate::types::{now_ms, InstanceId, Principal};
use std::sync::Arc;
use tokio::sync::broadcast;
use tracing::info;

/// Stateless entry point for the whole lifecycle: deploys fresh registries
/// and provisions supply-chain instances into a caller-supplied registry.
///
/// The factory keeps no per-instance state — only the event channel its
/// subscribers and deployed registries publish on.
#[derive(Clone, Default)]
pub struct InstanceFactory {
    events: EventBus,
}

impl InstanceFactory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a fresh, empty registry wired to this factory's event channel
    /// and announce its identity.
    pub fn deploy_registry(&self) -> Arc<InstanceRegistry> {
        let registry = Arc::new(InstanceRegistry::with_bus(self.events.clone()));
        info!(registry = %registry.id(), "registry deployed");
        self.events.emit(LifecycleEvent::RegistryCreated {
            registry_id: registry.id(),
            at: now_ms(),
        });
        registry
    }

    /// Provision a new instance from the built-in supply-chain template,
    /// with `administrator` as its first admin. The registry announces the
    /// new identity to all subscribers.
    pub fn create_instance(
        &self,
        registry: &InstanceRegistry,
        administrator: &Principal,
    ) -> Result<InstanceId, ChainError> {
        let template = supply_chain_template()?;
        registry.provision(&template, administrator)
    }

    /// Subscribe to registry deployments and instance provisions.
    pub fn subscribe(&self) -> broadcast::Receiver<LifecycleEvent> {
        self.events.subscribe()
    }
}
