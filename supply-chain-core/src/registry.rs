use crate::error::ChainError;
use crate::events::{EventBus, LifecycleEvent};
use crate::graph::StateGraph;
use crate::instance::WorkflowInstance;
use crate::types::{now_ms, InstanceId, Principal};
use std::collections::HashMap;
use std::sync::{Arc, RwLock};
use tokio::sync::broadcast;
use tracing::info;
use uuid::Uuid;

/// Shared handle to one provisioned instance. Each instance sits behind its
/// own lock, so writes to different instances never contend.
pub type InstanceHandle = Arc<RwLock<WorkflowInstance>>;

/// Arena plus the two index views over it. Both are updated inside one write
/// lock, so they are always consistent projections of the same collection.
#[derive(Default)]
struct RegistryInner {
    /// Registration order, append-only. Never reordered or compacted.
    arena: Vec<(InstanceId, InstanceHandle)>,
    /// Identity → position in `arena`.
    by_key: HashMap<InstanceId, usize>,
}

/// Provisions workflow instances from a template and owns them for life.
///
/// The registry is the sole lifecycle authority: instances are created here,
/// never transferred, never destroyed. Identity assignment happens inside the
/// write lock, so concurrent provisions cannot collide.
pub struct InstanceRegistry {
    registry_id: Uuid,
    inner: RwLock<RegistryInner>,
    events: EventBus,
}

impl InstanceRegistry {
    pub fn new() -> Self {
        Self::with_bus(EventBus::new())
    }

    /// Build on an existing bus — used by the factory so its subscribers also
    /// observe events from the registries it deploys.
    pub fn with_bus(events: EventBus) -> Self {
        Self {
            registry_id: Uuid::now_v7(),
            inner: RwLock::new(RegistryInner::default()),
            events,
        }
    }

    pub fn id(&self) -> Uuid {
        self.registry_id
    }

    /// Provision a fresh instance under a generated identity.
    pub fn provision(
        &self,
        template: &StateGraph,
        administrator: &Principal,
    ) -> Result<InstanceId, ChainError> {
        self.provision_with_id(template, administrator, InstanceId::generate())
    }

    /// Provision a fresh instance under a caller-supplied identity. This is
    /// where `DuplicateIdentity` is enforced; `provision` funnels through it.
    pub fn provision_with_id(
        &self,
        template: &StateGraph,
        administrator: &Principal,
        id: InstanceId,
    ) -> Result<InstanceId, ChainError> {
        // Build the instance before touching the index, so a rejected
        // template leaves the registry unchanged.
        let instance = WorkflowInstance::from_template(template, administrator)?;
        let fingerprint = instance.template_fingerprint();

        {
            let mut inner = self.write()?;
            if inner.by_key.contains_key(&id) {
                return Err(ChainError::DuplicateIdentity { id });
            }
            let index = inner.arena.len();
            inner.arena.push((id, Arc::new(RwLock::new(instance))));
            inner.by_key.insert(id, index);
        }

        info!(registry = %self.registry_id, instance = %id, "instance provisioned");
        self.events.emit(LifecycleEvent::InstanceProvisioned {
            registry_id: self.registry_id,
            instance_id: id,
            template_fingerprint: fingerprint,
            at: now_ms(),
        });
        Ok(id)
    }

    /// The (identity, handle) pair at position `i` in registration order.
    pub fn get_by_index(&self, i: usize) -> Result<(InstanceId, InstanceHandle), ChainError> {
        let inner = self.read()?;
        inner
            .arena
            .get(i)
            .map(|(id, handle)| (*id, Arc::clone(handle)))
            .ok_or(ChainError::IndexOutOfRange {
                index: i,
                len: inner.arena.len(),
            })
    }

    /// The instance registered under `key`.
    pub fn get_by_key(&self, key: &InstanceId) -> Result<InstanceHandle, ChainError> {
        let inner = self.read()?;
        inner
            .by_key
            .get(key)
            .map(|&index| Arc::clone(&inner.arena[index].1))
            .ok_or(ChainError::NotFound { key: *key })
    }

    pub fn index_length(&self) -> Result<usize, ChainError> {
        Ok(self.read()?.arena.len())
    }

    /// All registered identities, in registration order.
    pub fn all_indices(&self) -> Result<Vec<InstanceId>, ChainError> {
        Ok(self.read()?.arena.iter().map(|(id, _)| *id).collect())
    }

    /// Subscribe to provisioning notifications from this registry.
    pub fn subscribe(&self) -> broadcast::Receiver<LifecycleEvent> {
        self.events.subscribe()
    }

    fn read(&self) -> Result<std::sync::RwLockReadGuard<'_, RegistryInner>, ChainError> {
        self.inner.read().map_err(|e| ChainError::Lock {
            reason: e.to_string(),
        })
    }

    fn write(&self) -> Result<std::sync::RwLockWriteGuard<'_, RegistryInner>, ChainError> {
        self.inner.write().map_err(|e| ChainError::Lock {
            reason: e.to_string(),
        })
    }
}

impl Default for InstanceRegistry {
    fn default() -> Self {
        Self::new()
    }
}
