//! Core engine for tracking physical goods through a multi-party supply
//! chain as a finite-state workflow.
//!
//! Each tracked item is a [`WorkflowInstance`]: a deep copy of a template
//! [`StateGraph`] plus its own [`RoleStore`] and current-state pointer. Every
//! transition is gated on set membership — the target must be reachable from
//! the current state, and the caller must hold a role the current state
//! allows. The graph is data, not a closed enum: new edges (and states) can
//! be added to a live instance without touching its siblings.
//!
//! [`InstanceRegistry`] provisions instances from a template, assigns each a
//! unique identity, and keeps an ordered index and a keyed map over one
//! arena. [`InstanceFactory`] is the stateless front door: it deploys
//! registries and seeds instances from the built-in supply-chain template,
//! announcing both over a broadcast [`EventBus`].
//!
//! Settlement, signing, transport, and persistence live outside this crate;
//! callers are opaque [`Principal`]s and all operations complete or fail
//! synchronously with a typed [`ChainError`].

pub mod error;
pub mod events;
pub mod factory;
pub mod graph;
pub mod instance;
pub mod registry;
pub mod roles;
pub mod template;
pub mod types;

pub use error::ChainError;
pub use events::{EventBus, LifecycleEvent};
pub use factory::InstanceFactory;
pub use graph::{StateGraph, StateNode};
pub use instance::{WorkflowInstance, DID_NAMESPACE};
pub use registry::{InstanceHandle, InstanceRegistry};
pub use roles::{admin_role, RoleStore, ADMIN_ROLE};
pub use template::supply_chain_template;
pub use types::{InstanceId, Principal, Role, StateLabel, Token};
