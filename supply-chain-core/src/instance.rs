use crate::error::ChainError;
use crate::graph::{StateGraph, StateNode};
use crate::roles::{admin_role, RoleStore};
use crate::types::{Principal, Role, StateLabel};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use tracing::{debug, info};

/// Namespace prefix of the derived instance DID.
pub const DID_NAMESPACE: &str = "did:demo:supplychain";

/// One tracked item: an exclusively-owned state graph, a current-state
/// pointer into it, a role store, and free-form order metadata.
///
/// Instances are stamped out of a template by the registry and never
/// destroyed. `transition` is the only operation that moves `current`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkflowInstance {
    graph: StateGraph,
    current: StateLabel,
    roles: RoleStore,
    order_number: String,
    template_fingerprint: [u8; 32],
}

impl WorkflowInstance {
    /// Deep-copy `template` and grant `administrator` the admin role.
    ///
    /// Fails with `UnknownState` if the template's entry label has no node —
    /// a graph that cannot seat its own entry point provisions nothing.
    pub fn from_template(
        template: &StateGraph,
        administrator: &Principal,
    ) -> Result<Self, ChainError> {
        let entry = template.entry();
        if !template.contains(&entry) {
            return Err(ChainError::UnknownState { label: entry });
        }
        let mut roles = RoleStore::new();
        roles.grant(admin_role(), administrator.clone());
        Ok(Self {
            template_fingerprint: template.fingerprint(),
            graph: template.clone(),
            current: entry,
            roles,
            order_number: String::new(),
        })
    }

    // ── Queries ──

    pub fn current_state(&self) -> StateLabel {
        self.current
    }

    /// Legal transition targets from the current state.
    pub fn available_states(&self) -> Result<BTreeSet<StateLabel>, ChainError> {
        Ok(self.graph.reachable_from(&self.current)?.clone())
    }

    /// Label, successor set, and allowed roles for an arbitrary state.
    pub fn state_info(&self, label: &StateLabel) -> Result<&StateNode, ChainError> {
        self.graph.node(label)
    }

    /// Every label in the owned graph.
    pub fn all_states(&self) -> Vec<StateLabel> {
        self.graph.all_labels()
    }

    /// The role vocabulary declared by the graph (independent of grants).
    pub fn roles(&self) -> &BTreeSet<Role> {
        self.graph.declared_roles()
    }

    pub fn has_role(&self, role: &Role, principal: &Principal) -> bool {
        self.roles.has(role, principal)
    }

    pub fn order_number(&self) -> &str {
        &self.order_number
    }

    /// Derived identifier — a pure function of the order number.
    pub fn did(&self) -> String {
        format!("{}:{}", DID_NAMESPACE, self.order_number)
    }

    /// Fingerprint of the template this instance was stamped from.
    pub fn template_fingerprint(&self) -> [u8; 32] {
        self.template_fingerprint
    }

    // ── Mutations ──

    /// Move to `target`. Succeeds iff `target` is a successor of the current
    /// state, the target node exists (edges may be forward-declared), the
    /// caller holds `asserted_role`, and that role is allowed at the current
    /// state. No partial effects on failure.
    pub fn transition(
        &mut self,
        target: StateLabel,
        asserted_role: Role,
        caller: &Principal,
    ) -> Result<(), ChainError> {
        let node = self.graph.node(&self.current)?;
        if !node.next_states.contains(&target) {
            return Err(ChainError::IllegalTransition {
                from: self.current,
                target,
            });
        }
        // Forward-declared edge whose node was never added.
        if !self.graph.contains(&target) {
            return Err(ChainError::UnknownState { label: target });
        }
        if !self.roles.has(&asserted_role, caller) || !node.allowed_roles.contains(&asserted_role) {
            return Err(ChainError::Unauthorized {
                role: asserted_role,
                principal: caller.clone(),
            });
        }
        info!(from = %self.current, to = %target, role = %asserted_role, "state transition");
        self.current = target;
        Ok(())
    }

    /// Append an edge to the owned graph. Admin-gated.
    pub fn add_edge_for_state(
        &mut self,
        from: StateLabel,
        to: StateLabel,
        caller: &Principal,
    ) -> Result<(), ChainError> {
        self.require_admin(caller)?;
        debug!(%from, %to, "edge added");
        self.graph.add_edge(from, to)
    }

    /// Grant `role` to `principal` in the owned role store. Admin-gated.
    pub fn grant_role(
        &mut self,
        role: Role,
        principal: Principal,
        caller: &Principal,
    ) -> Result<(), ChainError> {
        self.require_admin(caller)?;
        debug!(%role, %principal, "role granted");
        self.roles.grant(role, principal);
        Ok(())
    }

    /// Overwrite the order number. The DID changes with it — it is derived,
    /// never stored.
    pub fn edit(&mut self, order_number: &str) {
        self.order_number = order_number.to_string();
    }

    fn require_admin(&self, caller: &Principal) -> Result<(), ChainError> {
        let admin = admin_role();
        if !self.roles.has(&admin, caller) {
            return Err(ChainError::Unauthorized {
                role: admin,
                principal: caller.clone(),
            });
        }
        Ok(())
    }
}
