use crate::error::ChainError;
use crate::types::{Role, StateLabel};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::collections::{BTreeMap, BTreeSet};

// ─── Node ─────────────────────────────────────────────────────

/// One node in the state graph: its label, the roles allowed to act while the
/// workflow sits here, and the labels of its legal successor states.
///
/// A node with an empty `next_states` set is terminal. That is dynamic, not a
/// designation — adding an edge later makes the state non-terminal again.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StateNode {
    pub label: StateLabel,
    pub allowed_roles: BTreeSet<Role>,
    pub next_states: BTreeSet<StateLabel>,
}

// ─── Graph ────────────────────────────────────────────────────

/// Mutable directed graph of workflow states, keyed by opaque label.
///
/// The entry label is fixed at construction. Labels are immutable once added;
/// edges are append-only. Edge targets may be forward-declared: `add_edge`
/// does not require `to` to exist yet, and a dangling target is rejected at
/// transition time instead. `Clone` is the deep copy used to stamp instances
/// out of a template.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StateGraph {
    entry: StateLabel,
    nodes: BTreeMap<StateLabel, StateNode>,
    declared_roles: BTreeSet<Role>,
}

impl StateGraph {
    pub fn new(entry: StateLabel) -> Self {
        Self {
            entry,
            nodes: BTreeMap::new(),
            declared_roles: BTreeSet::new(),
        }
    }

    pub fn entry(&self) -> StateLabel {
        self.entry
    }

    pub fn contains(&self, label: &StateLabel) -> bool {
        self.nodes.contains_key(label)
    }

    /// Add a node. The roles named here join the graph's declared vocabulary.
    pub fn add_state(
        &mut self,
        label: StateLabel,
        allowed_roles: impl IntoIterator<Item = Role>,
    ) -> Result<(), ChainError> {
        if self.nodes.contains_key(&label) {
            return Err(ChainError::DuplicateState { label });
        }
        let allowed_roles: BTreeSet<Role> = allowed_roles.into_iter().collect();
        self.declared_roles.extend(allowed_roles.iter().copied());
        self.nodes.insert(
            label,
            StateNode {
                label,
                allowed_roles,
                next_states: BTreeSet::new(),
            },
        );
        Ok(())
    }

    /// Append `to` to `from`'s successor set. Idempotent. `to` may be a
    /// forward declaration; `from` must already exist.
    pub fn add_edge(&mut self, from: StateLabel, to: StateLabel) -> Result<(), ChainError> {
        let node = self
            .nodes
            .get_mut(&from)
            .ok_or(ChainError::UnknownState { label: from })?;
        node.next_states.insert(to);
        Ok(())
    }

    pub fn node(&self, label: &StateLabel) -> Result<&StateNode, ChainError> {
        self.nodes
            .get(label)
            .ok_or(ChainError::UnknownState { label: *label })
    }

    /// The successor set for `label`.
    pub fn reachable_from(&self, label: &StateLabel) -> Result<&BTreeSet<StateLabel>, ChainError> {
        Ok(&self.node(label)?.next_states)
    }

    /// Every node label, in stable (byte) order.
    pub fn all_labels(&self) -> Vec<StateLabel> {
        self.nodes.keys().copied().collect()
    }

    /// The role vocabulary declared across all nodes.
    pub fn declared_roles(&self) -> &BTreeSet<Role> {
        &self.declared_roles
    }

    /// SHA-256 over the graph's canonical shape — entry, nodes, roles, edges
    /// in sorted order. Two graphs with the same shape share a fingerprint;
    /// instances carry it as their template version.
    pub fn fingerprint(&self) -> [u8; 32] {
        let mut hasher = Sha256::new();
        hasher.update(self.entry.0.as_bytes());
        for (label, node) in &self.nodes {
            hasher.update(label.0.as_bytes());
            for role in &node.allowed_roles {
                hasher.update(role.0.as_bytes());
            }
            for next in &node.next_states {
                hasher.update(next.0.as_bytes());
            }
        }
        hasher.finalize().into()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn two_state_graph() -> StateGraph {
        let mut g = StateGraph::new(StateLabel::new("START"));
        g.add_state(StateLabel::new("START"), [Role::new("ROLE_ADMIN")])
            .expect("add START");
        g.add_state(StateLabel::new("DONE"), [Role::new("ROLE_ADMIN")])
            .expect("add DONE");
        g
    }

    #[test]
    fn add_edge_is_idempotent() {
        let mut g = two_state_graph();
        let (from, to) = (StateLabel::new("START"), StateLabel::new("DONE"));
        for _ in 0..3 {
            g.add_edge(from, to).expect("add edge");
        }
        let next = g.reachable_from(&from).expect("reachable");
        assert_eq!(next.len(), 1);
        assert!(next.contains(&to));
    }

    #[test]
    fn add_edge_requires_known_source() {
        let mut g = two_state_graph();
        let err = g
            .add_edge(StateLabel::new("NOWHERE"), StateLabel::new("DONE"))
            .expect_err("must fail");
        assert_eq!(
            err,
            ChainError::UnknownState {
                label: StateLabel::new("NOWHERE")
            }
        );
    }

    #[test]
    fn add_edge_allows_forward_declared_target() {
        let mut g = two_state_graph();
        let ghost = StateLabel::new("NOT YET CREATED");
        g.add_edge(StateLabel::new("START"), ghost).expect("edge");
        assert!(g
            .reachable_from(&StateLabel::new("START"))
            .expect("reachable")
            .contains(&ghost));
        assert!(!g.contains(&ghost));
    }

    #[test]
    fn relabeling_a_state_is_rejected() {
        let mut g = two_state_graph();
        let err = g
            .add_state(StateLabel::new("START"), [Role::new("ROLE_BUYER")])
            .expect_err("must fail");
        assert_eq!(
            err,
            ChainError::DuplicateState {
                label: StateLabel::new("START")
            }
        );
        // Original node untouched.
        let node = g.node(&StateLabel::new("START")).expect("node");
        assert!(node.allowed_roles.contains(&Role::new("ROLE_ADMIN")));
        assert!(!node.allowed_roles.contains(&Role::new("ROLE_BUYER")));
    }

    #[test]
    fn all_labels_is_stable_across_calls() {
        let g = two_state_graph();
        assert_eq!(g.all_labels(), g.all_labels());
        assert_eq!(g.all_labels().len(), 2);
    }

    #[test]
    fn fingerprint_tracks_shape() {
        let a = two_state_graph();
        let b = two_state_graph();
        assert_eq!(a.fingerprint(), b.fingerprint());

        let mut c = two_state_graph();
        c.add_edge(StateLabel::new("START"), StateLabel::new("DONE"))
            .expect("edge");
        assert_ne!(a.fingerprint(), c.fingerprint());
    }

    #[test]
    fn clone_is_a_deep_copy() {
        let template = two_state_graph();
        let mut copy = template.clone();
        copy.add_edge(StateLabel::new("START"), StateLabel::new("DONE"))
            .expect("edge");
        assert!(template
            .reachable_from(&StateLabel::new("START"))
            .expect("reachable")
            .is_empty());
    }
}
