use crate::types::{Principal, Role};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

/// The role every instance's administrator is granted at provisioning time.
/// Holding it gates the mutating surface (`grant_role`, `add_edge_for_state`).
pub const ADMIN_ROLE: &str = "ROLE_ADMIN";

pub fn admin_role() -> Role {
    Role::new(ADMIN_ROLE)
}

/// Per-instance set of (role, principal) grants. Flat membership only — no
/// hierarchy, no inheritance. Granting is idempotent and there is no revoke.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoleStore {
    grants: BTreeMap<Role, BTreeSet<Principal>>,
}

impl RoleStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add `principal` to `role`'s member set. Re-granting is a no-op.
    pub fn grant(&mut self, role: Role, principal: Principal) {
        self.grants.entry(role).or_default().insert(principal);
    }

    pub fn has(&self, role: &Role, principal: &Principal) -> bool {
        self.grants
            .get(role)
            .is_some_and(|members| members.contains(principal))
    }

    /// Number of principals holding `role`.
    pub fn member_count(&self, role: &Role) -> usize {
        self.grants.get(role).map_or(0, BTreeSet::len)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn grant_then_has() {
        let mut store = RoleStore::new();
        let buyer = Role::new("ROLE_BUYER");
        let alice = Principal::new("0xa11ce");

        assert!(!store.has(&buyer, &alice));
        store.grant(buyer, alice.clone());
        assert!(store.has(&buyer, &alice));
        assert!(!store.has(&Role::new("ROLE_SUPPLIER"), &alice));
    }

    #[test]
    fn grant_is_idempotent() {
        let mut store = RoleStore::new();
        let buyer = Role::new("ROLE_BUYER");
        let alice = Principal::new("0xa11ce");

        store.grant(buyer, alice.clone());
        store.grant(buyer, alice.clone());
        assert_eq!(store.member_count(&buyer), 1);
    }
}
