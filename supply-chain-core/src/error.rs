use crate::types::{InstanceId, Principal, Role, StateLabel};
use serde::{Deserialize, Serialize};

/// Every failure the core can report. All variants are local, synchronous,
/// non-retryable logical errors; any operation that returns one leaves every
/// entity unchanged.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, thiserror::Error)]
#[serde(tag = "error_kind", rename_all = "snake_case")]
pub enum ChainError {
    /// Label is not a node in the graph.
    #[error("unknown state: {label}")]
    UnknownState { label: StateLabel },

    /// Label already defined in the graph — labels are immutable once added.
    #[error("state already defined: {label}")]
    DuplicateState { label: StateLabel },

    /// Target is not reachable from the current state.
    #[error("illegal transition: {target} is not reachable from {from}")]
    IllegalTransition { from: StateLabel, target: StateLabel },

    /// Caller does not hold the role, or the role is not allowed here.
    #[error("unauthorized: {principal} may not act as {role}")]
    Unauthorized { role: Role, principal: Principal },

    /// Registry key collision — identities are unique per registry.
    #[error("duplicate identity: {id}")]
    DuplicateIdentity { id: InstanceId },

    /// Positional lookup past the end of the registry index.
    #[error("index {index} out of range (registry length {len})")]
    IndexOutOfRange { index: usize, len: usize },

    /// Keyed lookup miss.
    #[error("no instance registered under {key}")]
    NotFound { key: InstanceId },

    /// A guard was poisoned by a panicking writer. Not expected in correct
    /// programs; surfaced instead of propagating the panic.
    #[error("lock poisoned: {reason}")]
    Lock { reason: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn all_variants_render_non_empty_messages() {
        let variants = vec![
            ChainError::UnknownState {
                label: StateLabel::new("NOWHERE"),
            },
            ChainError::DuplicateState {
                label: StateLabel::new("SOLD"),
            },
            ChainError::IllegalTransition {
                from: StateLabel::new("SOLD"),
                target: StateLabel::new("ORDER PLACED"),
            },
            ChainError::Unauthorized {
                role: Role::new("ROLE_BUYER"),
                principal: Principal::new("0xabc"),
            },
            ChainError::DuplicateIdentity {
                id: InstanceId::generate(),
            },
            ChainError::IndexOutOfRange { index: 3, len: 1 },
            ChainError::NotFound {
                key: InstanceId::generate(),
            },
            ChainError::Lock {
                reason: "RwLock".into(),
            },
        ];
        for v in &variants {
            assert!(!v.to_string().is_empty(), "empty Display for {:?}", v);
        }
    }

    #[test]
    fn errors_serde_round_trip() {
        let err = ChainError::IllegalTransition {
            from: StateLabel::new("DEMAND GENERATED"),
            target: StateLabel::new("SOLD"),
        };
        let json = serde_json::to_string(&err).expect("serialize");
        let back: ChainError = serde_json::from_str(&json).expect("deserialize");
        assert_eq!(back, err);
    }
}
