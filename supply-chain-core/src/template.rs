//! The fixed supply-chain template: 17 states, 6 roles, entry at
//! `DEMAND GENERATED`. Every provisioned instance starts from a deep copy of
//! this graph.

use crate::error::ChainError;
use crate::graph::StateGraph;
use crate::types::{Role, StateLabel};

/// State labels of the supply-chain template.
pub mod states {
    pub const DEMAND_GENERATED: &str = "DEMAND GENERATED";
    pub const ORDER_PLACED: &str = "ORDER PLACED";
    pub const ACCEPTED: &str = "ACCEPTED";
    pub const ON_HOLD: &str = "ON HOLD";
    pub const DECLINED: &str = "DECLINED";
    pub const IN_PRODUCTION: &str = "IN PRODUCTION";
    pub const READY_FOR_DISPATCH: &str = "READY FOR DISPATCH";
    pub const AT_TRANSFER_POINT: &str = "AT TRANSFER POINT";
    pub const RECEIVED_AT_WAREHOUSE: &str = "RECEIVED AT WAREHOUSE";
    pub const BORDER_CONTROL: &str = "BORDER CONTROL";
    pub const STOCKED_AT_WAREHOUSE: &str = "STOCKED AT WAREHOUSE";
    pub const DEFECTIVE_PRODUCT: &str = "STATE DEFECTIVE PRODUCT";
    pub const OUT_FOR_DELIVERY: &str = "OUT FOR DELIVERY";
    pub const RECEIVED_BY_BUYER: &str = "RECEIVED BY BUYER";
    pub const SHELVED: &str = "SHELVED";
    pub const SOLD: &str = "SOLD";
    pub const DISCARDED: &str = "DISCARDED";
}

/// Role vocabulary of the supply-chain template.
pub mod roles {
    pub const ADMIN: &str = crate::roles::ADMIN_ROLE;
    pub const BUYER: &str = "ROLE_BUYER";
    pub const SUPPLIER: &str = "ROLE_SUPPLIER";
    pub const TRANSPORTER: &str = "ROLE_TRANSPORTER";
    pub const WAREHOUSE: &str = "ROLE_WAREHOUSE";
    pub const BORDER_CONTROLLER: &str = "ROLE_BORDER_CONTROLLER";
}

/// (state, allowed roles, successor states), entry row first.
const TEMPLATE: &[(&str, &[&str], &[&str])] = &[
    (
        states::DEMAND_GENERATED,
        &[roles::ADMIN, roles::BUYER],
        &[states::ORDER_PLACED],
    ),
    (
        states::ORDER_PLACED,
        &[roles::ADMIN, roles::BUYER],
        &[states::ACCEPTED, states::ON_HOLD, states::DECLINED],
    ),
    (
        states::ACCEPTED,
        &[roles::ADMIN, roles::SUPPLIER],
        &[states::IN_PRODUCTION],
    ),
    (
        states::ON_HOLD,
        &[roles::ADMIN, roles::SUPPLIER],
        &[states::ACCEPTED, states::DECLINED],
    ),
    (states::DECLINED, &[roles::ADMIN, roles::SUPPLIER], &[]),
    (
        states::IN_PRODUCTION,
        &[roles::ADMIN, roles::SUPPLIER],
        &[states::READY_FOR_DISPATCH, states::DEFECTIVE_PRODUCT],
    ),
    (
        states::READY_FOR_DISPATCH,
        &[roles::ADMIN, roles::SUPPLIER, roles::TRANSPORTER],
        &[states::AT_TRANSFER_POINT],
    ),
    (
        states::AT_TRANSFER_POINT,
        &[roles::ADMIN, roles::TRANSPORTER],
        &[states::BORDER_CONTROL, states::RECEIVED_AT_WAREHOUSE],
    ),
    (
        states::BORDER_CONTROL,
        &[roles::ADMIN, roles::BORDER_CONTROLLER],
        &[states::RECEIVED_AT_WAREHOUSE, states::ON_HOLD],
    ),
    (
        states::RECEIVED_AT_WAREHOUSE,
        &[roles::ADMIN, roles::WAREHOUSE],
        &[states::STOCKED_AT_WAREHOUSE, states::DEFECTIVE_PRODUCT],
    ),
    (
        states::STOCKED_AT_WAREHOUSE,
        &[roles::ADMIN, roles::WAREHOUSE],
        &[states::OUT_FOR_DELIVERY, states::SHELVED],
    ),
    (
        states::DEFECTIVE_PRODUCT,
        &[roles::ADMIN, roles::SUPPLIER, roles::WAREHOUSE],
        &[states::DISCARDED],
    ),
    (
        states::OUT_FOR_DELIVERY,
        &[roles::ADMIN, roles::TRANSPORTER],
        &[states::RECEIVED_BY_BUYER],
    ),
    (
        states::RECEIVED_BY_BUYER,
        &[roles::ADMIN, roles::BUYER],
        &[states::SOLD, states::DEFECTIVE_PRODUCT],
    ),
    (
        states::SHELVED,
        &[roles::ADMIN, roles::WAREHOUSE],
        &[states::SOLD, states::DISCARDED],
    ),
    (states::SOLD, &[roles::ADMIN, roles::BUYER], &[]),
    (states::DISCARDED, &[roles::ADMIN, roles::WAREHOUSE], &[]),
];

/// Build a fresh copy of the supply-chain template graph.
pub fn supply_chain_template() -> Result<StateGraph, ChainError> {
    let mut graph = StateGraph::new(StateLabel::new(states::DEMAND_GENERATED));
    for (label, allowed, _) in TEMPLATE {
        graph.add_state(StateLabel::new(label), allowed.iter().map(|r| Role::new(r)))?;
    }
    for (label, _, next) in TEMPLATE {
        for target in *next {
            graph.add_edge(StateLabel::new(label), StateLabel::new(target))?;
        }
    }
    Ok(graph)
}
