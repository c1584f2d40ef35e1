//! Ledger events, recorded in commit order.

use serde::{Deserialize, Serialize};

use crate::{Address, Amount};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum LedgerEvent {
    Delegated {
        owner: Address,
        operator: Address,
    },
    OperatorDelegated {
        operator: Address,
        beneficiary: Address,
        authorizer: Address,
        value: Amount,
    },
    OperatorToppedUp {
        operator: Address,
        value: Amount,
    },
    UnbondedValueDeposited {
        operator: Address,
        beneficiary: Address,
        amount: Amount,
    },
    UnbondedValueWithdrawn {
        operator: Address,
        beneficiary: Address,
        amount: Amount,
    },
    BondCreated {
        operator: Address,
        holder: Address,
        sortition_pool: Address,
        reference_id: Address,
        amount: Amount,
    },
}

impl LedgerEvent {
    /// Operator the event concerns.
    pub fn operator(&self) -> Address {
        match self {
            LedgerEvent::Delegated { operator, .. }
            | LedgerEvent::OperatorDelegated { operator, .. }
            | LedgerEvent::OperatorToppedUp { operator, .. }
            | LedgerEvent::UnbondedValueDeposited { operator, .. }
            | LedgerEvent::UnbondedValueWithdrawn { operator, .. }
            | LedgerEvent::BondCreated { operator, .. } => *operator,
        }
    }
}
