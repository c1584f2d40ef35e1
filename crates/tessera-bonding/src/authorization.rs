//! Authorization relations.
//!
//! Contract and pool authorizations live in separate tables so each can be
//! revoked on its own. Operator contracts additionally need registry
//! approval before any authorizer may grant them.

use std::collections::HashSet;

use crate::Address;

/// A set of (operator, target) pairs.
#[derive(Debug, Default, Clone)]
pub struct Relation {
    pairs: HashSet<(Address, Address)>,
}

impl Relation {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the pair. Returns false if it was already present.
    pub fn grant(&mut self, operator: Address, target: Address) -> bool {
        self.pairs.insert((operator, target))
    }

    pub fn holds(&self, operator: &Address, target: &Address) -> bool {
        self.pairs.contains(&(*operator, *target))
    }

    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }
}

/// Both authorization tables plus the operator contract registry.
#[derive(Debug, Default, Clone)]
pub struct Authorizations {
    approved_contracts: HashSet<Address>,
    operator_contracts: Relation,
    sortition_pools: Relation,
}

impl Authorizations {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn approve_contract(&mut self, contract: Address) -> bool {
        self.approved_contracts.insert(contract)
    }

    pub fn is_approved(&self, contract: &Address) -> bool {
        self.approved_contracts.contains(contract)
    }

    pub fn operator_contracts(&self) -> &Relation {
        &self.operator_contracts
    }

    pub fn operator_contracts_mut(&mut self) -> &mut Relation {
        &mut self.operator_contracts
    }

    pub fn sortition_pools(&self) -> &Relation {
        &self.sortition_pools
    }

    pub fn sortition_pools_mut(&mut self) -> &mut Relation {
        &mut self.sortition_pools
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn grant_is_idempotent() {
        let mut rel = Relation::new();
        let op = Address::from_low_u64(1);
        let target = Address::from_low_u64(2);

        assert!(rel.grant(op, target));
        assert!(!rel.grant(op, target));
        assert_eq!(rel.len(), 1);
        assert!(rel.holds(&op, &target));
        assert!(!rel.holds(&target, &op));
    }

    #[test]
    fn tables_are_independent() {
        let mut auth = Authorizations::new();
        let op = Address::from_low_u64(1);
        let target = Address::from_low_u64(2);

        auth.operator_contracts_mut().grant(op, target);
        assert!(auth.operator_contracts().holds(&op, &target));
        assert!(!auth.sortition_pools().holds(&op, &target));
        assert!(auth.sortition_pools().is_empty());
    }
}
