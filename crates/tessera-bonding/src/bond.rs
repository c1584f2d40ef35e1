//! Locked collateral.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::{Address, Amount};

/// Identifies one obligation of one operator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BondKey {
    pub operator: Address,
    pub holder: Address,
    pub reference_id: Address,
}

impl BondKey {
    pub fn new(operator: Address, holder: Address, reference_id: Address) -> Self {
        Self {
            operator,
            holder,
            reference_id,
        }
    }
}

/// All active bonds.
#[derive(Debug, Default, Clone)]
pub struct BondBook {
    bonds: HashMap<BondKey, Amount>,
}

impl BondBook {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, key: &BondKey) -> bool {
        self.bonds.contains_key(key)
    }

    pub fn insert(&mut self, key: BondKey, amount: Amount) {
        self.bonds.insert(key, amount);
    }

    /// Locked amount, zero if no such bond.
    pub fn amount(&self, key: &BondKey) -> Amount {
        self.bonds.get(key).copied().unwrap_or(0)
    }

    /// Total collateral locked by `operator` across all holders.
    pub fn locked_by(&self, operator: &Address) -> Amount {
        self.bonds
            .iter()
            .filter(|(k, _)| k.operator == *operator)
            .map(|(_, a)| *a)
            .sum()
    }

    pub fn len(&self) -> usize {
        self.bonds.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bonds.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn amounts_by_key_and_operator() {
        let op = Address::from_low_u64(1);
        let g1 = Address::from_low_u64(10);
        let g2 = Address::from_low_u64(11);
        let mut book = BondBook::new();

        book.insert(BondKey::new(op, g1, g1), 5);
        book.insert(BondKey::new(op, g2, g2), 7);

        assert_eq!(book.amount(&BondKey::new(op, g1, g1)), 5);
        assert_eq!(book.amount(&BondKey::new(op, g1, g2)), 0);
        assert_eq!(book.locked_by(&op), 12);
        assert_eq!(book.len(), 2);
    }
}
