//! Delegation records.

use serde::{Deserialize, Serialize};

use crate::{Address, Amount};

/// Binds an operator to its owner, beneficiary and authorizer, and tracks
/// the collateral that is not locked in any bond.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Delegation {
    pub owner: Address,
    pub operator: Address,
    pub beneficiary: Address,
    pub authorizer: Address,
    /// Unix seconds.
    pub created_at: u64,
    /// Unix seconds, 0 while active.
    pub undelegated_at: u64,
    pub unbonded_value: Amount,
}

impl Delegation {
    pub fn new(
        owner: Address,
        operator: Address,
        beneficiary: Address,
        authorizer: Address,
        created_at: u64,
        value: Amount,
    ) -> Self {
        Self {
            owner,
            operator,
            beneficiary,
            authorizer,
            created_at,
            undelegated_at: 0,
            unbonded_value: value,
        }
    }

    /// Seconds elapsed since creation, saturating at zero if the clock went backwards.
    pub fn age(&self, now: u64) -> u64 {
        now.saturating_sub(self.created_at)
    }

    pub fn is_active(&self) -> bool {
        self.undelegated_at == 0
    }

    /// (created_at, undelegated_at)
    pub fn info(&self) -> DelegationInfo {
        DelegationInfo {
            created_at: self.created_at,
            undelegated_at: self.undelegated_at,
        }
    }
}

/// Timestamps reported by `get_delegation_info`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DelegationInfo {
    pub created_at: u64,
    pub undelegated_at: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_delegation_is_active() {
        let d = Delegation::new(
            Address::from_low_u64(1),
            Address::from_low_u64(2),
            Address::from_low_u64(3),
            Address::from_low_u64(4),
            1_000,
            40,
        );
        assert!(d.is_active());
        assert_eq!(d.age(1_060), 60);
        assert_eq!(d.age(10), 0);
        assert_eq!(
            d.info(),
            DelegationInfo {
                created_at: 1_000,
                undelegated_at: 0
            }
        );
    }
}
