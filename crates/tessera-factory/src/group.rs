//! Group requests and formed groups.

use serde::{Deserialize, Serialize};
use tessera_bonding::{Address, Amount};

use crate::error::{Error, Result};

/// Parameters of an `open_group` call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupRequest {
    pub group_size: usize,
    /// Honest threshold, `1..=group_size`.
    pub threshold: usize,
    pub owner: Address,
    /// Collateral to lock across the whole group.
    pub total_bond: Amount,
}

impl GroupRequest {
    pub fn new(group_size: usize, threshold: usize, owner: Address, total_bond: Amount) -> Self {
        Self {
            group_size,
            threshold,
            owner,
            total_bond,
        }
    }

    /// Check the shape of the request and return the per-member bond.
    pub fn validate(&self) -> Result<Amount> {
        if self.group_size == 0 {
            return Err(Error::ZeroGroupSize);
        }
        if self.threshold == 0 {
            return Err(Error::ZeroThreshold);
        }
        if self.threshold > self.group_size {
            return Err(Error::ThresholdTooLarge {
                threshold: self.threshold,
                group_size: self.group_size,
            });
        }
        let per_member = bond_per_member(self.total_bond, self.group_size);
        if per_member == 0 {
            return Err(Error::ZeroBondPerMember);
        }
        Ok(per_member)
    }
}

/// `ceil(total / group_size)`; zero for an empty group.
pub fn bond_per_member(total: Amount, group_size: usize) -> Amount {
    if group_size == 0 {
        return 0;
    }
    total.div_ceil(group_size as Amount)
}

/// A formed signer group.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Group {
    pub address: Address,
    pub application: Address,
    pub owner: Address,
    /// Members in draw order.
    pub members: Vec<Address>,
    pub threshold: usize,
    pub bond_per_member: Amount,
    pub total_bond: Amount,
    /// Formation height at which the group was created.
    pub height: u64,
}

impl Group {
    pub fn size(&self) -> usize {
        self.members.len()
    }
}

/// Emitted once per successful formation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupCreated {
    pub height: u64,
    pub group_address: Address,
    pub owner: Address,
    pub members: Vec<Address>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn rounds_up() {
        assert_eq!(bond_per_member(16, 3), 6);
        assert_eq!(bond_per_member(11_003_431, 3), 3_667_811);
        assert_eq!(bond_per_member(15, 3), 5);
        assert_eq!(bond_per_member(1, 3), 1);
        assert_eq!(bond_per_member(0, 3), 0);
    }

    #[test]
    fn validation_order() {
        let owner = Address::from_low_u64(1);
        assert_eq!(GroupRequest::new(0, 0, owner, 10).validate(), Err(Error::ZeroGroupSize));
        assert_eq!(GroupRequest::new(3, 0, owner, 10).validate(), Err(Error::ZeroThreshold));
        assert_eq!(
            GroupRequest::new(3, 4, owner, 10).validate(),
            Err(Error::ThresholdTooLarge {
                threshold: 4,
                group_size: 3
            })
        );
        assert_eq!(GroupRequest::new(3, 2, owner, 0).validate(), Err(Error::ZeroBondPerMember));
        assert_eq!(GroupRequest::new(3, 3, owner, 16).validate(), Ok(6));
    }

    proptest! {
        #[test]
        fn per_member_covers_total(total in 0u128..u64::MAX as u128, size in 1usize..64) {
            let per = bond_per_member(total, size);
            prop_assert!(per * size as Amount >= total);
            if per > 0 {
                prop_assert!((per - 1) * (size as Amount) < total);
            }
        }
    }
}
