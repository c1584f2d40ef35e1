//! A single application's sortition pool.
//!
//! # Draw
//!
//! Selecting `k` members samples without replacement, proportional to weight:
//!
//! ```text
//! for i in 0..k:
//!     r_i  = word(seed, i) mod remaining_total
//!     slot = first slot with cumulative weight > r_i
//!     remove slot from the working tree
//! ```
//!
//! Slots are numbered in insertion order, so when `r_i` lands on a boundary
//! the earlier-inserted operator wins. The draw works on a copy of the tree
//! and leaves the pool untouched: the same pool state and seed always give
//! the same group.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use tessera_bonding::{Address, Amount};
use tracing::debug;

use crate::error::{Error, Result};
use crate::seed::Seed;
use crate::tree::WeightTree;

/// Upper bound of a single operator's weight.
pub const MAX_WEIGHT: u32 = u32::MAX;

/// Index of a pool in the registry arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct PoolId(pub u32);

/// Sortition weight of an operator: whole `minimum_stake` units of its
/// available value, clamped to [`MAX_WEIGHT`]. A zero unit yields zero.
pub fn weight_for(available: Amount, minimum_stake: Amount) -> u32 {
    match available.checked_div(minimum_stake) {
        Some(units) => units.min(MAX_WEIGHT as Amount) as u32,
        None => 0,
    }
}

/// Outcome of [`SortitionPool::insert_or_update`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Membership {
    Inserted { weight: u32 },
    Updated { previous: u32, weight: u32 },
}

/// Weighted operator set for one application.
#[derive(Debug, Clone)]
pub struct SortitionPool {
    id: PoolId,
    address: Address,
    application: Address,
    tree: WeightTree,
    /// Slot index → operator, in insertion order.
    slots: Vec<Address>,
    members: HashMap<Address, usize>,
}

impl SortitionPool {
    pub fn new(id: PoolId, address: Address, application: Address) -> Self {
        Self {
            id,
            address,
            application,
            tree: WeightTree::new(),
            slots: Vec::new(),
            members: HashMap::new(),
        }
    }

    pub fn id(&self) -> PoolId {
        self.id
    }

    pub fn address(&self) -> Address {
        self.address
    }

    pub fn application(&self) -> Address {
        self.application
    }

    /// Insert `operator`, or refresh its weight if it is already a member.
    pub fn insert_or_update(&mut self, operator: Address, weight: u32) -> Result<Membership> {
        if weight == 0 {
            return Err(Error::ZeroWeight { operator });
        }

        match self.members.get(&operator) {
            Some(&slot) => {
                let previous = self.tree.get(slot) as u32;
                self.tree.set(slot, weight as u64);
                debug!(pool = %self.address, %operator, previous, weight, "Pool weight updated");
                Ok(Membership::Updated { previous, weight })
            }
            None => {
                let slot = self.tree.push(weight as u64);
                self.slots.push(operator);
                self.members.insert(operator, slot);
                debug!(pool = %self.address, %operator, weight, slot, "Operator inserted");
                Ok(Membership::Inserted { weight })
            }
        }
    }

    pub fn is_operator_in_pool(&self, operator: &Address) -> bool {
        self.members.contains_key(operator)
    }

    /// Current weight, zero for non-members.
    pub fn pool_weight(&self, operator: &Address) -> u32 {
        self.members
            .get(operator)
            .map(|&slot| self.tree.get(slot) as u32)
            .unwrap_or(0)
    }

    pub fn operator_count(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    pub fn total_weight(&self) -> u64 {
        self.tree.total()
    }

    /// Members in insertion order.
    pub fn operators(&self) -> impl Iterator<Item = &Address> {
        self.slots.iter()
    }

    /// Draw `group_size` distinct members using `seed`.
    pub fn select_group(&self, group_size: usize, seed: &Seed) -> Result<Vec<Address>> {
        if self.is_empty() {
            return Err(Error::NoSignerPool);
        }
        let not_enough = Error::NotEnoughOperators {
            available: self.operator_count(),
            required: group_size,
        };
        if self.operator_count() < group_size {
            return Err(not_enough);
        }

        let mut working = self.tree.clone();
        let mut selected = Vec::with_capacity(group_size);
        for i in 0..group_size {
            let total = working.total();
            if total == 0 {
                return Err(not_enough);
            }
            let target = seed.word(i as u64) % total;
            let slot = working.find(target).ok_or_else(|| not_enough.clone())?;
            working.set(slot, 0);
            selected.push(self.slots[slot]);
        }

        debug!(
            pool = %self.address,
            group_size,
            %seed,
            "Group selected"
        );
        Ok(selected)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use std::collections::HashSet;

    fn op(n: u64) -> Address {
        Address::from_low_u64(n)
    }

    fn pool_with(weights: &[u32]) -> SortitionPool {
        let mut pool = SortitionPool::new(PoolId(0), op(1_000), op(2_000));
        for (i, w) in weights.iter().enumerate() {
            pool.insert_or_update(op(i as u64 + 1), *w).unwrap();
        }
        pool
    }

    #[test]
    fn weight_is_floor_of_units() {
        assert_eq!(weight_for(0, 10), 0);
        assert_eq!(weight_for(9, 10), 0);
        assert_eq!(weight_for(10, 10), 1);
        assert_eq!(weight_for(105, 10), 10);
        assert_eq!(weight_for(100, 0), 0);
        assert_eq!(weight_for(Amount::MAX, 1), MAX_WEIGHT);
    }

    #[test]
    fn insert_then_refresh() {
        let mut pool = pool_with(&[]);
        assert_eq!(
            pool.insert_or_update(op(1), 10),
            Ok(Membership::Inserted { weight: 10 })
        );
        assert_eq!(
            pool.insert_or_update(op(1), 4),
            Ok(Membership::Updated {
                previous: 10,
                weight: 4
            })
        );
        assert_eq!(pool.operator_count(), 1);
        assert_eq!(pool.pool_weight(&op(1)), 4);
        assert_eq!(pool.total_weight(), 4);
        assert!(pool.is_operator_in_pool(&op(1)));
        assert!(!pool.is_operator_in_pool(&op(2)));
    }

    #[test]
    fn zero_weight_rejected() {
        let mut pool = pool_with(&[]);
        assert_eq!(
            pool.insert_or_update(op(1), 0),
            Err(Error::ZeroWeight { operator: op(1) })
        );
        assert!(pool.is_empty());
    }

    #[test]
    fn empty_pool_has_no_signers() {
        let pool = pool_with(&[]);
        assert_eq!(pool.select_group(1, &Seed::from_u64(1)), Err(Error::NoSignerPool));
    }

    #[test]
    fn too_small_pool() {
        let pool = pool_with(&[1]);
        assert_eq!(
            pool.select_group(2, &Seed::from_u64(1)),
            Err(Error::NotEnoughOperators {
                available: 1,
                required: 2
            })
        );
    }

    #[test]
    fn whole_pool_is_drawn_when_sizes_match() {
        let pool = pool_with(&[1, 1, 1]);
        let group = pool.select_group(3, &Seed::from_u64(99)).unwrap();
        let set: HashSet<_> = group.iter().copied().collect();
        assert_eq!(set, HashSet::from([op(1), op(2), op(3)]));
    }

    #[test]
    fn draw_is_deterministic() {
        let pool = pool_with(&[5, 1, 9, 3, 7, 2]);
        let seed = Seed::from_u64(12);
        assert_eq!(
            pool.select_group(3, &seed).unwrap(),
            pool.select_group(3, &seed).unwrap()
        );
    }

    #[test]
    fn heavy_operator_dominates_first_pick() {
        let pool = pool_with(&[1, 10_000]);
        let heavy_first = (0..200)
            .filter(|s| pool.select_group(1, &Seed::from_u64(*s)).unwrap()[0] == op(2))
            .count();
        assert!(heavy_first > 190, "heavy operator picked first {heavy_first}/200 times");
    }

    proptest! {
        #[test]
        fn members_are_distinct(
            weights in proptest::collection::vec(1u32..1_000, 1..40),
            seed in any::<u64>(),
            k in 1usize..40,
        ) {
            let pool = pool_with(&weights);
            let k = k.min(weights.len());
            let group = pool.select_group(k, &Seed::from_u64(seed)).unwrap();
            let distinct: HashSet<_> = group.iter().collect();
            prop_assert_eq!(group.len(), k);
            prop_assert_eq!(distinct.len(), k);
            prop_assert!(group.iter().all(|m| pool.is_operator_in_pool(m)));
        }
    }
}
