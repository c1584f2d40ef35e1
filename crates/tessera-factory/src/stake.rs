//! Stake registry view used for candidate eligibility.

use std::collections::HashMap;

use tessera_bonding::{Address, Amount};

/// Reports how much stake an operator holds in the staking system.
pub trait StakeRegistry {
    fn stake_balance_of(&self, operator: &Address) -> Amount;
}

/// Every operator has the same stake.
#[derive(Debug, Clone, Copy, Default)]
pub struct FixedStake {
    balance: Amount,
}

impl FixedStake {
    pub fn new(balance: Amount) -> Self {
        Self { balance }
    }

    pub fn set_balance(&mut self, balance: Amount) {
        self.balance = balance;
    }
}

impl StakeRegistry for FixedStake {
    fn stake_balance_of(&self, _operator: &Address) -> Amount {
        self.balance
    }
}

/// Per-operator stake balances; unknown operators have none.
#[derive(Debug, Clone, Default)]
pub struct StakeTable {
    balances: HashMap<Address, Amount>,
}

impl StakeTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_balance(&mut self, operator: Address, balance: Amount) {
        self.balances.insert(operator, balance);
    }
}

impl StakeRegistry for StakeTable {
    fn stake_balance_of(&self, operator: &Address) -> Amount {
        self.balances.get(operator).copied().unwrap_or(0)
    }
}
