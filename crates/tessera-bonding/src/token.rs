//! Collateral token transfer seam.

use std::collections::HashMap;

use thiserror::Error;

use crate::{Address, Amount};

/// A failed collateral transfer.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransferError {
    #[error("insufficient balance for {account}: have {available}, need {required}")]
    InsufficientBalance {
        account: Address,
        available: Amount,
        required: Amount,
    },
    #[error("insufficient custody: have {available}, need {required}")]
    InsufficientCustody { available: Amount, required: Amount },
}

/// Moves collateral between participants and the ledger's custody.
///
/// Each call either moves the full amount or fails without effect.
pub trait CollateralToken {
    /// Move `amount` from `from` into ledger custody.
    fn transfer_in(&mut self, from: Address, amount: Amount) -> Result<(), TransferError>;

    /// Move `amount` out of ledger custody to `to`.
    fn transfer_out(&mut self, to: Address, amount: Amount) -> Result<(), TransferError>;
}

/// Balance-table token held in memory.
#[derive(Debug, Default, Clone)]
pub struct InMemoryToken {
    balances: HashMap<Address, Amount>,
    custody: Amount,
}

impl InMemoryToken {
    pub fn new() -> Self {
        Self::default()
    }

    /// Credit `amount` to `account` out of thin air.
    pub fn mint(&mut self, account: Address, amount: Amount) {
        *self.balances.entry(account).or_insert(0) += amount;
    }

    pub fn balance_of(&self, account: &Address) -> Amount {
        self.balances.get(account).copied().unwrap_or(0)
    }

    /// Amount currently held by the ledger.
    pub fn custody(&self) -> Amount {
        self.custody
    }
}

impl CollateralToken for InMemoryToken {
    fn transfer_in(&mut self, from: Address, amount: Amount) -> Result<(), TransferError> {
        let available = self.balance_of(&from);
        if available < amount {
            return Err(TransferError::InsufficientBalance {
                account: from,
                available,
                required: amount,
            });
        }
        self.balances.insert(from, available - amount);
        self.custody += amount;
        Ok(())
    }

    fn transfer_out(&mut self, to: Address, amount: Amount) -> Result<(), TransferError> {
        if self.custody < amount {
            return Err(TransferError::InsufficientCustody {
                available: self.custody,
                required: amount,
            });
        }
        self.custody -= amount;
        *self.balances.entry(to).or_insert(0) += amount;
        Ok(())
    }
}
